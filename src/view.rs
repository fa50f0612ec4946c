use std::fmt::{self, Display};

use crate::date::CalendarDate;
use crate::engine::{CalendarDayCell, CellEvent, MonthView};
use crate::event::Eventlike;
use crate::expansion::{DayExpansionTracker, ExpansionState};
use crate::grid::GRID_COLUMNS;
use crate::navigation::MonthIndex;

const TODAY_CHAR: char = '*';
const OUTSIDE_CHAR: char = '.';
const CELL_WIDTH: usize = 4;

/// Everything the presentation layer needs to draw one day.
#[derive(Debug)]
pub struct DayView<'v, E> {
    pub date: CalendarDate,
    pub is_in_target_month: bool,
    pub is_today: bool,
    pub is_expanded: bool,
    pub visible: &'v [CellEvent<E>],
    pub remaining: usize,
}

impl<'v, E> DayView<'v, E> {
    fn new(
        cell: &'v CalendarDayCell<E>,
        expanded: &ExpansionState,
        tracker: &DayExpansionTracker,
    ) -> Self {
        DayView {
            date: cell.date,
            is_in_target_month: cell.is_in_target_month,
            is_today: cell.is_today,
            is_expanded: tracker.is_expanded(&cell.date, expanded),
            visible: tracker.visible_events(cell, expanded),
            remaining: tracker.remaining_count(cell, expanded),
        }
    }

    pub fn day_num(&self) -> u32 {
        self.date.day()
    }

    pub fn more_label(&self) -> Option<String> {
        if self.remaining > 0 {
            Some(format!("+{} more", self.remaining))
        } else {
            None
        }
    }
}

impl<E> Display for DayView<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = if self.is_today { TODAY_CHAR } else { ' ' };
        let arg_outside = if self.is_in_target_month {
            ' '
        } else {
            OUTSIDE_CHAR
        };

        write!(f, "{}{}{:>2}", arg_today, arg_outside, self.day_num())
    }
}

impl<E> MonthView<E> {
    /// "March 2024"
    pub fn title(&self) -> String {
        let index = MonthIndex::new(self.year(), self.month0() as i32);
        format!("{} {}", index.name(), index.year())
    }

    pub fn weekday_labels(&self) -> [&'static str; 7] {
        self.week_start().weekday_labels()
    }

    pub fn day_views<'v>(
        &'v self,
        expanded: &ExpansionState,
        tracker: &DayExpansionTracker,
    ) -> Vec<DayView<'v, E>> {
        self.cells()
            .iter()
            .map(|cell| DayView::new(cell, expanded, tracker))
            .collect()
    }

    /// The six week rows, seven days each.
    pub fn weeks<'v>(
        &'v self,
        expanded: &ExpansionState,
        tracker: &DayExpansionTracker,
    ) -> Vec<Vec<DayView<'v, E>>> {
        let mut days = self.day_views(expanded, tracker).into_iter().peekable();
        let mut weeks = Vec::new();

        while days.peek().is_some() {
            weeks.push(days.by_ref().take(GRID_COLUMNS).collect());
        }

        weeks
    }
}

/// Plain-text rendering of a month: title, weekday header, the grid and the event list per day.
pub struct TextMonth<'v, E> {
    view: &'v MonthView<E>,
    expanded: &'v ExpansionState,
    tracker: &'v DayExpansionTracker,
}

impl<'v, E> TextMonth<'v, E> {
    pub fn new(
        view: &'v MonthView<E>,
        expanded: &'v ExpansionState,
        tracker: &'v DayExpansionTracker,
    ) -> Self {
        TextMonth {
            view,
            expanded,
            tracker,
        }
    }
}

impl<E: Eventlike> Display for TextMonth<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.view.title())?;
        for label in self.view.weekday_labels().iter() {
            write!(f, "{:>width$}", label, width = CELL_WIDTH)?;
        }
        writeln!(f)?;

        let weeks = self.view.weeks(self.expanded, self.tracker);
        for week in weeks.iter() {
            for day in week {
                write!(f, "{}", day)?;
            }
            writeln!(f)?;
        }

        let busy = weeks
            .iter()
            .flatten()
            .filter(|day| !day.visible.is_empty() || day.remaining > 0);

        for day in busy {
            writeln!(f, "\n{}", day.date)?;
            for entry in day.visible {
                writeln!(
                    f,
                    "  {} [{}] {}",
                    entry.at.format("%H:%M"),
                    entry.color,
                    entry.event.id()
                )?;
            }
            if let Some(label) = day.more_label() {
                writeln!(f, "  {}", label)?;
            }
        }

        Ok(())
    }
}

pub fn render_text<E: Eventlike>(
    view: &MonthView<E>,
    expanded: &ExpansionState,
    tracker: &DayExpansionTracker,
) -> String {
    TextMonth::new(view, expanded, tracker).to_string()
}
