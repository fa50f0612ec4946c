use chrono::NaiveDateTime;

use crate::color::{color_for, Color, ColorMap, Palette};
use crate::config::Config;
use crate::date::{CalendarDate, WeekStart};
use crate::error::Result;
use crate::event::Eventlike;
use crate::grid::{MonthGrid, MonthGridBuilder, GRID_CELLS};
use crate::index::{self, Diagnostics};

#[derive(Clone, Debug, PartialEq)]
pub struct CellEvent<E> {
    pub event: E,
    pub at: NaiveDateTime,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarDayCell<E> {
    pub date: CalendarDate,
    pub is_in_target_month: bool,
    pub is_today: bool,
    /// Chronological; events sharing a timestamp keep their input order.
    pub events: Vec<CellEvent<E>>,
}

impl<E> CalendarDayCell<E> {
    pub fn day_num(&self) -> u32 {
        self.date.day()
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// One month worth of day cells with their events.
///
/// Always holds exactly 42 consecutive days, the first one falling on `week_start`.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthView<E> {
    year: i32,
    month0: u32,
    week_start: WeekStart,
    cells: Vec<CalendarDayCell<E>>,
    diagnostics: Diagnostics,
}

impl<E> MonthView<E> {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn cells(&self) -> &[CalendarDayCell<E>] {
        &self.cells
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn cell(&self, date: &CalendarDate) -> Option<&CalendarDayCell<E>> {
        self.cells
            .binary_search_by(|cell| cell.date.cmp(date))
            .ok()
            .map(|idx| &self.cells[idx])
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.cell(date).is_some()
    }

    pub fn target_cells(&self) -> impl Iterator<Item = &CalendarDayCell<E>> + '_ {
        self.cells.iter().filter(|cell| cell.is_in_target_month)
    }

    pub fn events(&self) -> impl Iterator<Item = &CellEvent<E>> + '_ {
        self.cells.iter().flat_map(|cell| cell.events.iter())
    }

    pub fn total_events(&self) -> usize {
        self.cells.iter().map(|cell| cell.events.len()).sum()
    }
}

/// Turns a month selector and a list of events into a [`MonthView`].
///
/// Holds configuration only. Expansion state and the color map belong to the caller and are
/// passed in and returned explicitly, so identical inputs always give identical views.
#[derive(Clone, Debug)]
pub struct CalendarEngine {
    palette: Palette,
    grid_builder: MonthGridBuilder,
}

impl CalendarEngine {
    pub fn new(palette: Palette, week_start: WeekStart) -> Self {
        CalendarEngine {
            palette,
            grid_builder: MonthGridBuilder::new(week_start),
        }
    }

    /// Fails with `InvalidConfiguration` if `colors` is empty.
    pub fn with_colors<C, I>(colors: I, week_start: WeekStart) -> Result<Self>
    where
        C: Into<Color>,
        I: IntoIterator<Item = C>,
    {
        Ok(Self::new(Palette::new(colors)?, week_start))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_colors(config.palette.iter().map(String::as_str), config.week_start)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn week_start(&self) -> WeekStart {
        self.grid_builder.week_start()
    }

    pub fn grid(&self, year: i32, month0: i32) -> Result<MonthGrid> {
        self.grid_builder.build(year, month0)
    }

    /// Builds the view for `month0` of `year` (out of range months are normalized).
    ///
    /// `occurs_at` of every event must already be expressed in the time reference the
    /// calendar is shown in. Returns the view together with `color_map` extended by every
    /// category key that appears in it.
    pub fn build_month_view<E: Eventlike + Clone>(
        &self,
        year: i32,
        month0: i32,
        events: &[E],
        color_map: ColorMap,
        today: Option<CalendarDate>,
    ) -> Result<(MonthView<E>, ColorMap)> {
        let grid = self.grid_builder.build(year, month0)?;
        let (days, diagnostics) = index::index(&grid, events).into_parts();

        let mut color_map = color_map;
        let mut cells = Vec::with_capacity(GRID_CELLS);

        for (date, day) in grid.dates().iter().zip(days) {
            let mut events = Vec::with_capacity(day.len());
            for timed in day {
                let (color, updated) = color_for(timed.event.color_key(), color_map, &self.palette);
                color_map = updated;
                events.push(CellEvent {
                    event: timed.event,
                    at: timed.at,
                    color,
                });
            }

            cells.push(CalendarDayCell {
                date: *date,
                is_in_target_month: grid.is_in_target_month(date),
                is_today: today.as_ref() == Some(date),
                events,
            });
        }

        log::debug!(
            "Month view {:04}-{:02}: {} events placed, {} outside, {} skipped",
            grid.year(),
            grid.month0() + 1,
            cells.iter().map(|c| c.events.len()).sum::<usize>(),
            diagnostics.out_of_window,
            diagnostics.skipped()
        );

        let view = MonthView {
            year: grid.year(),
            month0: grid.month0(),
            week_start: grid.week_start(),
            cells,
            diagnostics,
        };

        Ok((view, color_map))
    }
}

/// Stand-alone form of [`CalendarEngine::build_month_view`].
pub fn build_month_view<E: Eventlike + Clone>(
    year: i32,
    month0: i32,
    events: &[E],
    color_map: ColorMap,
    palette: &Palette,
    week_start: WeekStart,
    today: Option<CalendarDate>,
) -> Result<(MonthView<E>, ColorMap)> {
    CalendarEngine::new(palette.clone(), week_start).build_month_view(
        year, month0, events, color_map, today,
    )
}
