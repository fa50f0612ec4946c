use serde::Serialize;
use std::collections::BTreeSet;
use std::iter::FromIterator;

use crate::date::CalendarDate;
use crate::engine::{CalendarDayCell, CellEvent, MonthView};

pub const DEFAULT_PREVIEW_CAP: usize = 3;

/// Days currently showing all of their events.
///
/// Owned by the presentation layer. Every operation returns a new value and leaves the
/// receiver untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionState(BTreeSet<CalendarDate>);

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.0.contains(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarDate> + '_ {
        self.0.iter()
    }

    pub fn toggled(&self, date: CalendarDate) -> Self {
        let mut dates = self.0.clone();
        if !dates.remove(&date) {
            dates.insert(date);
        }
        ExpansionState(dates)
    }

    pub fn collapse_all(&self) -> Self {
        Self::default()
    }

    /// Drops expanded days that are not part of `view`.
    pub fn retain_within<E>(&self, view: &MonthView<E>) -> Self {
        self.0
            .iter()
            .filter(|date| view.contains(date))
            .copied()
            .collect()
    }
}

impl FromIterator<CalendarDate> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        ExpansionState(iter.into_iter().collect())
    }
}

/// Decides how many events of a day are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayExpansionTracker {
    cap: usize,
}

impl Default for DayExpansionTracker {
    fn default() -> Self {
        DayExpansionTracker {
            cap: DEFAULT_PREVIEW_CAP,
        }
    }
}

impl DayExpansionTracker {
    pub fn new(cap: usize) -> Self {
        DayExpansionTracker { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn toggle(&self, date: CalendarDate, expanded: &ExpansionState) -> ExpansionState {
        expanded.toggled(date)
    }

    pub fn is_expanded(&self, date: &CalendarDate, expanded: &ExpansionState) -> bool {
        expanded.contains(date)
    }

    pub fn visible_events<'c, E>(
        &self,
        cell: &'c CalendarDayCell<E>,
        expanded: &ExpansionState,
    ) -> &'c [CellEvent<E>] {
        if self.is_expanded(&cell.date, expanded) {
            &cell.events
        } else {
            &cell.events[..cell.events.len().min(self.cap)]
        }
    }

    pub fn remaining_count<E>(
        &self,
        cell: &CalendarDayCell<E>,
        expanded: &ExpansionState,
    ) -> usize {
        if self.is_expanded(&cell.date, expanded) {
            0
        } else {
            cell.events.len().saturating_sub(self.cap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use chrono::NaiveDate;

    fn date(day: u32) -> CalendarDate {
        CalendarDate::new(2024, 2, day).unwrap()
    }

    fn cell_with(day: u32, n: usize) -> CalendarDayCell<usize> {
        let at = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        CalendarDayCell {
            date: date(day),
            is_in_target_month: true,
            is_today: false,
            events: (0..n)
                .map(|event| CellEvent {
                    event,
                    at,
                    color: Color::from("c0"),
                })
                .collect(),
        }
    }

    #[test]
    fn toggle_twice_is_identity() {
        let tracker = DayExpansionTracker::default();
        let start: ExpansionState = vec![date(1), date(9)].into_iter().collect();

        for day in [1, 2, 9, 31].iter() {
            let once = tracker.toggle(date(*day), &start);
            assert_ne!(once, start);
            assert_eq!(tracker.toggle(date(*day), &once), start);
        }
    }

    #[test]
    fn toggle_leaves_input_untouched() {
        let tracker = DayExpansionTracker::default();
        let start = ExpansionState::new();

        let expanded = tracker.toggle(date(4), &start);

        assert!(start.is_empty());
        assert!(tracker.is_expanded(&date(4), &expanded));
    }

    #[test]
    fn collapsed_day_is_capped() {
        let tracker = DayExpansionTracker::default();
        let cell = cell_with(5, 5);
        let collapsed = ExpansionState::new();

        assert_eq!(tracker.visible_events(&cell, &collapsed).len(), 3);
        assert_eq!(tracker.remaining_count(&cell, &collapsed), 2);

        let expanded = tracker.toggle(date(5), &collapsed);
        assert_eq!(tracker.visible_events(&cell, &expanded).len(), 5);
        assert_eq!(tracker.remaining_count(&cell, &expanded), 0);
    }

    #[test]
    fn short_days_show_everything() {
        let tracker = DayExpansionTracker::new(3);
        let cell = cell_with(6, 2);

        assert_eq!(tracker.visible_events(&cell, &ExpansionState::new()).len(), 2);
        assert_eq!(tracker.remaining_count(&cell, &ExpansionState::new()), 0);
    }

    #[test]
    fn zero_cap_hides_everything_until_expanded() {
        let tracker = DayExpansionTracker::new(0);
        let cell = cell_with(7, 2);

        assert!(tracker.visible_events(&cell, &ExpansionState::new()).is_empty());
        assert_eq!(tracker.remaining_count(&cell, &ExpansionState::new()), 2);
    }
}
