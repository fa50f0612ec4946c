use chrono::{Datelike, Duration};
use std::ops::Range;

use crate::date::{days_of_month, first_of_month, normalize_month, CalendarDate, WeekStart};
use crate::error::{Error, ErrorKind, Result};

pub const GRID_COLUMNS: usize = 7;
pub const GRID_ROWS: usize = 6;
pub const GRID_CELLS: usize = GRID_COLUMNS * GRID_ROWS;

/// The 42 contiguous days shown for one month, starting on the configured week-start day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month0: u32,
    week_start: WeekStart,
    leading: usize,
    num_days: usize,
    dates: [CalendarDate; GRID_CELLS],
}

impl MonthGrid {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn dates(&self) -> &[CalendarDate; GRID_CELLS] {
        &self.dates
    }

    /// Number of days from the previous month shown before the 1st.
    pub fn leading_days(&self) -> usize {
        self.leading
    }

    /// Number of days from the next month shown after the last day.
    pub fn trailing_days(&self) -> usize {
        GRID_CELLS - self.leading - self.num_days
    }

    /// Cell indices belonging to the target month.
    pub fn target_range(&self) -> Range<usize> {
        self.leading..self.leading + self.num_days
    }

    pub fn target_dates(&self) -> &[CalendarDate] {
        &self.dates[self.target_range()]
    }

    pub fn is_in_target_month(&self, date: &CalendarDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn first(&self) -> CalendarDate {
        self.dates[0]
    }

    pub fn last(&self) -> CalendarDate {
        self.dates[GRID_CELLS - 1]
    }

    /// Cell index holding `date`, if it is visible in this grid.
    pub fn position(&self, date: &CalendarDate) -> Option<usize> {
        if date < &self.first() || date > &self.last() {
            return None;
        }

        let offset = date
            .as_naive()
            .signed_duration_since(self.first().as_naive())
            .num_days();

        Some(offset as usize)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MonthGridBuilder {
    week_start: WeekStart,
}

impl MonthGridBuilder {
    pub fn new(week_start: WeekStart) -> Self {
        MonthGridBuilder { week_start }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Builds the grid for `month0` of `year`.
    ///
    /// `month0` may lie outside `0..12`; it is folded into range and the year adjusted
    /// accordingly. Fails only if the resulting dates are not representable.
    pub fn build(&self, year: i32, month0: i32) -> Result<MonthGrid> {
        let (year, month0) = normalize_month(year, month0);

        let first = first_of_month(year, month0)?;
        let num_days = days_of_month(year, month0)? as usize;
        let leading = self.week_start.column_of(first.weekday()) as usize;

        let out_of_range = || {
            Error::new(
                ErrorKind::DateOutOfRange,
                &format!(
                    "grid for {:04}-{:02} leaves the supported date range",
                    year,
                    month0 + 1
                ),
            )
        };

        let start = first
            .checked_sub_signed(Duration::days(leading as i64))
            .ok_or_else(out_of_range)?;

        // Tail of the previous month, the month itself and the head of the next month form
        // one run of consecutive days.
        let mut dates = [CalendarDate::from(start); GRID_CELLS];
        for idx in 1..GRID_CELLS {
            dates[idx] = dates[idx - 1].succ().ok_or_else(out_of_range)?;
        }

        log::debug!(
            "Built grid for {:04}-{:02}: {} leading, {} days, {} trailing",
            year,
            month0 + 1,
            leading,
            num_days,
            GRID_CELLS - leading - num_days
        );

        Ok(MonthGrid {
            year,
            month0,
            week_start: self.week_start,
            leading,
            num_days,
            dates,
        })
    }
}
