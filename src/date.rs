use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// A calendar day without any time-of-day component.
///
/// The month is stored zero-based. Values can only be obtained from valid dates, so every
/// `CalendarDate` converts back into a `NaiveDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarDate {
    year: i32,
    month0: u32,
    day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month0: u32, day: u32) -> Option<Self> {
        month0
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, day))
            .map(CalendarDate::from)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn weekday(&self) -> Weekday {
        self.as_naive().weekday()
    }

    pub fn as_naive(&self) -> NaiveDate {
        // Fields were taken from a valid `NaiveDate`
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, self.day)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn succ(&self) -> Option<Self> {
        self.as_naive().succ_opt().map(CalendarDate::from)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate {
            year: date.year(),
            month0: date.month0(),
            day: date.day(),
        }
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.as_naive()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month0 + 1, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?.into())
    }
}

/// Which weekday occupies the first column of a month grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeserializeFromStr)]
pub enum WeekStart {
    Monday,
    Sunday,
}

impl Default for WeekStart {
    fn default() -> Self {
        WeekStart::Monday
    }
}

impl WeekStart {
    const MONDAY_LABELS: [&'static str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const SUNDAY_LABELS: [&'static str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    pub fn first_weekday(&self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// Column of `weekday` in a grid using this convention (0 = week-start day).
    pub fn column_of(&self, weekday: Weekday) -> u32 {
        match self {
            WeekStart::Monday => weekday.num_days_from_monday(),
            WeekStart::Sunday => weekday.num_days_from_sunday(),
        }
    }

    pub fn columns(&self) -> [Weekday; 7] {
        let first = self.first_weekday();
        let mut columns = [first; 7];
        for i in 1..7 {
            columns[i] = columns[i - 1].succ();
        }
        columns
    }

    pub fn weekday_labels(&self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => Self::MONDAY_LABELS,
            WeekStart::Sunday => Self::SUNDAY_LABELS,
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Monday => write!(f, "monday"),
            WeekStart::Sunday => write!(f, "sunday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(WeekStart::Monday),
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            other => Err(Error::new(
                ErrorKind::InvalidConfiguration,
                &format!("'{}' is not a supported week start (monday, sunday)", other),
            )),
        }
    }
}

/// Folds any month offset into `0..12`, carrying whole years into `year`.
pub fn normalize_month(year: i32, month0: i32) -> (i32, u32) {
    (
        year.saturating_add(month0.div_euclid(12)),
        month0.rem_euclid(12) as u32,
    )
}

pub fn first_of_month(year: i32, month0: u32) -> Result<NaiveDate> {
    month0
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::DateOutOfRange,
                &format!("{:04}-{:02} cannot be represented", year, month0 as u64 + 1),
            )
        })
}

pub fn days_of_month(year: i32, month0: u32) -> Result<u32> {
    let first = first_of_month(year, month0)?;
    let (next_year, next_month0) = normalize_month(year, month0 as i32 + 1);

    Ok(first_of_month(next_year, next_month0)?
        .signed_duration_since(first)
        .num_days() as u32)
}
