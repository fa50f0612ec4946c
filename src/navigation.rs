use chrono::{Datelike, Local, Month};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::date::normalize_month;
use crate::error::{Error, ErrorKind, Result};

/// A `(year, month0)` selector as driven by previous / next / today / picker controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthIndex {
    year: i32,
    month0: u32,
}

impl MonthIndex {
    /// Any `month0` is accepted; it is folded into `0..12` with the year adjusted.
    pub fn new(year: i32, month0: i32) -> Self {
        let (year, month0) = normalize_month(year, month0);
        MonthIndex { year, month0 }
    }

    pub fn today() -> Self {
        Local::now().date_naive().into()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn month(&self) -> Month {
        Month::from_u32(self.month0 + 1).unwrap_or(Month::January)
    }

    pub fn name(&self) -> &'static str {
        self.month().name()
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    fn shifted(&self, months: i64) -> Self {
        let total = self.month0 as i64 + months;
        let years = total.div_euclid(12);
        let year = (self.year as i64 + years).clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        MonthIndex::new(year, total.rem_euclid(12) as i32)
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::today()
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex {
            year: m.year(),
            month0: m.month0(),
        }
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        self.shifted(rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        self.shifted(-(rhs as i64))
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.month0.cmp(&other.month0))
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

/// Parses `YYYY-MM`.
impl FromStr for MonthIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::new(
                ErrorKind::TimeParse,
                &format!("'{}' is not a month (expected YYYY-MM)", s),
            )
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: i32 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(MonthIndex::new(year, month - 1))
    }
}
