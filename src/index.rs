use chrono::NaiveDateTime;
use itertools::{Either, Itertools};
use serde::Serialize;

use crate::date::CalendarDate;
use crate::event::Eventlike;
use crate::grid::{MonthGrid, GRID_CELLS};

/// An event together with its parsed occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct Timed<E> {
    pub at: NaiveDateTime,
    pub event: E,
}

impl<E> Timed<E> {
    pub fn date(&self) -> CalendarDate {
        self.at.date().into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MalformedEvent {
    pub id: String,
    pub occurs_at: String,
}

/// What had to be left out while indexing one month.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Events whose timestamp could not be read.
    pub malformed: Vec<MalformedEvent>,
    /// Valid events outside the visible 42 days. Not an error, adjacent months show them.
    pub out_of_window: usize,
}

impl Diagnostics {
    pub fn skipped(&self) -> usize {
        self.malformed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Events of a grid, one bucket per cell.
#[derive(Clone, Debug)]
pub struct IndexedDays<E> {
    days: Vec<Vec<Timed<E>>>,
    diagnostics: Diagnostics,
}

impl<E> IndexedDays<E> {
    pub fn day(&self, idx: usize) -> &[Timed<E>] {
        &self.days[idx]
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn total(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    pub fn into_parts(self) -> (Vec<Vec<Timed<E>>>, Diagnostics) {
        (self.days, self.diagnostics)
    }
}

/// Places events on the cell matching their calendar date.
///
/// Timestamps are truncated to their date as written. Callers that need another time
/// reference have to convert `occurs_at` before indexing (see `tz::normalize_occurs_at`).
pub fn index<E: Eventlike + Clone>(grid: &MonthGrid, events: &[E]) -> IndexedDays<E> {
    let (timed, malformed): (Vec<Timed<E>>, Vec<MalformedEvent>) =
        events.iter().partition_map(|event| match event.occurrence() {
            Ok(at) => Either::Left(Timed {
                at,
                event: event.clone(),
            }),
            Err(err) => {
                log::debug!("Skipping event '{}': {}", event.id(), err);
                Either::Right(MalformedEvent {
                    id: event.id().to_owned(),
                    occurs_at: event.occurs_at().to_owned(),
                })
            }
        });

    let mut days: Vec<Vec<Timed<E>>> = std::iter::repeat_with(Vec::new).take(GRID_CELLS).collect();
    let mut out_of_window = 0;

    for entry in timed {
        match grid.position(&entry.date()) {
            Some(idx) => days[idx].push(entry),
            None => out_of_window += 1,
        }
    }

    // Stable, so events sharing a timestamp keep their input order
    for day in days.iter_mut() {
        day.sort_by_key(|entry| entry.at);
    }

    if !malformed.is_empty() {
        log::warn!(
            "{} event(s) with unreadable timestamps left out of {:04}-{:02}",
            malformed.len(),
            grid.year(),
            grid.month0() + 1
        );
    }

    IndexedDays {
        days,
        diagnostics: Diagnostics {
            malformed,
            out_of_window,
        },
    }
}
