//! Month calendar construction for scheduled items.
//!
//! Given a month and a list of time-stamped events (scheduled payments, scheduled
//! notifications, ...), [`CalendarEngine`] produces a [`MonthView`]: 42 consecutive days,
//! each holding the events that fall on it with a color per category. Expansion state and
//! the color map are owned by the caller and threaded through explicitly.

pub mod color;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod event;
pub mod expansion;
pub mod grid;
pub mod index;
pub mod navigation;
pub mod tz;
pub mod view;

pub use color::{color_for, Color, ColorMap, Palette};
pub use date::{CalendarDate, WeekStart};
pub use engine::{build_month_view, CalendarDayCell, CalendarEngine, CellEvent, MonthView};
pub use error::{Error, ErrorKind, Result};
pub use event::{CalendarEvent, ColorKey, Eventlike};
pub use expansion::{DayExpansionTracker, ExpansionState};
pub use grid::{MonthGrid, MonthGridBuilder};
pub use index::Diagnostics;
pub use navigation::MonthIndex;
