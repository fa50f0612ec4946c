//! Moving timestamps into the time zone a calendar is displayed in.
//!
//! The indexer truncates `occurs_at` to the date written in the string. When the backend
//! delivers UTC instants but the calendar is shown in another zone, callers run the events
//! through [`normalize_events`] first.

use chrono_tz::Tz;

use crate::error::{Error, ErrorKind, Result};
use crate::event::{parse_occurs_at, parse_with_offset, CalendarEvent};

const NORMALIZED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim().parse::<Tz>().map_err(|err| {
        Error::new(
            ErrorKind::InvalidConfiguration,
            &format!("unknown timezone '{}': {}", name, err),
        )
    })
}

/// Rewrites an offset-carrying timestamp as wall-clock time in `tz`.
///
/// Timestamps without offset are already wall-clock values and come back unchanged.
/// Fails for values that are no timestamp at all.
pub fn normalize_occurs_at(occurs_at: &str, tz: &Tz) -> Result<String> {
    if let Some(dt) = parse_with_offset(occurs_at) {
        return Ok(dt
            .with_timezone(tz)
            .naive_local()
            .format(NORMALIZED_FORMAT)
            .to_string());
    }

    parse_occurs_at(occurs_at).map(|_| occurs_at.to_owned())
}

/// Normalizes every event into `tz`. Unreadable timestamps are passed through so the
/// indexer can report them.
pub fn normalize_events(events: Vec<CalendarEvent>, tz: &Tz) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .map(|mut event| {
            match normalize_occurs_at(&event.occurs_at, tz) {
                Ok(normalized) => event.occurs_at = normalized,
                Err(err) => log::debug!("Leaving '{}' as is: {}", event.id, err),
            }
            event
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_evening_moves_to_next_day_in_berlin() {
        let berlin = parse_timezone("Europe/Berlin").unwrap();

        assert_eq!(
            normalize_occurs_at("2024-03-05T23:30:00Z", &berlin).unwrap(),
            "2024-03-06T00:30:00"
        );
    }

    #[test]
    fn minute_precision_offsets() {
        let berlin = parse_timezone("Europe/Berlin").unwrap();

        assert_eq!(
            normalize_occurs_at("2024-03-05T23:30Z", &berlin).unwrap(),
            "2024-03-06T00:30:00"
        );
        assert_eq!(
            normalize_occurs_at("2024-03-05T10:30+03:00", &berlin).unwrap(),
            "2024-03-05T08:30:00"
        );
    }

    #[test]
    fn naive_timestamps_are_kept() {
        let tz = parse_timezone("America/New_York").unwrap();

        assert_eq!(
            normalize_occurs_at("2024-03-05T23:30:00", &tz).unwrap(),
            "2024-03-05T23:30:00"
        );
        assert_eq!(normalize_occurs_at("2024-03-05", &tz).unwrap(), "2024-03-05");
        assert!(normalize_occurs_at("soon", &tz).is_err());
    }

    #[test]
    fn unknown_zone() {
        assert!(parse_timezone("Mars/Olympus_Mons")
            .unwrap_err()
            .is_invalid_configuration());
    }

    #[test]
    fn normalizes_event_lists() {
        let tz = parse_timezone("America/New_York").unwrap();
        let events = vec![
            CalendarEvent::new("a", "2024-03-05T02:00:00Z", 1u64),
            CalendarEvent::new("b", "broken", 1u64),
        ];

        let normalized = normalize_events(events, &tz);

        assert_eq!(normalized[0].occurs_at, "2024-03-04T21:00:00");
        assert_eq!(normalized[1].occurs_at, "broken");
    }
}
