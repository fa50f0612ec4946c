use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::date::CalendarDate;
use crate::error::{Error, ErrorKind, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    // `%#z` also takes `Z`
    "%Y-%m-%dT%H:%M%#z",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category attribute used to pick a display color (city id, audience id, ...).
#[derive(Clone, Debug, Display, From, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorKey(String);

impl ColorKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColorKey {
    fn from(key: &str) -> Self {
        ColorKey(key.to_owned())
    }
}

impl From<u64> for ColorKey {
    fn from(key: u64) -> Self {
        ColorKey(key.to_string())
    }
}

impl From<i64> for ColorKey {
    fn from(key: i64) -> Self {
        ColorKey(key.to_string())
    }
}

impl From<u32> for ColorKey {
    fn from(key: u32) -> Self {
        ColorKey(key.to_string())
    }
}

/// Backends send ids either as JSON strings or as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawKey> for String {
    fn from(raw: RawKey) -> Self {
        match raw {
            RawKey::Text(s) => s,
            RawKey::Signed(n) => n.to_string(),
            RawKey::Unsigned(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawKey::deserialize(deserializer).map(String::from)
}

/// Accepts any JSON value. Anything but a string ends up as a timestamp the indexer rejects,
/// so a single broken event cannot fail the whole list.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl<'de> Deserialize<'de> for ColorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        string_or_number(deserializer).map(ColorKey)
    }
}

/// What the engine needs to know about an event. Everything else is carried through untouched.
pub trait Eventlike {
    fn id(&self) -> &str;
    /// ISO-8601 timestamp, already expressed in the time reference of the calendar.
    fn occurs_at(&self) -> &str;
    fn color_key(&self) -> &ColorKey;

    fn occurrence(&self) -> Result<NaiveDateTime> {
        parse_occurs_at(self.occurs_at())
    }

    fn date(&self) -> Result<CalendarDate> {
        self.occurrence().map(|dt| dt.date().into())
    }
}

/// An event as delivered by the REST backend: scheduled payment, scheduled notification, ...
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub occurs_at: String,
    pub color_key: ColorKey,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl CalendarEvent {
    pub fn new<K: Into<ColorKey>>(id: &str, occurs_at: &str, color_key: K) -> Self {
        CalendarEvent {
            id: id.to_owned(),
            occurs_at: occurs_at.to_owned(),
            color_key: color_key.into(),
            payload: Map::new(),
        }
    }

    pub fn with_field<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.payload.insert(name.to_owned(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn title(&self) -> Option<&str> {
        ["title", "name", "description"]
            .iter()
            .find_map(|name| self.field(name).and_then(Value::as_str))
    }
}

impl Eventlike for CalendarEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn occurs_at(&self) -> &str {
        &self.occurs_at
    }

    fn color_key(&self) -> &ColorKey {
        &self.color_key
    }
}

impl<E: Eventlike + ?Sized> Eventlike for &E {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn occurs_at(&self) -> &str {
        (**self).occurs_at()
    }

    fn color_key(&self) -> &ColorKey {
        (**self).color_key()
    }
}

/// Parses timestamps that carry a UTC offset (`Z`, `+01:00`, `+0100`).
pub(crate) fn parse_with_offset(occurs_at: &str) -> Option<DateTime<FixedOffset>> {
    let s = occurs_at.trim();

    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    })
}

/// Reads an ISO-8601 timestamp as wall-clock time of its own offset.
///
/// `2024-03-05T23:59:00-05:00` yields March 5th 23:59; nothing is shifted to UTC or to the
/// local zone. Date-only values are taken as midnight.
pub fn parse_occurs_at(occurs_at: &str) -> Result<NaiveDateTime> {
    let s = occurs_at.trim();

    if let Some(dt) = parse_with_offset(s) {
        return Ok(dt.naive_local());
    }

    if let Some(dt) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::TimeParse,
                &format!("'{}' is not an ISO-8601 date or timestamp", occurs_at),
            )
        })
}
