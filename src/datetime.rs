//! The immutable date-time value
//!
//! `DateTime` freezes the fields a successful parse produced, resolves an
//! absent timezone designator to the host's current local offset, and
//! renders itself back to canonical text on demand. Each rendering is
//! computed once and cached for the value's lifetime.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime as ChronoDateTime, FixedOffset, Local, SecondsFormat, Utc};
use once_cell::sync::OnceCell;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::diagnostics::KalaError;
use crate::syntax::{self, Kind, Parsed};

// Field widths and bounds for canonical rendering.
const YEAR_WIDTH: usize = 4;
const YEAR_EXTENDED_WIDTH: usize = 6;
const YEAR_NORMAL_MIN: i64 = 0;
const YEAR_NORMAL_MAX: i64 = 9999;
const PAIR_WIDTH: usize = 2;
const MILLIS_WIDTH: usize = 3;
const MINUTES_PER_HOUR: u16 = 60;

// %#z accepts both "Z" and "+HH:MM"/"-HH:MM"; %Y accepts the sign-prefixed
// extended year form.
const HOST_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%#z";

/// Timezone designator of a value.
///
/// The UTC marker stays distinct from an explicit zero offset: `Z` renders
/// back as `Z` and `+00:00` as `+00:00`, though both name the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timezone {
    /// The literal `Z` marker.
    Utc,
    /// Fixed offset from UTC, in minutes.
    Offset(i16),
}

impl Timezone {
    /// The host's current offset from UTC, in minutes.
    pub fn local() -> Timezone {
        Timezone::Offset((Local::now().offset().local_minus_utc() / 60) as i16)
    }
}

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Timezone::Utc => serializer.serialize_str("Z"),
            Timezone::Offset(minutes) => serializer.serialize_i16(*minutes),
        }
    }
}

/// An immutable date-time value produced by a successful parse.
///
/// Fields the input did not supply hold their defaults: year 0, month and
/// day 1, zero time-of-day fields. An input without a timezone designator
/// resolves to the host's local offset at construction time, so the value is
/// self-contained from then on.
///
/// Renderings are memoized. The first call computes the string, later calls
/// return the same allocation, and the borrow is stable for as long as the
/// value lives. Concurrent first calls may both compute; one result wins and
/// both callers see it.
#[derive(Clone)]
pub struct DateTime {
    year: i64,
    month: u8,
    day: u8,
    hours: u8,
    minutes: u8,
    seconds: u8,
    milliseconds: u16,
    timezone: Timezone,

    date_string: OnceCell<String>,
    time_string: OnceCell<String>,
    datetime_string: OnceCell<String>,
    utc_string: OnceCell<Result<String, chrono::ParseError>>,
}

impl DateTime {
    /// Parse `input` against the start rule selected by `kind`.
    ///
    /// The empty string is rejected as an argument error before the grammar
    /// runs. Grammar and field-range failures come back as syntax errors
    /// carrying the offending range of the input.
    pub fn parse(input: &str, kind: Kind) -> Result<DateTime, KalaError> {
        if input.is_empty() {
            return Err(KalaError::empty_input());
        }
        Ok(DateTime::from_parsed(syntax::parse(input, kind)?))
    }

    fn from_parsed(parsed: Parsed) -> DateTime {
        let (date, time) = match parsed {
            Parsed::Date(date) => (Some(date), None),
            Parsed::Time(time) => (None, Some(time)),
            Parsed::DateTime(both) => (Some(both.date), Some(both.time)),
        };
        let date = date.unwrap_or_default();
        let time = time.unwrap_or_default();

        DateTime {
            year: date.year,
            month: date.month,
            day: date.day,
            hours: time.hours,
            minutes: time.minutes,
            seconds: time.seconds,
            milliseconds: time.milliseconds,
            timezone: time.timezone.unwrap_or_else(Timezone::local),
            date_string: OnceCell::new(),
            time_string: OnceCell::new(),
            datetime_string: OnceCell::new(),
            utc_string: OnceCell::new(),
        }
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn milliseconds(&self) -> u16 {
        self.milliseconds
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Canonical `YYYY-MM-DD` rendering, `+YYYYYY`/`-YYYYYY` for years
    /// outside 0-9999.
    pub fn to_date_string(&self) -> &str {
        self.date_string.get_or_init(|| {
            format!(
                "{}-{}-{}",
                self.year_string(),
                pad_int(i64::from(self.month), PAIR_WIDTH, false),
                pad_int(i64::from(self.day), PAIR_WIDTH, false),
            )
        })
    }

    /// Canonical `HH:MM:SS.mmm` rendering followed by the timezone
    /// designator.
    pub fn to_time_string(&self) -> &str {
        self.time_string.get_or_init(|| {
            format!(
                "{}:{}:{}.{}{}",
                pad_int(i64::from(self.hours), PAIR_WIDTH, false),
                pad_int(i64::from(self.minutes), PAIR_WIDTH, false),
                pad_int(i64::from(self.seconds), PAIR_WIDTH, false),
                pad_int(i64::from(self.milliseconds), MILLIS_WIDTH, false),
                self.timezone_string(),
            )
        })
    }

    /// Canonical combined rendering: the date, a literal `T`, the time.
    pub fn to_datetime_string(&self) -> &str {
        self.datetime_string
            .get_or_init(|| format!("{}T{}", self.to_date_string(), self.to_time_string()))
    }

    /// Re-parses the canonical rendering as a [`chrono`] fixed-offset value.
    ///
    /// This is the single place host date-time semantics enter. The host
    /// applies its own calendar validity and year-range rules, so a value
    /// that renders fine (a day that does not exist in its month, a year
    /// beyond the host's range) can still fail here; such failures are the
    /// host's own and are returned unchanged.
    pub fn to_chrono(&self) -> Result<ChronoDateTime<FixedOffset>, chrono::ParseError> {
        ChronoDateTime::parse_from_str(self.to_datetime_string(), HOST_FORMAT)
    }

    /// The same instant in UTC, rendered by the host type as
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`. Memoized like the other renderings.
    pub fn to_utc_string(&self) -> Result<&str, chrono::ParseError> {
        self.utc_string
            .get_or_init(|| {
                self.to_chrono().map(|instant| {
                    instant
                        .with_timezone(&Utc)
                        .to_rfc3339_opts(SecondsFormat::Millis, true)
                })
            })
            .as_ref()
            .map(String::as_str)
            .map_err(|&error| error)
    }

    // Years 0-9999 use the plain 4-digit form; everything else the
    // sign-prefixed 6-digit extended form.
    fn year_string(&self) -> String {
        if (YEAR_NORMAL_MIN..=YEAR_NORMAL_MAX).contains(&self.year) {
            pad_int(self.year, YEAR_WIDTH, false)
        } else {
            pad_int(self.year, YEAR_EXTENDED_WIDTH, true)
        }
    }

    // The sign comes from the whole offset and the digits from its
    // magnitude: -90 minutes renders "-01:30", never "-02:30" or "+00:30".
    fn timezone_string(&self) -> String {
        match self.timezone {
            Timezone::Utc => "Z".to_string(),
            Timezone::Offset(offset) => {
                let sign = if offset < 0 { '-' } else { '+' };
                let magnitude = offset.unsigned_abs();
                format!(
                    "{sign}{}:{}",
                    pad_int(i64::from(magnitude / MINUTES_PER_HOUR), PAIR_WIDTH, false),
                    pad_int(i64::from(magnitude % MINUTES_PER_HOUR), PAIR_WIDTH, false),
                )
            }
        }
    }

    // Memo cells never participate in identity.
    fn logical_fields(&self) -> (i64, u8, u8, u8, u8, u8, u16, Timezone) {
        (
            self.year,
            self.month,
            self.day,
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
            self.timezone,
        )
    }
}

/// Zero-pads the magnitude of `value` to `width` digits. Negative values are
/// prefixed with `-`; non-negative ones with `+` when `forced_sign` is set.
/// Magnitudes wider than `width` keep all their digits.
fn pad_int(value: i64, width: usize, forced_sign: bool) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(width + 1);
    if value < 0 {
        out.push('-');
    } else if forced_sign {
        out.push('+');
    }
    for _ in digits.len()..width {
        out.push('0');
    }
    out.push_str(&digits);
    out
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_datetime_string())
    }
}

impl FromStr for DateTime {
    type Err = KalaError;

    /// Equivalent to [`DateTime::parse`] with [`Kind::DateTime`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse(s, Kind::DateTime)
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTime")
            .field("year", &self.year)
            .field("month", &self.month)
            .field("day", &self.day)
            .field("hours", &self.hours)
            .field("minutes", &self.minutes)
            .field("seconds", &self.seconds)
            .field("milliseconds", &self.milliseconds)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.logical_fields() == other.logical_fields()
    }
}

impl Eq for DateTime {}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.logical_fields().hash(state);
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<DateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = DateTime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a datetime string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<DateTime, E> {
                value.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{ParsedDate, ParsedTime};

    fn value_with_timezone(timezone: Timezone) -> DateTime {
        DateTime::from_parsed(Parsed::Time(ParsedTime {
            timezone: Some(timezone),
            ..ParsedTime::default()
        }))
    }

    fn value_with_year(year: i64) -> DateTime {
        DateTime::from_parsed(Parsed::Date(ParsedDate {
            year,
            ..ParsedDate::default()
        }))
    }

    #[test]
    fn test_pad_int_pads_and_signs() {
        assert_eq!(pad_int(7, 2, false), "07");
        assert_eq!(pad_int(2024, 4, false), "2024");
        assert_eq!(pad_int(-1, 6, true), "-000001");
        assert_eq!(pad_int(123456, 6, true), "+123456");
        assert_eq!(pad_int(0, 2, true), "+00");
        // Wider than the pad keeps every digit.
        assert_eq!(pad_int(12345, 4, false), "12345");
    }

    #[test]
    fn test_offset_rendering_sign_then_magnitude() {
        let cases = vec![
            (0, "+00:00"),
            (330, "+05:30"),
            (-30, "-00:30"),
            (-90, "-01:30"),
            (-300, "-05:00"),
            (1439, "+23:59"),
        ];
        for (minutes, expected) in cases {
            let value = value_with_timezone(Timezone::Offset(minutes));
            let rendered = value.to_time_string();
            assert!(
                rendered.ends_with(expected),
                "offset {minutes}: got {rendered}, want suffix {expected}"
            );
        }

        let utc = value_with_timezone(Timezone::Utc);
        assert!(utc.to_time_string().ends_with('Z'));
    }

    #[test]
    fn test_extended_year_rendering() {
        assert_eq!(value_with_year(2024).to_date_string(), "2024-01-01");
        assert_eq!(value_with_year(0).to_date_string(), "0000-01-01");
        assert_eq!(value_with_year(9999).to_date_string(), "9999-01-01");
        assert_eq!(value_with_year(10000).to_date_string(), "+010000-01-01");
        assert_eq!(value_with_year(123456).to_date_string(), "+123456-01-01");
        assert_eq!(value_with_year(-1).to_date_string(), "-000001-01-01");
    }
}
