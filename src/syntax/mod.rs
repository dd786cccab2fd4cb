//! Syntax module for kala
//!
//! This module provides the grammar-level view of an input: the start-rule
//! selector and the raw field records the parser produces before any value
//! construction or timezone defaulting happens.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::datetime::Timezone;
use crate::diagnostics::KalaError;

pub mod parser;

pub use parser::parse;

/// Which start rule an input is parsed against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A calendar date: `2024-03-05`.
    Date,
    /// A wall-clock time: `14:09:07.250Z`.
    Time,
    /// A combined date and time: `2024-03-05T14:09:07.250Z`.
    #[default]
    DateTime,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Date => "date",
            Kind::Time => "time",
            Kind::DateTime => "datetime",
        }
    }

    /// A canonical example of the shape this kind accepts.
    pub(crate) fn example(&self) -> &'static str {
        match self {
            Kind::Date => "2024-03-05",
            Kind::Time => "14:30:00.250Z",
            Kind::DateTime => "2024-03-05T14:30:00.250Z",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = KalaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(Kind::Date),
            "time" => Ok(Kind::Time),
            "datetime" => Ok(Kind::DateTime),
            other => Err(KalaError::unknown_kind(other)),
        }
    }
}

/// Raw date fields as matched, before value construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ParsedDate {
    pub year: i64,
    pub month: u8,
    pub day: u8,
}

impl Default for ParsedDate {
    fn default() -> Self {
        ParsedDate {
            year: 0,
            month: 1,
            day: 1,
        }
    }
}

/// Raw time fields as matched. `timezone` stays `None` when the input
/// carried no designator; resolution to a concrete timezone happens at
/// value construction, not here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ParsedTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub milliseconds: u16,
    pub timezone: Option<Timezone>,
}

/// Raw fields of a combined date-time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ParsedDateTime {
    pub date: ParsedDate,
    pub time: ParsedTime,
}

/// What the parser produced, tagged by the start rule that matched it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parsed {
    Date(ParsedDate),
    Time(ParsedTime),
    DateTime(ParsedDateTime),
}
