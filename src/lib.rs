//! Strict, locale-independent parsing of ISO-8601-style dates, times, and
//! combined datetimes, with canonical re-rendering.
//!
//! An input parses against exactly one start rule - [`Kind::Date`],
//! [`Kind::Time`], or [`Kind::DateTime`] - and the whole input must match.
//! A successful parse yields an immutable [`DateTime`] value that renders
//! itself back to canonical text, memoizing each rendering:
//!
//! ```
//! use kala::{Kind, Timezone};
//!
//! let value = kala::parse("2024-03-05T14:09:07.250Z", Kind::DateTime)?;
//! assert_eq!(value.year(), 2024);
//! assert_eq!(value.timezone(), Timezone::Utc);
//! assert_eq!(value.to_date_string(), "2024-03-05");
//! assert_eq!(value.to_datetime_string(), "2024-03-05T14:09:07.250Z");
//! # Ok::<(), kala::KalaError>(())
//! ```
//!
//! Failures are two kinds: [`KalaError::InvalidArgument`] for caller misuse
//! caught before parsing, and [`KalaError::Syntax`] for input the grammar or
//! a field-range check rejects, carrying the exact offending range.

pub use crate::datetime::{DateTime, Timezone};
pub use crate::diagnostics::{ErrorType, KalaError, Location, Position, SyntaxError};
pub use crate::syntax::Kind;

pub mod cli;
pub mod datetime;
pub mod diagnostics;
pub mod syntax;

/// Parse `input` against the start rule selected by `kind`.
///
/// Convenience for [`DateTime::parse`]; `str::parse::<DateTime>()` is the
/// same operation fixed to [`Kind::DateTime`].
pub fn parse(input: &str, kind: Kind) -> Result<DateTime, KalaError> {
    DateTime::parse(input, kind)
}
