//! Kala Parser - Grammar-Directed Field Extraction
//!
//! Converts input text into raw field records with source location tracking.
//! This layer is purely syntactic plus field-range checks - no timezone
//! defaulting or value construction happens here.

use pest::{
    error::{Error, InputLocation, LineColLocation},
    iterators::Pair,
    Parser,
};
use pest_derive::Parser;

use crate::datetime::Timezone;
use crate::diagnostics::{Location, Position, SyntaxError};
use crate::syntax::{Kind, Parsed, ParsedDate, ParsedDateTime, ParsedTime};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct KalaParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse input against the start rule selected by `kind`.
///
/// The whole input must match: the grammar anchors every start rule at both
/// ends. Field ranges (month 1-12, hours 0-23, and so on) are enforced here
/// rather than in the grammar so that a range failure reports the exact
/// digits at fault instead of a bare position.
pub fn parse(input: &str, kind: Kind) -> Result<Parsed, SyntaxError> {
    let pairs = KalaParser::parse(start_rule(kind), input)
        .map_err(|error| convert_parse_error(error, input, kind))?;

    let root = pairs.peek().unwrap(); // pest guarantees the start rule pair exists
    let root_location = location_of(&root);

    let mut date = None;
    let mut time = None;

    for part in root.into_inner() {
        match part.as_rule() {
            Rule::full_date => date = Some(walk_date(part, input, kind)?),
            Rule::full_time => time = Some(walk_time(part, input, kind)?),
            Rule::EOI => {}
            _ => return Err(unsupported_rule(&part, input, kind)),
        }
    }

    match (kind, date, time) {
        (Kind::Date, Some(date), None) => Ok(Parsed::Date(date)),
        (Kind::Time, None, Some(time)) => Ok(Parsed::Time(time)),
        (Kind::DateTime, Some(date), Some(time)) => {
            Ok(Parsed::DateTime(ParsedDateTime { date, time }))
        }
        _ => Err(SyntaxError::new(
            kind,
            input,
            "start rule produced an unexpected shape",
            root_location,
        )),
    }
}

// ============================================================================
// RECORD BUILDERS
// ============================================================================

fn walk_date(pair: Pair<Rule>, input: &str, kind: Kind) -> Result<ParsedDate, SyntaxError> {
    let mut date = ParsedDate::default();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::year => date.year = signed_year(part.as_str()),
            Rule::month => date.month = field_in_range(&part, input, kind, 1, 12, "month")?,
            Rule::day => date.day = field_in_range(&part, input, kind, 1, 31, "day")?,
            _ => return Err(unsupported_rule(&part, input, kind)),
        }
    }

    Ok(date)
}

fn walk_time(pair: Pair<Rule>, input: &str, kind: Kind) -> Result<ParsedTime, SyntaxError> {
    let mut time = ParsedTime::default();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::hours => time.hours = field_in_range(&part, input, kind, 0, 23, "hours")?,
            Rule::minutes => time.minutes = field_in_range(&part, input, kind, 0, 59, "minutes")?,
            Rule::seconds => time.seconds = field_in_range(&part, input, kind, 0, 59, "seconds")?,
            Rule::fraction => {
                let millis = part.into_inner().next().unwrap(); // grammar guarantees milliseconds exists
                time.milliseconds = digits_u16(millis.as_str());
            }
            Rule::timezone => time.timezone = Some(walk_timezone(part, input, kind)?),
            _ => return Err(unsupported_rule(&part, input, kind)),
        }
    }

    Ok(time)
}

fn walk_timezone(pair: Pair<Rule>, input: &str, kind: Kind) -> Result<Timezone, SyntaxError> {
    let designator = pair.into_inner().next().unwrap(); // grammar guarantees inner exists

    match designator.as_rule() {
        Rule::utc_marker => Ok(Timezone::Utc),
        Rule::utc_offset => {
            let mut negative = false;
            let mut hours = 0i16;
            let mut minutes = 0i16;

            for part in designator.into_inner() {
                match part.as_rule() {
                    Rule::sign => negative = part.as_str() == "-",
                    Rule::offset_hours => {
                        hours =
                            field_in_range(&part, input, kind, 0, 23, "timezone hours")?.into();
                    }
                    Rule::offset_minutes => {
                        minutes =
                            field_in_range(&part, input, kind, 0, 59, "timezone minutes")?.into();
                    }
                    _ => return Err(unsupported_rule(&part, input, kind)),
                }
            }

            let total = hours * 60 + minutes;
            Ok(Timezone::Offset(if negative { -total } else { total }))
        }
        _ => Err(unsupported_rule(&designator, input, kind)),
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn start_rule(kind: Kind) -> Rule {
    match kind {
        Kind::Date => Rule::date,
        Kind::Time => Rule::time,
        Kind::DateTime => Rule::datetime,
    }
}

fn field_in_range(
    pair: &Pair<Rule>,
    input: &str,
    kind: Kind,
    low: u8,
    high: u8,
    field: &str,
) -> Result<u8, SyntaxError> {
    let value = digits_u8(pair.as_str());
    if value < low || value > high {
        return Err(SyntaxError::new(
            kind,
            input,
            format!("{field} must be between {low:02} and {high:02}"),
            location_of(pair),
        ));
    }
    Ok(value)
}

// The digit folds below rely on the grammar: the matched text is ASCII
// digits only, within widths that cannot overflow the target type.

fn digits_u8(text: &str) -> u8 {
    text.bytes().fold(0, |n, b| n * 10 + (b - b'0'))
}

fn digits_u16(text: &str) -> u16 {
    text.bytes().fold(0, |n, b| n * 10 + u16::from(b - b'0'))
}

fn signed_year(text: &str) -> i64 {
    let (sign, digits) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    sign * digits
        .bytes()
        .fold(0i64, |n, b| n * 10 + i64::from(b - b'0'))
}

fn location_of(pair: &Pair<Rule>) -> Location {
    let span = pair.as_span();
    let (start_line, start_column) = span.start_pos().line_col();
    let (end_line, end_column) = span.end_pos().line_col();
    Location {
        start: Position {
            offset: span.start(),
            line: start_line,
            column: start_column,
        },
        end: Position {
            offset: span.end(),
            line: end_line,
            column: end_column,
        },
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn unsupported_rule(pair: &Pair<Rule>, input: &str, kind: Kind) -> SyntaxError {
    SyntaxError::new(
        kind,
        input,
        format!("unsupported rule: {:?}", pair.as_rule()),
        location_of(pair),
    )
}

fn convert_parse_error(error: Error<Rule>, input: &str, kind: Kind) -> SyntaxError {
    let (start_offset, end_offset) = match &error.location {
        InputLocation::Pos(offset) => (*offset, *offset),
        InputLocation::Span((start, end)) => (*start, *end),
    };
    let ((start_line, start_column), (end_line, end_column)) = match &error.line_col {
        LineColLocation::Pos(pos) => (*pos, *pos),
        LineColLocation::Span(start, end) => (*start, *end),
    };

    let message = error.renamed_rules(rule_name).variant.message().into_owned();

    SyntaxError::new(
        kind,
        input,
        message,
        Location {
            start: Position {
                offset: start_offset,
                line: start_line,
                column: start_column,
            },
            end: Position {
                offset: end_offset,
                line: end_line,
                column: end_column,
            },
        },
    )
}

fn rule_name(rule: &Rule) -> String {
    let name = match rule {
        Rule::date | Rule::full_date => "a calendar date",
        Rule::time | Rule::full_time => "a wall-clock time",
        Rule::datetime => "a combined date-time",
        Rule::year => "a year",
        Rule::year_simple => "a 4-digit year",
        Rule::year_extended => "a sign followed by a 6-digit year",
        Rule::month => "a 2-digit month",
        Rule::day => "a 2-digit day",
        Rule::hours => "2-digit hours",
        Rule::minutes => "2-digit minutes",
        Rule::seconds => "2-digit seconds",
        Rule::fraction => "a 3-digit fraction",
        Rule::milliseconds => "3 fraction digits",
        Rule::timezone => "a timezone designator",
        Rule::utc_marker => "the UTC marker \"Z\"",
        Rule::utc_offset => "a signed HH:MM offset",
        Rule::offset_hours => "2-digit offset hours",
        Rule::offset_minutes => "2-digit offset minutes",
        Rule::sign => "a \"+\" or \"-\" sign",
        Rule::EOI => "end of input",
    };
    name.to_string()
}
