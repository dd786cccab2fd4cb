//! Kala Error Handling - Unified Diagnostic API
//!
//! Every failure this crate reports is one of two kinds: caller misuse
//! (`InvalidArgument`) detected before the grammar runs, or a rejection of
//! the input itself (`Syntax`). Syntax errors carry the original input and
//! the exact byte range at fault, render as an annotated two-line message,
//! and implement `miette::Diagnostic` for rich terminal reports.

use std::borrow::Cow;
use std::fmt;

use miette::{Diagnostic, LabeledSpan, SourceCode};
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::syntax::Kind;

// How many characters of the offending input a message shows before eliding.
const INPUT_PREVIEW_LIMIT: usize = 33;
const ELLIPSIS: char = '\u{2026}';

// ============================================================================
// LOCATIONS
// ============================================================================

/// A point in the input: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// The half-open range of input an error is attributed to. `start == end`
/// marks a point failure, such as unexpected end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Type-safe error classification that corresponds to KalaError variants.
/// Test code matches on this instead of on message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Caller misuse: empty input, unrecognized parse kind
    InvalidArgument,
    /// Input rejected by the grammar or a field-range check
    Syntax,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidArgument => "InvalidArgument",
            ErrorType::Syntax => "Syntax",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for all kala failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KalaError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl KalaError {
    /// Returns the type-safe classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            KalaError::InvalidArgument { .. } => ErrorType::InvalidArgument,
            KalaError::Syntax(_) => ErrorType::Syntax,
        }
    }

    pub(crate) fn empty_input() -> Self {
        KalaError::InvalidArgument {
            message: "input must be a non-empty string".to_string(),
        }
    }

    pub(crate) fn unknown_kind(found: &str) -> Self {
        KalaError::InvalidArgument {
            message: format!(
                "unknown parse kind {found:?}, expected \"date\", \"time\", or \"datetime\""
            ),
        }
    }
}

/// Input rejected by the grammar or a field-range check.
///
/// Displays as the detail message prefixed with a preview of the offending
/// input, followed by a caret line pointing at the columns at fault when
/// they are visible in the preview:
///
/// ```text
/// invalid date string "2024-13-01": month must be between 01 and 12
///                           ^^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    kind: Kind,
    input: String,
    message: String,
    location: Location,
}

impl SyntaxError {
    pub(crate) fn new(
        kind: Kind,
        input: impl Into<String>,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        SyntaxError {
            kind,
            input: input.into(),
            message: message.into(),
            location,
        }
    }

    /// The start rule the input was parsed against.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The input exactly as given, untruncated.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The bare detail message, without the input preview.
    pub fn detail(&self) -> &str {
        &self.message
    }

    /// The byte range and line/column of the offending input.
    pub fn location(&self) -> Location {
        self.location
    }
}

impl std::error::Error for SyntaxError {}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = format!("invalid {} string \"", self.kind);
        write!(f, "{prefix}{}\": {}", preview(&self.input), self.message)?;
        if let Some((pad, width)) = caret_geometry(&prefix, &self.input, self.location) {
            write!(f, "\n{}{}", " ".repeat(pad), "^".repeat(width))?;
        }
        Ok(())
    }
}

// ============================================================================
// MESSAGE RENDERING
// ============================================================================

// Byte length of the prefix of `input` that the preview shows.
fn preview_cut(input: &str) -> usize {
    input
        .char_indices()
        .nth(INPUT_PREVIEW_LIMIT)
        .map_or(input.len(), |(index, _)| index)
}

fn preview(input: &str) -> Cow<'_, str> {
    let cut = preview_cut(input);
    if cut < input.len() {
        Cow::Owned(format!("{}{ELLIPSIS}", &input[..cut]))
    } else {
        Cow::Borrowed(input)
    }
}

/// Leading pad and caret count for the second message line, in display
/// columns. `None` when truncation elided the offending range entirely.
fn caret_geometry(prefix: &str, input: &str, location: Location) -> Option<(usize, usize)> {
    let visible = preview_cut(input);
    let start = location.start.offset;
    if start >= visible && visible < input.len() {
        return None;
    }
    let start = start.min(visible);
    let end = location.end.offset.clamp(start, visible);

    let pad = prefix.width() + input[..start].width();
    // Point failures still get one caret.
    let width = input[start..end].width().max(1);
    Some((pad, width))
}

// ============================================================================
// MIETTE INTEGRATION
// ============================================================================

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("kala::syntax"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "expected a {} like {}",
            self.kind,
            self.kind.example()
        )))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.input)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let start = self.location.start.offset;
        let len = if self.location.end.offset > start {
            self.location.end.offset - start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message.clone()), start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

impl Diagnostic for KalaError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            KalaError::InvalidArgument { .. } => Some(Box::new("kala::argument")),
            KalaError::Syntax(error) => error.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            KalaError::InvalidArgument { .. } => None,
            KalaError::Syntax(error) => error.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            KalaError::InvalidArgument { .. } => None,
            KalaError::Syntax(error) => error.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            KalaError::InvalidArgument { .. } => None,
            KalaError::Syntax(error) => error.labels(),
        }
    }
}
