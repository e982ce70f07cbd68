//! Parse errors.

/// Error returned when markup cannot be parsed.
///
/// Parsing is all-or-nothing: no partial tree is produced alongside an error.
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Indentation width is not a multiple of the detected unit.
    #[error("line {line}: indentation of {width} columns is not a multiple of {unit}: {content}")]
    BadIndent {
        line: usize,
        /// Offending line, trimmed.
        content: String,
        width: usize,
        unit: usize,
    },
    /// An inline close tag does not match the innermost open tag.
    #[error("line {line}: closing tag [/{found}] {}", expected_clause(.expected.as_deref()))]
    MismatchedTag {
        line: usize,
        /// Innermost open tag, if any was open.
        expected: Option<String>,
        found: String,
    },
    /// Inline tags still open at the end of the line.
    #[error("line {line}: unclosed inline tag(s) {}", .tags.join(", "))]
    UnclosedTag {
        line: usize,
        /// Open tags, outermost first.
        tags: Vec<String>,
    },
    /// Block plus inline nesting exceeded the configured ceiling.
    #[error("line {line}: nesting exceeds the limit of {limit} levels")]
    TooDeep { line: usize, limit: usize },
}

impl ParseError {
    /// Line the error was found on.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::BadIndent { line, .. }
            | Self::MismatchedTag { line, .. }
            | Self::UnclosedTag { line, .. }
            | Self::TooDeep { line, .. } => *line,
        }
    }
}

fn expected_clause(expected: Option<&str>) -> String {
    match expected {
        Some(name) => format!("does not match open tag [{name}]"),
        None => "has no open tag to close".to_owned(),
    }
}
