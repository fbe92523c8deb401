//! Error types for query lexing and parsing.

use std::fmt;

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.format_with_context())]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }

    /// Formats the error with a position indicator showing where the error occurred.
    pub fn format_with_context(&self) -> String {
        format!(
            "query syntax error: {}\n  {}\n  {}^",
            self.message,
            self.input,
            " ".repeat(caret_column(&self.input, self.position))
        )
    }
}

/// Display column of byte offset `position` in `input`, clamped to its end.
fn caret_column(input: &str, position: usize) -> usize {
    input
        .char_indices()
        .take_while(|(offset, _)| *offset < position)
        .count()
}

/// Parse error with the byte offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte position of the offending token, `None` at end of input.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A unified error type for query parsing.
///
/// Carries the original query so the error can point at the offending spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string (if available).
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Lexer error (tokenization failed).
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// Parser error (invalid syntax).
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input (if available).
        position: Option<usize>,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query,
        }
    }

    /// Sets the query string for this error.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. } | QueryErrorKind::Parse { message, .. } => message,
        }
    }

    /// Returns the byte position of the error, if known.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        if message.contains("unclosed quote") {
            Some("Add a closing quote (\") to complete the phrase")
        } else if message.contains("closing parenthesis") {
            Some("Add a closing parenthesis ) to match the opening one")
        } else if message.contains("OR") {
            Some("OR requires expressions on both sides, e.g., 'rust OR golang'")
        } else if message.starts_with("expected term, phrase") {
            Some("A field prefix needs a value, e.g., 'title:guide'")
        } else if message.contains("range") {
            Some("Ranges look like [a TO b]; use ] or [ on either end for an exclusive bound")
        } else if message.contains("comparison") {
            Some("Comparisons need a value, e.g., 'year>=2001'")
        } else {
            None
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query syntax error: {}", self.message())?;

        // Show the query with a pointer under the error position
        if let Some(query) = &self.query {
            writeln!(f, "  {query}")?;
            if let Some(pos) = self.position() {
                writeln!(f, "  {}^", " ".repeat(caret_column(query, pos)))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: err.message,
                position: err.position,
            },
            query: Some(err.input),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: err.message,
                position: err.position,
            },
            query: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::lex("unclosed quote", 0, "\"hello world");
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("\"hello world"));
        assert!(display.contains('^'));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn lex_error_context_points_at_position() {
        let err = LexError::new("unclosed quote", 5, "rust \"async");
        assert_eq!(
            err.to_string(),
            "query syntax error: unclosed quote\n  rust \"async\n       ^"
        );
    }

    #[test]
    fn caret_counts_characters_not_bytes() {
        // "é" is two bytes; the quote sits at byte 3 but column 2
        let err = LexError::new("unclosed quote", 3, "é \"x");
        assert_eq!(
            err.to_string(),
            "query syntax error: unclosed quote\n  é \"x\n    ^"
        );

        let err = QueryError::lex("unclosed quote", 3, "é \"x");
        assert!(err.to_string().contains("\n    ^\n"));
    }

    #[test]
    fn parse_error_display() {
        let err = QueryError::parse(
            "expected closing parenthesis",
            Some(5),
            Some("(rust".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("expected closing parenthesis"));
        assert!(display.contains("(rust"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn position_is_clamped_to_query() {
        let err = QueryError::parse("unexpected end of query", Some(99), Some("ab".into()));
        assert!(err.to_string().contains("\n    ^"));
    }

    #[test]
    fn error_with_query() {
        let err = QueryError::parse("test error", None, None).with_query("xyz:value");
        assert_eq!(err.query.as_deref(), Some("xyz:value"));
    }

    #[test]
    fn message_extraction() {
        let err = QueryError::lex("test message", 0, "query");
        assert_eq!(err.message(), "test message");
        assert_eq!(err.position(), Some(0));
    }

    #[test]
    fn or_error_suggestion() {
        let err = QueryError::parse("unexpected OR", None, None);
        assert!(err.suggestion().unwrap().contains("OR requires"));
    }

    #[test]
    fn range_error_suggestion() {
        let err = QueryError::parse("expected TO in range", None, None);
        assert!(err.suggestion().unwrap().contains("[a TO b]"));
    }

    #[test]
    fn parse_error_keeps_position() {
        let err = QueryError::from(ParseError::new("unexpected token", Some(3)));
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.query, None);
    }
}
