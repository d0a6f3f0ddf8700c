//! ADIF tag-stream parsing: lexer, header reader, and record assembler.

/// Groups tokens into records terminated by the end-of-record tag.
pub mod assembler;
/// Free-text and tagged header reader.
pub mod header;
/// Character-level tag lexer.
pub mod lexer;

use crate::types::LineNo;

/// Malformed tag grammar detected by the lexer or assembler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    /// A byte other than whitespace or `<` where a tag must start.
    #[error("Expected tag start, got {0:?}")]
    ExpectedTagStart(char),
    /// `<>` or `<:` with no tag name.
    #[error("Empty tag")]
    EmptyTag,
    /// Length text that is not an unsigned integer.
    #[error("Invalid count: {0}")]
    InvalidCount(String),
    /// The end-of-record tag carried a value.
    #[error("Invalid {0}")]
    InvalidEndTag(String),
}

/// Errors raised while reading an ADIF document.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed input at `line`.
    #[error("{line}: {kind}")]
    Syntax {
        /// Line on which the error was detected.
        line: LineNo,
        /// What went wrong.
        kind: SyntaxErrorKind,
    },
    /// Failure reading (or decompressing) the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A TQ8 preamble record did not have the expected record type.
    #[error("TQ8 preamble: expected rec_type {expected}, found {found:?}")]
    Preamble {
        /// Record type required at this position.
        expected: &'static str,
        /// Record type actually found, if any.
        found: Option<String>,
    },
}

impl ParseError {
    pub(crate) fn syntax(line: LineNo, kind: SyntaxErrorKind) -> Self {
        Self::Syntax { line, kind }
    }

    /// True for recoverable grammar errors.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Result alias for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
