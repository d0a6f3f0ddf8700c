//! Shared primitive types for tokens, field maps, and lexer settings.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// One-based input line number, used for diagnostics only.
pub type LineNo = u64;

/// Lowercased tag name to value. Last write wins.
pub type FieldMap = HashMap<String, String>;

/// Default end-of-record tag.
pub const END_OF_RECORD: &str = "eor";
/// Default end-of-header tag.
pub const END_OF_HEADER: &str = "eoh";

/// One `<TAG:LENGTH>VALUE` or bare `<TAG>` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Tag name as written in the input.
    pub tag: String,
    /// Value; empty for bare tags.
    pub value: String,
}

impl Token {
    /// Builds a token from tag and value.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Normalized (lowercased) tag used as a field key.
    pub fn key(&self) -> String {
        self.tag.to_lowercase()
    }

    /// Case-insensitive tag comparison.
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Unit in which a declared value length is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    /// UTF-8 characters; an undecodable byte counts as one character.
    #[default]
    Chars,
    /// Raw bytes.
    Bytes,
}

impl LengthUnit {
    /// Length of `value` measured in this unit.
    pub fn measure(self, value: &str) -> usize {
        match self {
            Self::Chars => value.chars().count(),
            Self::Bytes => value.len(),
        }
    }
}

/// How the lexer treats stray input between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    /// Anything other than whitespace or `<` between tokens is an error.
    Strict,
    /// Stray bytes between tokens are skipped; `count:extra` lengths accepted.
    Tolerant,
}

impl LexMode {
    /// Maps the `tolerant` config flag to a mode.
    pub fn from_tolerant(tolerant: bool) -> Self {
        if tolerant { Self::Tolerant } else { Self::Strict }
    }
}
