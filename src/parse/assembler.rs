//! Record assembly from a token stream.

use std::io::BufRead;

use crate::{
    parse::{ParseError, ParseResult, SyntaxErrorKind, lexer::TagLexer},
    types::{END_OF_RECORD, FieldMap},
};

/// Collects tokens into field maps terminated by an end-of-record tag.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    end_tag: String,
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(END_OF_RECORD)
    }
}

impl RecordAssembler {
    /// Assembler for records ending in `end_tag` (case-insensitive).
    pub fn new(end_tag: impl Into<String>) -> Self {
        Self {
            end_tag: end_tag.into(),
        }
    }

    /// Reads the next record.
    ///
    /// Returns `Ok(None)` when no field precedes the end-of-record tag or the
    /// end of input; that marks the end of the record stream.
    pub fn next_record<R: BufRead>(
        &self,
        lexer: &mut TagLexer<R>,
    ) -> ParseResult<Option<FieldMap>> {
        let mut fields = FieldMap::new();
        let mut terminated = false;

        while let Some(tok) = lexer.next_token()? {
            if tok.is(&self.end_tag) {
                if !tok.value.is_empty() {
                    return Err(ParseError::syntax(
                        lexer.line(),
                        SyntaxErrorKind::InvalidEndTag(self.end_tag.clone()),
                    ));
                }
                terminated = true;
                break;
            }
            fields.insert(tok.key(), tok.value);
        }

        if fields.is_empty() {
            if terminated {
                tracing::debug!(line = lexer.line(), "empty record ends the record stream");
            }
            return Ok(None);
        }
        if !terminated {
            tracing::debug!(
                line = lexer.line(),
                fields = fields.len(),
                "record ended by end of input"
            );
        }
        Ok(Some(fields))
    }
}
