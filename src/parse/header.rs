//! Header reader for the free text and tags preceding the first record.

use std::io::BufRead;

use crate::{
    parse::{ParseError, ParseResult, lexer::TagLexer},
    types::FieldMap,
};

/// Header of an ADIF document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Free text, trimmed; `None` when no end-of-header tag was found.
    pub text: Option<String>,
    /// Tags found inside the header, keys lowercased.
    pub fields: FieldMap,
}

/// Reads free text and header tags up to and including `end_tag`.
///
/// A malformed pseudo-tag inside the text is kept as literal text.
pub fn read_header<R: BufRead>(lexer: &mut TagLexer<R>, end_tag: &str) -> ParseResult<Header> {
    let mut text = Vec::new();
    let mut fields = FieldMap::new();

    loop {
        match lexer.peek_byte()? {
            None => break,
            Some(b'<') => match lexer.next_token() {
                Ok(Some(tok)) if tok.is(end_tag) && tok.value.is_empty() => {
                    let text = String::from_utf8_lossy(&text).trim().to_string();
                    return Ok(Header {
                        text: Some(text),
                        fields,
                    });
                }
                Ok(Some(tok)) => {
                    fields.insert(tok.key(), tok.value);
                }
                Ok(None) => {
                    text.extend_from_slice(lexer.raw());
                    break;
                }
                Err(ParseError::Syntax { line, kind }) => {
                    tracing::debug!(line, error = %kind, "malformed tag in header kept as text");
                    text.extend_from_slice(lexer.raw());
                }
                Err(err) => return Err(err),
            },
            Some(_) => {
                if let Some(b) = lexer.read_text_byte()? {
                    text.push(b);
                }
            }
        }
    }

    tracing::warn!(
        line = lexer.line(),
        end_tag,
        "no end-of-header tag before end of input"
    );
    Ok(Header { text: None, fields })
}
