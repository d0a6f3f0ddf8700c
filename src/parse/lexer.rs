//! Pull-based ADIF tag lexer.
//!
//! The lexer owns a buffered reader and yields one [`Token`] per call to
//! [`TagLexer::next_token`]. Each call resumes at the reader's current
//! position. Dropping a lexer mid-token leaves the reader partially consumed;
//! resuming on that reader is not supported.

use std::io::{self, BufRead};

use crate::{
    parse::{ParseError, ParseResult, SyntaxErrorKind},
    types::{LengthUnit, LexMode, LineNo, Token},
};

/// Upper bound on capacity reserved up front from a declared length.
const VALUE_RESERVE_CAP: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Skip,
    Tag,
    Length,
    Value { chars_left: usize, continuation: u8 },
}

/// Finite-state tag lexer over a [`BufRead`] source.
pub struct TagLexer<R> {
    reader: R,
    line: LineNo,
    mode: LexMode,
    unit: LengthUnit,
    raw: Vec<u8>,
    skipped: usize,
}

impl<R: BufRead> TagLexer<R> {
    /// Creates a lexer starting at line 1.
    pub fn new(reader: R, mode: LexMode, unit: LengthUnit) -> Self {
        Self::with_line(reader, mode, unit, 1)
    }

    /// Creates a lexer whose line counter starts at `line`.
    pub fn with_line(reader: R, mode: LexMode, unit: LengthUnit, line: LineNo) -> Self {
        Self {
            reader,
            line,
            mode,
            unit,
            raw: Vec::new(),
            skipped: 0,
        }
    }

    /// Current line number.
    pub fn line(&self) -> LineNo {
        self.line
    }

    /// Bytes consumed by the most recent [`next_token`](Self::next_token) call.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Total stray bytes skipped so far in tolerant mode.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Next byte without consuming it.
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.reader.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let b = self.peek_byte()?;
        if b.is_some() {
            self.reader.consume(1);
        }
        Ok(b)
    }

    /// Consumes one byte of free text outside any token, counting newlines.
    pub(crate) fn read_text_byte(&mut self) -> io::Result<Option<u8>> {
        let b = self.read_byte()?;
        if b == Some(b'\n') {
            self.line += 1;
        }
        Ok(b)
    }

    fn between(&self) -> State {
        match self.mode {
            LexMode::Strict => State::Between,
            LexMode::Tolerant => State::Skip,
        }
    }

    /// Lexes the next token.
    ///
    /// Returns `Ok(None)` at end of input. A token cut short by end of input
    /// is dropped.
    pub fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.raw.clear();
        let mut state = self.between();
        let mut tag = Vec::new();
        let mut count = Vec::new();
        let mut value = Vec::new();

        while let Some(b) = self.read_byte()? {
            self.raw.push(b);
            match state {
                State::Between | State::Skip => {
                    if b.is_ascii_whitespace() {
                        if b == b'\n' {
                            self.line += 1;
                        }
                    } else if b == b'<' {
                        state = State::Tag;
                    } else if state == State::Skip {
                        self.skipped += 1;
                        tracing::debug!(line = self.line, byte = b, "skipping stray byte");
                    } else {
                        return Err(ParseError::syntax(
                            self.line,
                            SyntaxErrorKind::ExpectedTagStart(char::from(b)),
                        ));
                    }
                }
                State::Tag => match b {
                    b'>' | b':' if tag.is_empty() => {
                        return Err(ParseError::syntax(self.line, SyntaxErrorKind::EmptyTag));
                    }
                    b'>' => return Ok(Some(Token::new(decode(&tag), String::new()))),
                    b':' => state = State::Length,
                    _ => tag.push(b),
                },
                State::Length => {
                    if b != b'>' {
                        count.push(b);
                        continue;
                    }
                    let n = self.parse_count(&count)?;
                    if n == 0 {
                        return Ok(Some(Token::new(decode(&tag), String::new())));
                    }
                    value.reserve(n.min(VALUE_RESERVE_CAP));
                    state = State::Value {
                        chars_left: n,
                        continuation: 0,
                    };
                }
                State::Value {
                    mut chars_left,
                    mut continuation,
                } => {
                    value.push(b);
                    match self.unit {
                        LengthUnit::Bytes => chars_left -= 1,
                        LengthUnit::Chars => {
                            if continuation > 0 && is_continuation(b) {
                                continuation -= 1;
                            } else {
                                chars_left -= 1;
                                continuation = utf8_trailing(b);
                            }
                        }
                    }
                    // A truncated UTF-8 sequence ends the value at its last valid byte.
                    if chars_left == 0
                        && (continuation == 0
                            || !matches!(self.peek_byte()?, Some(next) if is_continuation(next)))
                    {
                        return Ok(Some(Token::new(decode(&tag), decode(&value))));
                    }
                    state = State::Value {
                        chars_left,
                        continuation,
                    };
                }
            }
        }

        if !matches!(state, State::Between | State::Skip) {
            tracing::warn!(
                line = self.line,
                tag = %decode(&tag),
                "input ended inside a token; token dropped"
            );
        }
        Ok(None)
    }

    fn parse_count(&self, text: &[u8]) -> ParseResult<usize> {
        let text = decode(text);
        if let Ok(n) = text.trim().parse::<usize>() {
            return Ok(n);
        }
        // <TAG:count:extra>, as written by some LoTW exporters and by the ADIF
        // data-type indicator. Only the count is kept.
        if self.mode == LexMode::Tolerant {
            if let Some((left, _)) = text.split_once(':') {
                if let Ok(n) = left.trim().parse::<usize>() {
                    return Ok(n);
                }
            }
        }
        Err(ParseError::syntax(self.line, SyntaxErrorKind::InvalidCount(text)))
    }
}

impl<R: BufRead> Iterator for TagLexer<R> {
    type Item = ParseResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Continuation bytes expected after a UTF-8 lead byte.
fn utf8_trailing(b: u8) -> u8 {
    match b {
        0xC0..=0xDF => 1,
        0xE0..=0xEF => 2,
        0xF0..=0xF7 => 3,
        _ => 0,
    }
}
