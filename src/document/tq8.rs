//! TQ8 container: gzip-compressed ADIF-style records as written by TrustedQSL.
//!
//! The stream starts with a `tCERT` record and a `tSTATION` record, followed
//! by ordinary QSO records. Lengths count bytes.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    sync::Arc,
};

use flate2::read::GzDecoder;

use crate::{
    config::LogConfig,
    document::{AdifLog, LogContext, merge_defaults, read_records},
    parse::{ParseError, ParseResult, assembler::RecordAssembler, lexer::TagLexer},
    types::{FieldMap, LengthUnit},
};

/// Record-type field of TQ8 preamble records.
pub const REC_TYPE: &str = "rec_type";
/// Record type of the first preamble record.
pub const CERT_RECORD: &str = "tCERT";
/// Record type of the second preamble record.
pub const STATION_RECORD: &str = "tSTATION";

impl AdifLog {
    /// Parses a gzip-compressed TQ8 stream.
    ///
    /// Both preamble records are required; a missing or mistyped one fails
    /// with [`ParseError::Preamble`]. Their fields become log-level fields,
    /// overlaid by the configured defaults. `own_call` is the configured
    /// callsign or else the station record's `call`.
    pub fn parse_tq8<R: Read>(reader: R, config: &LogConfig) -> ParseResult<Self> {
        let mut lexer = TagLexer::with_line(
            BufReader::new(GzDecoder::new(reader)),
            config.lex_mode(),
            LengthUnit::Bytes,
            config.first_line,
        );
        let assembler = RecordAssembler::new(config.end_of_record.clone());

        let cert = read_preamble(&assembler, &mut lexer, CERT_RECORD)?;
        let station = read_preamble(&assembler, &mut lexer, STATION_RECORD)?;
        let station_call = station.get("call").cloned();
        tracing::debug!(station_call = ?station_call, "read TQ8 preamble");

        let mut fields = FieldMap::new();
        fields.extend(cert);
        fields.extend(station);
        merge_defaults(&mut fields, config);
        let callsign = config.callsign.clone().or(station_call);
        if let Some(call) = &callsign {
            fields.insert("own_call".to_string(), call.clone());
        }

        let mode_map = config.active_mode_map().cloned();
        let context = Arc::new(LogContext::new(fields, mode_map, LengthUnit::Bytes));
        let (records, eof_mark) = read_records(&mut lexer, &assembler, &context)?;
        tracing::debug!(records = records.len(), "parsed TQ8 log");

        Ok(Self {
            context,
            callsign,
            header: None,
            header_fields: FieldMap::new(),
            records,
            eof_mark,
        })
    }

    /// Opens and parses the TQ8 file at `path`.
    pub fn open_tq8(path: impl AsRef<Path>, config: &LogConfig) -> ParseResult<Self> {
        Self::parse_tq8(File::open(path)?, config)
    }
}

fn read_preamble<R: BufRead>(
    assembler: &RecordAssembler,
    lexer: &mut TagLexer<R>,
    expected: &'static str,
) -> ParseResult<FieldMap> {
    let fields = assembler
        .next_record(lexer)?
        .ok_or(ParseError::Preamble { expected, found: None })?;
    let found = fields.get(REC_TYPE).cloned();
    if found.as_deref() == Some(expected) {
        Ok(fields)
    } else {
        Err(ParseError::Preamble { expected, found })
    }
}
