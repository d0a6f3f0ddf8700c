//! Parsed ADIF documents.
//!
//! # Examples
//!
//! ```
//! use adiflog::{config::LogConfig, document::AdifLog};
//!
//! let text = "Contest log\n<EOH>\n<CALL:6>DL1ABC<FREQ:6>14.074<MODE:3>SSB<EOR>\n";
//! let cfg = LogConfig { callsign: Some("OE3RSU".to_string()), ..LogConfig::default() };
//! let log = AdifLog::parse_str(text, &cfg).expect("parse");
//! assert_eq!(log.header(), Some("Contest log"));
//! assert_eq!(log.records()[0].get("own_call").unwrap(), "OE3RSU");
//! ```

/// QSO records and derived-field resolution.
pub mod record;
/// Gzip-wrapped TQ8 container.
pub mod tq8;

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    cabrillo::{self, CabrilloField},
    config::{LogConfig, ModeMap},
    parse::{
        ParseResult,
        assembler::RecordAssembler,
        header::{Header, read_header},
        lexer::TagLexer,
    },
    types::{FieldMap, LengthUnit},
};

use self::record::{FieldError, Record};

/// Version number for [`LogSnapshotV1`] payloads.
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Log-level state shared by every record of a log.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    fields: FieldMap,
    mode_map: Option<ModeMap>,
    length_unit: LengthUnit,
}

impl LogContext {
    /// Context with default `fields`; an empty mode map is dropped.
    pub fn new(fields: FieldMap, mode_map: Option<ModeMap>, length_unit: LengthUnit) -> Self {
        Self {
            fields,
            mode_map: mode_map.filter(|m| !m.is_empty()),
            length_unit,
        }
    }

    /// Context from configured defaults and callsign (as `own_call`).
    pub fn from_config(config: &LogConfig) -> Self {
        let mut fields = FieldMap::new();
        merge_defaults(&mut fields, config);
        Self::new(fields, config.active_mode_map().cloned(), config.length_unit)
    }

    /// Log-level field by lowercased name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// All log-level fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Active mode map.
    pub fn mode_map(&self) -> Option<&ModeMap> {
        self.mode_map.as_ref()
    }

    /// Unit used when re-serializing values.
    pub fn length_unit(&self) -> LengthUnit {
        self.length_unit
    }
}

/// Overlays configured defaults and `own_call` onto `fields`.
pub(crate) fn merge_defaults(fields: &mut FieldMap, config: &LogConfig) {
    for (k, v) in &config.defaults {
        fields.insert(k.to_lowercase(), v.clone());
    }
    if let Some(call) = &config.callsign {
        fields.insert("own_call".to_string(), call.clone());
    }
}

/// Serializable copy of a parsed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSnapshotV1 {
    /// Payload format version.
    pub format_version: u16,
    /// Operator or station callsign.
    pub callsign: Option<String>,
    /// Header free text.
    pub header: Option<String>,
    /// Header tags.
    pub header_fields: BTreeMap<String, String>,
    /// Non-standard end-of-file marker tag.
    pub eof_mark: Option<String>,
    /// Raw record fields in document order.
    pub records: Vec<BTreeMap<String, String>>,
}

/// A parsed ADIF document. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct AdifLog {
    context: Arc<LogContext>,
    callsign: Option<String>,
    header: Option<String>,
    header_fields: FieldMap,
    records: Vec<Record>,
    eof_mark: Option<String>,
}

impl AdifLog {
    /// Parses a document from `reader` in one pass.
    ///
    /// The first non-whitespace byte decides whether a header is present: a
    /// document starting with `<` has none.
    pub fn parse<R: BufRead>(reader: R, config: &LogConfig) -> ParseResult<Self> {
        let mut lexer = TagLexer::with_line(
            reader,
            config.lex_mode(),
            config.length_unit,
            config.first_line,
        );

        while matches!(lexer.peek_byte()?, Some(b) if b.is_ascii_whitespace()) {
            lexer.read_text_byte()?;
        }
        let header = match lexer.peek_byte()? {
            Some(b'<') | None => Header::default(),
            Some(_) => read_header(&mut lexer, &config.end_of_header)?,
        };

        let context = Arc::new(LogContext::from_config(config));
        let assembler = RecordAssembler::new(config.end_of_record.clone());
        let (records, eof_mark) = read_records(&mut lexer, &assembler, &context)?;

        tracing::debug!(
            records = records.len(),
            header_fields = header.fields.len(),
            line = lexer.line(),
            skipped = lexer.skipped(),
            "parsed ADIF log"
        );

        Ok(Self {
            context,
            callsign: config.callsign.clone(),
            header: header.text,
            header_fields: header.fields,
            records,
            eof_mark,
        })
    }

    /// Parses a document held in memory.
    pub fn parse_str(text: &str, config: &LogConfig) -> ParseResult<Self> {
        Self::parse(text.as_bytes(), config)
    }

    /// Opens and parses the file at `path`.
    pub fn open(path: impl AsRef<Path>, config: &LogConfig) -> ParseResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), config)
    }

    /// Records in document order, EOF marker excluded.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the log has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Operator or station callsign.
    pub fn callsign(&self) -> Option<&str> {
        self.callsign.as_deref()
    }

    /// Header free text; `None` without a header or end-of-header tag.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Tags found in the header, keys lowercased.
    pub fn header_fields(&self) -> &FieldMap {
        &self.header_fields
    }

    /// Name from a leading `File: <name>` header line.
    pub fn file_name(&self) -> Option<&str> {
        let first = self.header.as_deref()?.lines().next()?;
        first.strip_prefix("File: ").map(str::trim_end)
    }

    /// Tag of a trailing non-standard end-of-file marker such as `app_eof`.
    pub fn eof_mark(&self) -> Option<&str> {
        self.eof_mark.as_deref()
    }

    /// Log-level context used for field fallback.
    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// Cabrillo document; see [`cabrillo::format_log`].
    pub fn as_cabrillo<K, V>(
        &self,
        fields: &[CabrilloField],
        header: &[(K, V)],
    ) -> Result<String, FieldError>
    where
        K: AsRef<str>,
        V: fmt::Display,
    {
        cabrillo::format_log(&self.records, fields, header)
    }

    /// Serializable copy of the log.
    pub fn export_snapshot(&self) -> LogSnapshotV1 {
        LogSnapshotV1 {
            format_version: SNAPSHOT_FORMAT_VERSION,
            callsign: self.callsign.clone(),
            header: self.header.clone(),
            header_fields: sorted(&self.header_fields),
            eof_mark: self.eof_mark.clone(),
            records: self.records.iter().map(|r| sorted(r.fields())).collect(),
        }
    }

    /// Snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export_snapshot())
    }
}

/// Records rendered as ADIF, separated by blank lines.
impl fmt::Display for AdifLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rec) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{rec}")?;
        }
        Ok(())
    }
}

/// Assembles records until end of stream and detaches a trailing EOF marker.
pub(crate) fn read_records<R: BufRead>(
    lexer: &mut TagLexer<R>,
    assembler: &RecordAssembler,
    context: &Arc<LogContext>,
) -> ParseResult<(Vec<Record>, Option<String>)> {
    let mut records = Vec::new();
    while let Some(fields) = assembler.next_record(lexer)? {
        records.push(Record::new(fields, Arc::clone(context)));
    }
    let eof_mark = detach_eof_mark(&mut records);
    Ok((records, eof_mark))
}

fn detach_eof_mark(records: &mut Vec<Record>) -> Option<String> {
    let last = records.last()?;
    if last.fields().len() != 1 {
        return None;
    }
    let (key, value) = last.fields().iter().next()?;
    if !key.contains("eof") || !value.is_empty() {
        return None;
    }
    let key = key.clone();
    records.pop();
    tracing::debug!(mark = %key, "detached end-of-file marker");
    Some(key)
}

fn sorted(fields: &FieldMap) -> BTreeMap<String, String> {
    fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}
