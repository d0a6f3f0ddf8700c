//! QSO records and derived-field resolution.

use std::{borrow::Cow, fmt, sync::Arc};

use crate::{
    dates,
    document::LogContext,
    types::FieldMap,
};

/// Field resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// The name resolved through no layer, or a derived field's source was
    /// missing or malformed.
    #[error("field not found: {name}")]
    NotFound {
        /// Requested field name.
        name: String,
    },
}

impl FieldError {
    fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }
}

/// One QSO record.
///
/// Field lookup is case-insensitive and layered: derived fields (`frqint`,
/// `isodate`, mapped `mode`, `time_off` falling back to `time_on`), then the
/// record's own fields, then the owning log's default fields.
#[derive(Debug, Clone)]
pub struct Record {
    fields: FieldMap,
    context: Arc<LogContext>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for Record {}

impl Record {
    pub(crate) fn new(fields: FieldMap, context: Arc<LogContext>) -> Self {
        Self { fields, context }
    }

    /// Builds a record outside any parsed log; keys are lowercased.
    pub fn from_fields<K, V, I>(fields: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = fields
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
            .collect();
        Self::new(fields, Arc::new(LogContext::default()))
    }

    /// Raw parsed fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Log-level context shared with the owning log.
    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// Raw field value, no derivation or fallback.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name.to_lowercase().as_str()).map(String::as_str)
    }

    /// Resolves `name` through derived fields, own fields, and log defaults.
    pub fn get(&self, name: &str) -> Result<Cow<'_, str>, FieldError> {
        let n = name.to_lowercase();
        match n.as_str() {
            "frqint" => self
                .raw("freq")
                .and_then(khz_int)
                .map(Cow::Owned)
                .ok_or_else(|| FieldError::not_found(name)),
            "isodate" => self
                .raw("qso_date")
                .and_then(dates::iso_date)
                .map(Cow::Owned)
                .ok_or_else(|| FieldError::not_found(name)),
            "mode" => match self.context.mode_map() {
                Some(map) => self
                    .raw("mode")
                    .map(|raw| Cow::Borrowed(map.map(raw)))
                    .ok_or_else(|| FieldError::not_found(name)),
                None => self.lookup(&n, name),
            },
            "time_off" if !self.fields.contains_key("time_off") => self.get("time_on"),
            _ => self.lookup(&n, name),
        }
    }

    fn lookup(&self, key: &str, name: &str) -> Result<Cow<'_, str>, FieldError> {
        self.fields
            .get(key)
            .map(String::as_str)
            .or_else(|| self.context.field(key))
            .map(Cow::Borrowed)
            .ok_or_else(|| FieldError::not_found(name))
    }

    /// True when [`get`](Self::get) would consult a value for `name`.
    ///
    /// Always true for `frqint` and `isodate`, and for `mode` when a mode map
    /// is active, even if resolving them would fail.
    pub fn contains(&self, name: &str) -> bool {
        let n = name.to_lowercase();
        match n.as_str() {
            "frqint" | "isodate" => true,
            "mode" if self.context.mode_map().is_some() => true,
            "time_off" if !self.fields.contains_key("time_off") => self.contains("time_on"),
            _ => self.fields.contains_key(&n) || self.context.field(&n).is_some(),
        }
    }

    /// QSO start from `qso_date` and `time_on`, rendered with `format`
    /// (see [`dates::date_cvt`]).
    pub fn start_time(&self, format: Option<&str>) -> Result<String, FieldError> {
        let date = self.get("qso_date")?;
        let time = self.get("time_on")?;
        dates::date_cvt(&date, &time, format).ok_or_else(|| FieldError::not_found("start_time"))
    }

    /// QSO end from `qso_date_off` (or `qso_date`) and resolved `time_off`.
    pub fn end_time(&self, format: Option<&str>) -> Result<String, FieldError> {
        let date = self.get("qso_date_off").or_else(|_| self.get("qso_date"))?;
        let time = self.get("time_off")?;
        dates::date_cvt(&date, &time, format).ok_or_else(|| FieldError::not_found("end_time"))
    }

    /// Fixed-width Cabrillo `QSO:` line, see [`crate::cabrillo`].
    pub fn as_cabrillo(
        &self,
        fields: &[crate::cabrillo::CabrilloField],
    ) -> Result<String, FieldError> {
        crate::cabrillo::format_qso(self, fields)
    }

    /// Field keys in sorted order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// Renders the record as ADIF, one `<tag:len>value` per line sorted by tag,
/// then `<eor>`. Values are raw; lengths use the log's length unit.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.context.length_unit();
        for key in self.sorted_keys() {
            let value = &self.fields[key];
            writeln!(f, "<{}:{}>{}", key, unit.measure(value), value)?;
        }
        write!(f, "<eor>")
    }
}

/// MHz frequency text to integer kHz, rounding half up.
fn khz_int(freq: &str) -> Option<String> {
    let mhz: f64 = freq.trim().parse().ok()?;
    let khz = (mhz * 1000.0 + 0.5).trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if !khz.is_finite() || khz < i64::MIN as f64 || khz >= i64::MAX as f64 {
        return None;
    }
    Some(format!("{}", khz as i64))
}
