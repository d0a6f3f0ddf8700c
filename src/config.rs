//! Log configuration and mode mapping.

use std::{collections::BTreeMap, path::Path};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    types::{END_OF_HEADER, END_OF_RECORD, LengthUnit, LexMode, LineNo},
};

/// Key in a [`ModeMap`] used when a raw mode has no entry.
pub const DEFAULT_MODE_KEY: &str = "default";

/// Raw mode to display mode, e.g. `SSB` to `PH` for Cabrillo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeMap(HashMap<String, String>);

impl ModeMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one mapping; `raw` may be [`DEFAULT_MODE_KEY`].
    pub fn with(mut self, raw: impl Into<String>, display: impl Into<String>) -> Self {
        self.0.insert(raw.into(), display.into());
        self
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Maps `raw`, falling back to the default entry, then to `raw` itself.
    pub fn map<'a>(&'a self, raw: &'a str) -> &'a str {
        self.0
            .get(raw)
            .or_else(|| self.0.get(DEFAULT_MODE_KEY))
            .map(String::as_str)
            .unwrap_or(raw)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ModeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Settings for reading one ADIF document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Operator callsign, exposed to records as `own_call`.
    pub callsign: Option<String>,
    /// Log-level default fields consulted when a record lacks a field.
    pub defaults: BTreeMap<String, String>,
    /// Mode translation; an empty map behaves like no map.
    pub mode_map: Option<ModeMap>,
    /// End-of-record tag.
    pub end_of_record: String,
    /// End-of-header tag.
    pub end_of_header: String,
    /// Skip stray bytes between tokens instead of failing.
    pub tolerant: bool,
    /// Unit of declared value lengths.
    pub length_unit: LengthUnit,
    /// Line number of the first input line.
    pub first_line: LineNo,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            callsign: None,
            defaults: BTreeMap::new(),
            mode_map: None,
            end_of_record: END_OF_RECORD.to_string(),
            end_of_header: END_OF_HEADER.to_string(),
            tolerant: true,
            length_unit: LengthUnit::Chars,
            first_line: 1,
        }
    }
}

impl LogConfig {
    /// Parses a JSON configuration; absent keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Lexer mode selected by [`tolerant`](Self::tolerant).
    pub fn lex_mode(&self) -> LexMode {
        LexMode::from_tolerant(self.tolerant)
    }

    /// Mode map if one is set and non-empty.
    pub fn active_mode_map(&self) -> Option<&ModeMap> {
        self.mode_map.as_ref().filter(|m| !m.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_map_lookup_order() {
        let map = ModeMap::new().with("SSB", "PH").with("default", "XX");
        assert_eq!(map.map("SSB"), "PH");
        assert_eq!(map.map("CW"), "XX");

        let no_default: ModeMap = [("SSB", "PH")].into_iter().collect();
        assert_eq!(no_default.map("CW"), "CW");
    }

    #[test]
    fn json_config_fills_defaults() {
        let cfg = LogConfig::from_json_str(
            r#"{"callsign":"OE3RSU","mode_map":{"SSB":"PH","CW":"CW"},"length_unit":"bytes"}"#,
        )
        .unwrap();
        assert_eq!(cfg.callsign.as_deref(), Some("OE3RSU"));
        assert_eq!(cfg.end_of_record, "eor");
        assert!(cfg.tolerant);
        assert_eq!(cfg.length_unit, LengthUnit::Bytes);
        assert_eq!(cfg.active_mode_map().map(|m| m.map("SSB")), Some("PH"));
    }

    #[test]
    fn empty_mode_map_is_inactive() {
        let cfg = LogConfig {
            mode_map: Some(ModeMap::new()),
            ..LogConfig::default()
        };
        assert!(cfg.active_mode_map().is_none());
    }

    #[test]
    fn loads_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"end_of_record":"END","tolerant":false,"first_line":10}}"#).unwrap();
        file.flush().unwrap();

        let cfg = LogConfig::from_json_path(file.path()).unwrap();
        assert_eq!(cfg.end_of_record, "END");
        assert_eq!(cfg.lex_mode(), LexMode::Strict);
        assert_eq!(cfg.first_line, 10);
        assert!(matches!(
            LogConfig::from_json_path(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            LogConfig::from_json_str("{\"tolerant\": 3}"),
            Err(ConfigError::Json(_))
        ));
    }
}
