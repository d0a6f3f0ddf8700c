//! Cabrillo contest-log rendering.

use std::{fmt, str::FromStr};

use crate::{
    document::record::{FieldError, Record},
    error::ConfigError,
};

/// Default `QSO:` line layout as `(field, width)`.
pub const DEFAULT_FIELDS: &[(&str, usize)] = &[
    ("frqint", 5),
    ("mode", 2),
    ("isodate", 10),
    ("time_off", 4),
    ("own_call", 13),
    ("rst_sent", 3),
    ("call", 13),
    ("rst_rcvd", 3),
    ("gridsquare", 4),
];

/// Trailer line of every Cabrillo document.
pub const END_OF_LOG: &str = "END_OF_LOG:";

/// One column of a `QSO:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabrilloField {
    /// Field name resolved on each record.
    pub name: String,
    /// Exact column width.
    pub width: usize,
}

impl CabrilloField {
    /// Column for `name` of `width` characters.
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

impl FromStr for CabrilloField {
    type Err = ConfigError;

    /// Parses `name:width`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, width) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::FieldSpec(s.to_string()))?;
        let width = width
            .trim()
            .parse()
            .map_err(|_| ConfigError::FieldSpec(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::FieldSpec(s.to_string()));
        }
        Ok(Self::new(name, width))
    }
}

/// [`DEFAULT_FIELDS`] as columns.
pub fn default_fields() -> Vec<CabrilloField> {
    DEFAULT_FIELDS
        .iter()
        .map(|(name, width)| CabrilloField::new(*name, *width))
        .collect()
}

/// Left-justifies `value` in exactly `width` characters, padding with spaces
/// or truncating.
pub fn fit(value: &str, width: usize) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Renders one `QSO:` line. Empty `fields` selects [`DEFAULT_FIELDS`].
///
/// A field that does not resolve aborts the line.
pub fn format_qso(record: &Record, fields: &[CabrilloField]) -> Result<String, FieldError> {
    let defaults;
    let fields = if fields.is_empty() {
        defaults = default_fields();
        &defaults[..]
    } else {
        fields
    };

    let mut line = String::from("QSO:");
    for field in fields {
        let value = record.get(&field.name)?;
        line.push(' ');
        line.push_str(&fit(&value, field.width));
    }
    Ok(line)
}

/// Renders a Cabrillo document: `KEY: value` header lines (keys upper-cased),
/// one `QSO:` line per record, then [`END_OF_LOG`]. Lines are joined by `\n`.
pub fn format_log<'a, I, K, V>(
    records: I,
    fields: &[CabrilloField],
    header: &[(K, V)],
) -> Result<String, FieldError>
where
    I: IntoIterator<Item = &'a Record>,
    K: AsRef<str>,
    V: fmt::Display,
{
    let mut lines: Vec<String> = header
        .iter()
        .map(|(k, v)| format!("{}: {}", k.as_ref().to_uppercase(), v))
        .collect();
    for record in records {
        lines.push(format_qso(record, fields)?);
    }
    lines.push(END_OF_LOG.to_string());
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qso() -> Record {
        Record::from_fields([
            ("freq", "14.074"),
            ("mode", "SSB"),
            ("qso_date", "20230615"),
            ("time_on", "1234"),
            ("own_call", "OE3RSU"),
            ("rst_sent", "59"),
            ("call", "DL1ABC"),
            ("rst_rcvd", "57"),
            ("gridsquare", "JN88de"),
        ])
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("OE3RSU", 13), "OE3RSU       ");
        assert_eq!(fit("JN88de", 4), "JN88");
        assert_eq!(fit("", 3), "   ");
        assert_eq!(fit("Jürg", 5), "Jürg ");
    }

    #[test]
    fn default_line_layout() {
        assert_eq!(
            format_qso(&qso(), &[]).unwrap(),
            "QSO: 14074 SS 2023-06-15 1234 OE3RSU        59  DL1ABC        57  JN88"
        );
    }

    #[test]
    fn custom_columns() {
        let fields = [CabrilloField::new("call", 8), CabrilloField::new("MODE", 3)];
        assert_eq!(format_qso(&qso(), &fields).unwrap(), "QSO: DL1ABC   SSB");
    }

    #[test]
    fn missing_field_aborts() {
        let rec = Record::from_fields([("call", "DL1ABC")]);
        assert_eq!(
            format_qso(&rec, &[]),
            Err(FieldError::NotFound {
                name: "frqint".to_string()
            })
        );
    }

    #[test]
    fn log_with_header_and_trailer() {
        let recs = [qso()];
        let fields = [CabrilloField::new("call", 6)];
        let out = format_log(&recs, &fields, &[("start-of-log", "3.0")]).unwrap();
        assert_eq!(out, "START-OF-LOG: 3.0\nQSO: DL1ABC\nEND_OF_LOG:");
    }

    #[test]
    fn field_spec_parsing() {
        assert_eq!("call:13".parse::<CabrilloField>().unwrap(), CabrilloField::new("call", 13));
        for bad in ["call", "call:x", ":4", "call:-1"] {
            assert!(bad.parse::<CabrilloField>().is_err(), "{bad}");
        }
    }
}
