//! ADIF date and time conversion.
//!
//! ADIF dates are `YYYYMMDD`, times `HHMM` or `HHMMSS`, both UTC.

use chrono::{
    NaiveDate, NaiveDateTime, NaiveTime,
    format::{Item, StrftimeItems},
};

/// Default output format of [`date_cvt`].
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses an ADIF `YYYYMMDD` date.
pub fn parse_date(d: &str) -> Option<NaiveDate> {
    if d.len() != 8 || !d.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = d[0..4].parse().ok()?;
    let month = d[4..6].parse().ok()?;
    let day = d[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses an ADIF `HHMM` or `HHMMSS` time.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    if !matches!(t.len(), 4 | 6) || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = t[0..2].parse().ok()?;
    let minute = t[2..4].parse().ok()?;
    let second = if t.len() == 6 { t[4..6].parse().ok()? } else { 0 };
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// `YYYYMMDD` as `YYYY-MM-DD`.
pub fn iso_date(d: &str) -> Option<String> {
    parse_date(d).map(|date| date.format("%Y-%m-%d").to_string())
}

/// Combines an ADIF date and time and renders them with a strftime-style
/// `format` ([`DATE_FORMAT`] when `None`).
///
/// Returns `None` for malformed input or a format with unknown specifiers.
pub fn date_cvt(d: &str, t: &str, format: Option<&str>) -> Option<String> {
    let format = format.unwrap_or(DATE_FORMAT);
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let at = NaiveDateTime::new(parse_date(d)?, parse_time(t)?);
    Some(at.format(format).to_string())
}
