//! ADIF amateur-radio log parsing with Cabrillo output.
//!
//! Reads ADIF documents (free-text or tagged header, `<TAG:LEN>VALUE`
//! fields, `<EOR>`-terminated records) and gzip-wrapped TQ8 containers, and
//! renders the parsed QSOs as fixed-column Cabrillo lines.
//!
//! # Examples
//!
//! ```
//! use adiflog::{
//!     cabrillo::CabrilloField,
//!     config::{LogConfig, ModeMap},
//!     document::AdifLog,
//! };
//!
//! let cfg = LogConfig {
//!     callsign: Some("OE3RSU".to_string()),
//!     mode_map: Some(ModeMap::new().with("SSB", "PH").with("CW", "CW")),
//!     ..LogConfig::default()
//! };
//! let adif = "<call:6>DL1ABC<freq:6>14.205<mode:3>SSB<qso_date:8>20230615\
//!             <time_on:4>1234<rst_sent:2>59<rst_rcvd:2>57<gridsquare:4>JO62<eor>";
//! let log = AdifLog::parse_str(adif, &cfg).expect("parse");
//!
//! let fields = [CabrilloField::new("frqint", 5), CabrilloField::new("mode", 2)];
//! let text = log.as_cabrillo(&fields, &[("start-of-log", "3.0")]).expect("cabrillo");
//! assert_eq!(text, "START-OF-LOG: 3.0\nQSO: 14205 PH\nEND_OF_LOG:");
//! ```
#![deny(missing_docs)]

/// Cabrillo formatter.
pub mod cabrillo;
/// Log configuration and mode mapping.
pub mod config;
/// ADIF date and time helpers.
pub mod dates;
/// Parsed logs and records.
pub mod document;
/// Crate-level error type.
pub mod error;
/// Lexer, header reader, and record assembler.
pub mod parse;
/// Shared primitive types.
pub mod types;

pub use config::{LogConfig, ModeMap};
pub use document::{AdifLog, record::Record};
pub use error::{Error, Result};
