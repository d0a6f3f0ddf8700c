use adiflog::{
    cabrillo::{CabrilloField, END_OF_LOG},
    config::{LogConfig, ModeMap},
    document::{AdifLog, record::FieldError},
};

const CONTEST: &str = "\
File: cqww.adi
<EOH>
<call:6>DL1ABC<freq:6>14.205<mode:3>SSB<qso_date:8>20231028<time_on:4>0001<rst_sent:2>59<rst_rcvd:2>59<gridsquare:6>JO62qm<eor>
<call:5>K1ABC<freq:6>7.0255<mode:2>CW<qso_date:8>20231028<time_on:4>0002<time_off:4>0003<rst_sent:3>599<rst_rcvd:3>599<gridsquare:4>FN42<eor>
<call:4>JA1X<freq:5>21.08<mode:4>RTTY<qso_date:8>20231028<time_on:4>0005<rst_sent:3>599<rst_rcvd:3>599<gridsquare:4>PM95<eor>
";

fn config() -> LogConfig {
    LogConfig {
        callsign: Some("OE3RSU".to_string()),
        mode_map: Some(ModeMap::new().with("SSB", "PH").with("CW", "CW").with("default", "RY")),
        ..LogConfig::default()
    }
}

#[test]
fn converts_contest_log_with_default_columns() {
    let log = AdifLog::parse_str(CONTEST, &config()).unwrap();
    let out = log.as_cabrillo(&[], &[("start-of-log", "3.0"), ("contest", "CQ-WW-SSB")]).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "START-OF-LOG: 3.0");
    assert_eq!(lines[1], "CONTEST: CQ-WW-SSB");
    assert_eq!(
        lines[2],
        "QSO: 14205 PH 2023-10-28 0001 OE3RSU        59  DL1ABC        59  JO62"
    );
    assert_eq!(
        lines[3],
        "QSO: 7026  CW 2023-10-28 0003 OE3RSU        599 K1ABC         599 FN42"
    );
    assert_eq!(
        lines[4],
        "QSO: 21080 RY 2023-10-28 0005 OE3RSU        599 JA1X          599 PM95"
    );
    assert_eq!(lines[5], END_OF_LOG);
    assert!(!out.ends_with('\n'));
}

#[test]
fn raw_mode_passes_through_without_map() {
    let cfg = LogConfig {
        callsign: Some("OE3RSU".to_string()),
        ..LogConfig::default()
    };
    let log = AdifLog::parse_str(CONTEST, &cfg).unwrap();
    let fields = [CabrilloField::new("mode", 4)];
    let out = log.as_cabrillo(&fields, &[] as &[(&str, &str)]).unwrap();
    assert_eq!(out, "QSO: SSB \nQSO: CW  \nQSO: RTTY\nEND_OF_LOG:");
}

#[test]
fn missing_own_call_aborts_conversion() {
    let log = AdifLog::parse_str(CONTEST, &LogConfig::default()).unwrap();
    let err = log.as_cabrillo(&[], &[] as &[(&str, &str)]).unwrap_err();
    assert_eq!(
        err,
        FieldError::NotFound {
            name: "own_call".to_string()
        }
    );
}

#[test]
fn record_level_conversion_and_parsed_columns() {
    let log = AdifLog::parse_str(CONTEST, &config()).unwrap();
    let fields: Vec<CabrilloField> = ["call:13", "isodate:10", "time_off:4"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    assert_eq!(
        log.records()[0].as_cabrillo(&fields).unwrap(),
        "QSO: DL1ABC        2023-10-28 0001"
    );
}
