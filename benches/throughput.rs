use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use adiflog::{
    config::{LogConfig, ModeMap},
    document::AdifLog,
};

fn synthetic_log(n: usize) -> String {
    let mut out = String::from("Generated log\n<ADIF_VER:5>3.1.4<EOH>\n");
    for i in 0..n {
        let call = format!("K{i}");
        let mode = if i % 2 == 0 { "CW" } else { "SSB" };
        out.push_str(&format!(
            "<CALL:{}>{call}<QSO_DATE:8>20231028<TIME_ON:4>1200<FREQ:6>14.025<MODE:{}>{mode}\
             <RST_SENT:3>599<RST_RCVD:3>599<GRIDSQUARE:4>FN42<EOR>\n",
            call.len(),
            mode.len(),
        ));
    }
    out
}

fn config() -> LogConfig {
    LogConfig {
        callsign: Some("OE3RSU".to_string()),
        mode_map: Some(ModeMap::new().with("SSB", "PH").with("CW", "CW")),
        ..LogConfig::default()
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let cfg = config();
    for n in [1_000usize, 10_000usize] {
        let text = synthetic_log(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &text, |b, text| {
            b.iter(|| AdifLog::parse_str(text, &cfg).expect("parse"));
        });
    }
    group.finish();
}

fn bench_cabrillo(c: &mut Criterion) {
    let log = AdifLog::parse_str(&synthetic_log(10_000), &config()).expect("parse");
    c.bench_function("cabrillo_10k", |b| {
        b.iter(|| {
            log.as_cabrillo(&[], &[("start-of-log", "3.0")])
                .expect("convert")
        });
    });
}

fn bench_reserialize(c: &mut Criterion) {
    let log = AdifLog::parse_str(&synthetic_log(10_000), &config()).expect("parse");
    c.bench_function("reserialize_10k", |b| {
        b.iter(|| log.to_string());
    });
}

criterion_group!(benches, bench_parse, bench_cabrillo, bench_reserialize);
criterion_main!(benches);
