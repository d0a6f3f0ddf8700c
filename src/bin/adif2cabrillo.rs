//! Converts an ADIF or TQ8 log to Cabrillo.

use std::{
    io::{self, BufReader, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use adiflog::{
    AdifLog, LogConfig,
    cabrillo::CabrilloField,
    error::{ConfigError, Error},
};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ADIF to Cabrillo converter.
#[derive(Debug, Parser)]
#[command(name = "adif2cabrillo", version, about, long_about = None)]
struct Cli {
    /// Input file; standard input when omitted.
    path: Option<PathBuf>,

    /// Input is a gzip-compressed TQ8 file.
    #[arg(long)]
    tq8: bool,

    /// Operator callsign (own_call).
    #[arg(long)]
    callsign: Option<String>,

    /// JSON file with a LogConfig.
    #[arg(long)]
    config: Option<PathBuf>,

    /// QSO column as name:width; repeat for each column.
    #[arg(long = "field", value_name = "NAME:WIDTH")]
    fields: Vec<String>,

    /// Cabrillo header line as KEY=VALUE; repeatable.
    #[arg(long = "header", value_name = "KEY=VALUE")]
    headers: Vec<String>,

    /// Print a diagnostic dump instead of Cabrillo.
    #[arg(long, value_enum)]
    dump: Option<Dump>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dump {
    Adif,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("adif2cabrillo: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => LogConfig::from_json_path(path)?,
        None => LogConfig::default(),
    };
    if cli.callsign.is_some() {
        config.callsign = cli.callsign.clone();
    }

    let fields = cli
        .fields
        .iter()
        .map(|s| s.parse::<CabrilloField>())
        .collect::<Result<Vec<_>, _>>()?;
    let headers = cli
        .headers
        .iter()
        .map(|s| {
            s.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| ConfigError::HeaderSpec(s.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let input: Box<dyn Read> = match &cli.path {
        Some(path) => Box::new(std::fs::File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };
    let log = if cli.tq8 {
        AdifLog::parse_tq8(input, &config)?
    } else {
        AdifLog::parse(BufReader::new(input), &config)?
    };
    if let Some(mark) = log.eof_mark() {
        tracing::info!(mark, "non-standard end-of-file marker");
    }

    let out = match cli.dump {
        Some(Dump::Adif) => log.to_string(),
        Some(Dump::Json) => log.to_json()?,
        None => log.as_cabrillo(&fields, &headers)?,
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{out}")?;
    Ok(())
}
