use clap::{Parser, Subcommand};
use psy_engine::{
    CalculationError, ConfigError, EngineConfig, LineRequest, MixPointInput, PointRequest,
    PsychroInput, PsychroService, StateResult,
};
use psy_props::Quantity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "psy-cli")]
#[command(about = "Psychroflow CLI - humid-air state and chart data", long_about = None)]
struct Cli {
    /// Engine configuration YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Property backend, overriding the config file
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one state from pressure and two quantities
    State {
        /// Pressure [Pa]
        #[arg(short, long, default_value_t = 101_325.0)]
        pressure: f64,
        /// Known quantity as CODE=VALUE in SI units, e.g. T=298.15 (exactly two)
        #[arg(short, long = "input", value_parser = parse_quantity)]
        inputs: Vec<(Quantity, f64)>,
    },
    /// Resolve a batch of named points from a JSON file
    Batch {
        /// JSON file with `pressure` and `points`
        path: PathBuf,
    },
    /// Resolve points and process lines from a JSON file
    Chart {
        /// JSON file with `pressure`, `points` and `process_lines`
        path: PathBuf,
    },
    /// Mix two air streams
    Mix {
        /// Pressure [Pa]
        #[arg(short, long, default_value_t = 101_325.0)]
        pressure: f64,
        /// First stream, e.g. tdb=35,w=14 or T=308.15,W=0.014
        #[arg(long, value_parser = parse_mix_point)]
        point1: MixPointInput,
        /// Second stream
        #[arg(long, value_parser = parse_mix_point)]
        point2: MixPointInput,
        /// Mass fraction of the first stream (0-1)
        #[arg(short, long)]
        ratio: f64,
    },
    /// Chart background curves
    Curves {
        /// Pressure [Pa]
        #[arg(short, long, default_value_t = 101_325.0)]
        pressure: f64,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Deserialize)]
struct BatchFile {
    pressure: f64,
    points: Vec<PointRequest>,
}

#[derive(Deserialize)]
struct ChartFile {
    pressure: f64,
    #[serde(default)]
    points: Vec<PointRequest>,
    #[serde(default)]
    process_lines: Vec<LineRequest>,
}

#[derive(Serialize)]
struct BatchEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a StateResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load_or_default(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    let service = PsychroService::from_config(config)?;
    debug!(backend = service.backend_name(), "engine ready");

    match cli.command {
        Commands::State { pressure, inputs } => cmd_state(&service, pressure, &inputs),
        Commands::Batch { path } => cmd_batch(&service, &path),
        Commands::Chart { path } => cmd_chart(&service, &path),
        Commands::Mix {
            pressure,
            point1,
            point2,
            ratio,
        } => print_json(&service.mix(pressure, &point1, &point2, ratio)?),
        Commands::Curves { pressure } => print_json(&service.reference_curves(pressure)?),
    }
}

fn cmd_state(service: &PsychroService, pressure: f64, inputs: &[(Quantity, f64)]) -> CliResult<()> {
    let mut input: PsychroInput = inputs.iter().copied().collect();
    input.insert(Quantity::P, pressure);
    print_json(&service.calculate_state(&input)?)
}

fn cmd_batch(service: &PsychroService, path: &Path) -> CliResult<()> {
    let file: BatchFile = read_json(path)?;
    let outcomes = service.calculate_multiple(file.pressure, &file.points);
    let entries: Vec<BatchEntry<'_>> = outcomes
        .iter()
        .map(|outcome| BatchEntry {
            name: &outcome.name,
            state: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    print_json(&entries)
}

fn cmd_chart(service: &PsychroService, path: &Path) -> CliResult<()> {
    let file: ChartFile = read_json(path)?;
    print_json(&service.assemble_chart_data(file.pressure, &file.points, &file.process_lines))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| CliError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `CODE=VALUE`, e.g. `T=298.15`.
fn parse_quantity(s: &str) -> Result<(Quantity, f64), String> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, got '{s}'"))?;
    let quantity: Quantity = code.trim().parse()?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid value for {quantity}: {e}"))?;
    Ok((quantity, value))
}

/// Comma-separated `tdb=..,w=..` or `T=..,W=..`.
fn parse_mix_point(s: &str) -> Result<MixPointInput, String> {
    let mut point = MixPointInput::default();
    for part in s.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{part}'"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|e| format!("invalid value for {key}: {e}"))?;
        match key.trim() {
            "tdb" => point.tdb = Some(value),
            "w" => point.w = Some(value),
            "T" => point.t_k = Some(value),
            "W" => point.w_kg_per_kg = Some(value),
            other => return Err(format!("unknown mix field '{other}' (use tdb, w, T, W)")),
        }
    }
    Ok(point)
}
