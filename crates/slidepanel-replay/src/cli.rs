use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use slidepanel_core::trace::PointerTrace;
use slidepanel_core::{DragExtent, PanelConfig};

use crate::error::{ReplayError, Result};
use crate::replay::{ReplayReport, Replayer};
use crate::scenario::{DEFAULT_FRAME_MS, Scenario};

#[derive(Debug, Parser)]
#[command(
    name = "slidepanel-replay",
    about = "Deterministic replay of sliding-panel scenarios and pointer traces",
    version
)]
pub struct Cli {
    /// Log filter, overrides RUST_LOG (e.g. `debug`, `slidepanel_core=trace`).
    #[arg(long, global = true)]
    pub log: Option<String>,

    /// Print errors to stderr as JSON.
    #[arg(long, global = true)]
    pub json_errors: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a JSON scenario file.
    Run(RunArgs),

    /// Replay a recorded JSONL pointer trace.
    Trace(TraceArgs),

    /// Validate a panel config file and print it with defaults filled in.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Scenario file (JSON).
    pub scenario: PathBuf,

    /// Override the scenario's frame interval.
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Print the full report as pretty JSON instead of JSON lines.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct TraceArgs {
    /// Pointer trace file (JSONL).
    pub trace: PathBuf,

    /// Panel config file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Drag extent as `MIN,MAX`; defaults to the trace header.
    #[arg(long, value_parser = parse_extent)]
    pub extent: Option<DragExtent>,

    #[arg(long, default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Panel config file (TOML or JSON).
    pub path: PathBuf,
}

fn parse_extent(s: &str) -> std::result::Result<DragExtent, String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got {s:?}"))?;
    let min: f32 = min.trim().parse().map_err(|e| format!("bad MIN: {e}"))?;
    let max: f32 = max.trim().parse().map_err(|e| format!("bad MAX: {e}"))?;
    DragExtent::new(min, max).map_err(|e| e.to_string())
}

/// Load a panel config, choosing the format by file extension.
pub fn load_config(path: &Path) -> Result<PanelConfig> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let config = if is_toml {
        PanelConfig::from_toml_file(path)?
    } else {
        PanelConfig::from_json_str(&std::fs::read_to_string(path)?)?
    };
    Ok(config)
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

pub fn run_with_output(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scenario(args, out),
        Commands::Trace(args) => run_trace(args, out),
        Commands::Config(args) => {
            let config = load_config(&args.path)?;
            writeln!(out, "{}", config.to_json_pretty()?)?;
            Ok(())
        }
    }
}

fn run_scenario(args: RunArgs, out: &mut impl Write) -> Result<()> {
    let mut scenario = Scenario::from_path(&args.scenario)?;
    if let Some(frame_ms) = args.frame_ms {
        scenario.frame_ms = frame_ms;
    }
    let report = Replayer::run(&scenario)?;
    emit(&report, args.pretty, out)
}

fn run_trace(args: TraceArgs, out: &mut impl Write) -> Result<()> {
    let trace = PointerTrace::open(&args.trace)?;
    let extent = args
        .extent
        .or_else(|| trace.extent())
        .ok_or_else(|| ReplayError::MissingExtent {
            path: args.trace.clone(),
        })?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PanelConfig::default(),
    };
    let name = trace
        .session_name()
        .map_or_else(|| args.trace.display().to_string(), str::to_string);
    let scenario = Scenario::from_trace(name, &trace, extent, config, args.frame_ms)?;
    let report = Replayer::run(&scenario)?;
    emit(&report, args.pretty, out)
}

fn emit(report: &ReplayReport, pretty: bool, out: &mut impl Write) -> Result<()> {
    if pretty {
        report.write_pretty(out)
    } else {
        report.write_jsonl(out)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, parse_extent};

    #[test]
    fn extent_parser_accepts_pairs() {
        let extent = parse_extent("0, 480.5").unwrap();
        assert_eq!(extent.min(), 0.0);
        assert_eq!(extent.max(), 480.5);
        assert!(parse_extent("480").is_err());
        assert!(parse_extent("10,1").is_err());
        assert!(parse_extent("a,1").is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "slidepanel-replay",
            "trace",
            "gesture.jsonl",
            "--extent",
            "0,100",
            "--log",
            "debug",
            "--json-errors",
        ])
        .unwrap();
        assert_eq!(cli.log.as_deref(), Some("debug"));
        assert!(cli.json_errors);
        let Commands::Trace(args) = cli.command else {
            panic!("expected trace command");
        };
        assert_eq!(args.frame_ms, 16);
        assert_eq!(args.extent.map(|e| e.max()), Some(100.0));
    }

    #[test]
    fn run_requires_scenario_path() {
        assert!(Cli::try_parse_from(["slidepanel-replay", "run"]).is_err());
    }
}
