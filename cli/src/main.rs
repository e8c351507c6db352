mod script;

use std::fs;
use std::path::{Path, PathBuf};

use canvas::clock::ManualClock;
use canvas::config::{ConfigError, EngineConfig};
use canvas::doc::{ElementKind, Snapshot, SnapshotError};
use canvas::engine::EngineCore;
use canvas::mindmap;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::script::{ScriptError, parse_script, replay};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "board", about = "Whiteboard engine replay and snapshot tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSONL gesture script and print the resulting snapshot.
    Replay {
        /// JSONL event script.
        #[arg(long)]
        script: PathBuf,
        /// Snapshot to load before replaying.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// JSON config file; defaults to `BOARD_*` environment variables.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Clock value at the first event.
        #[arg(long, env = "BOARD_START_MS", default_value_t = 0)]
        start_ms: u64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Print emitted actions as JSONL instead of the final snapshot.
        #[arg(long, default_value_t = false)]
        actions: bool,
    },
    /// Check a snapshot file and print element counts.
    Validate { path: PathBuf },
    /// Print the effective engine config.
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::WARN).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay { script, snapshot, config, start_ms, seed, actions } => {
            run_replay(&script, snapshot.as_deref(), config.as_deref(), start_ms, seed, actions)
        }
        Command::Validate { path } => run_validate(&path),
        Command::Config { config } => print_json(&load_config(config.as_deref())?),
    }
}

fn run_replay(
    script: &Path,
    snapshot: Option<&Path>,
    config: Option<&Path>,
    start_ms: u64,
    seed: u64,
    print_actions: bool,
) -> Result<(), CliError> {
    let config = load_config(config)?;
    let events = parse_script(&read(script)?)?;

    let clock = ManualClock::new(start_ms);
    let mut core = EngineCore::with_parts(config, Box::new(clock.clone()), seed);
    if let Some(path) = snapshot {
        core.load_snapshot_json(&read(path)?)?;
    }

    let actions = replay(&mut core, &clock, events);
    if print_actions {
        for action in &actions {
            println!("{}", serde_json::to_string(action)?);
        }
        return Ok(());
    }
    print_json(&core.snapshot())
}

fn run_validate(path: &Path) -> Result<(), CliError> {
    let snapshot = Snapshot::from_json(&read(path)?)?;
    let mut core = EngineCore::new();
    core.load_snapshot(snapshot)?;

    let loaded = core.snapshot();
    let mut counts = Map::new();
    for kind in ElementKind::ALL {
        counts.insert(kind.name().to_owned(), Value::from(kind_count(&loaded, kind)));
    }
    let connectors = mindmap::connectors(&core.board.mind_map).len();
    counts.insert("connectors".to_owned(), Value::from(connectors));
    tracing::debug!(path = %path.display(), "snapshot valid");
    print_json(&Value::Object(counts))
}

fn kind_count(snapshot: &Snapshot, kind: ElementKind) -> usize {
    match kind {
        ElementKind::Text => snapshot.text_elements.len(),
        ElementKind::Shape => snapshot.shape_elements.len(),
        ElementKind::Image => snapshot.image_elements.len(),
        ElementKind::Arrow => snapshot.arrow_elements.len(),
        ElementKind::Stroke => snapshot.stroke_elements.len(),
        ElementKind::MindMap => snapshot.mind_map_nodes.len(),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => Ok(EngineConfig::from_json(&read(path)?)?),
        None => Ok(EngineConfig::from_env()?),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
