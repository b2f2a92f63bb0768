//! mix-replay - Replay action records through the mixshell reducer
//!
//! Acts as a minimal host: reads one `{kind, value}` record per line,
//! dispatches each through a `Store` in order and prints the resulting
//! snapshot (or every snapshot with `--trace`).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use libmixshell::logging::LoggingConfig;
use libmixshell::store::StateChanged;
use libmixshell::{ActionRecord, AppState, Config, MixshellError, Store};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "mix-replay", version)]
#[command(about = "Replay mixshell action records through the state reducer", long_about = None)]
struct Cli {
    /// File with one JSON action record per line (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Stop at the first action that fails validation
    #[arg(long)]
    strict: bool,

    /// Print every snapshot instead of only the final one
    #[arg(long)]
    trace: bool,

    /// Config file (defaults to MIXSHELL_CONFIG, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

struct ReplayOptions {
    format: OutputFormat,
    strict: bool,
    trace: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct ReplaySummary {
    applied: u64,
    rejected: usize,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<MixshellError>()
        .map(MixshellError::exit_code)
        .unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    LoggingConfig::from_section(&config.logging, cli.verbose)?.init();

    let options = ReplayOptions {
        format: cli.format,
        strict: cli.strict || config.replay.strict,
        trace: cli.trace,
    };

    let mut store = Store::from_config(&config.store);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .map_err(MixshellError::from)
                .with_context(|| format!("cannot open {}", path.display()))?;
            replay(BufReader::new(file), &mut out, &mut store, &options)?
        }
        None => replay(io::stdin().lock(), &mut out, &mut store, &options)?,
    };

    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        "Replay finished"
    );
    Ok(())
}

fn replay<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    store: &mut Store,
    options: &ReplayOptions,
) -> Result<ReplaySummary> {
    let mut observer = store.subscribe();
    let mut rejected = 0;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(MixshellError::from)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record: ActionRecord = serde_json::from_str(line)
            .map_err(MixshellError::from)
            .with_context(|| format!("line {}", line_no))?;

        if let Err(error) = store.dispatch(&record) {
            if options.strict {
                return Err(MixshellError::from(error)).with_context(|| format!("line {}", line_no));
            }
            warn!(line = line_no, %error, "Skipping rejected action");
            rejected += 1;
            continue;
        }

        if options.trace {
            while let Ok(changed) = observer.try_recv() {
                write_change(out, &changed, options.format)?;
            }
        }
    }

    if !options.trace {
        write_state(out, store.state(), options.format)?;
    }
    out.flush().map_err(MixshellError::from)?;

    Ok(ReplaySummary {
        applied: store.sequence(),
        rejected,
    })
}

fn write_change<W: Write>(
    out: &mut W,
    changed: &StateChanged,
    format: OutputFormat,
) -> libmixshell::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, changed)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "#{} {}", changed.sequence, changed.kind)?;
            write_text(out, &changed.state)?;
        }
    }
    Ok(())
}

fn write_state<W: Write>(
    out: &mut W,
    state: &AppState,
    format: OutputFormat,
) -> libmixshell::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, state)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(out, state)?,
    }
    Ok(())
}

fn write_text<W: Write>(out: &mut W, state: &AppState) -> io::Result<()> {
    writeln!(out, "size: {}x{}", state.size.width, state.size.height)?;
    writeln!(out, "muted: {}", if state.muted { "yes" } else { "no" })?;

    if state.audio_sources.is_empty() {
        return writeln!(out, "sources: none");
    }

    writeln!(out, "sources ({}):", state.audio_sources.len())?;
    for (position, source) in state.audio_sources.iter().enumerate() {
        write!(out, "  {}. {}", position, source.id)?;
        if let Some(label) = &source.label {
            write!(out, " \"{}\"", label)?;
        }
        if source.muted {
            write!(out, " [muted]")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
