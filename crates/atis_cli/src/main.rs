//! ATIS composer CLI
//!
//! Applies `field=value` edits to a composing session and prints the
//! resulting transcript. Without edits on the command line, edits are read
//! from stdin one per line and every publication is printed.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;

use atis_core::config::{ConfigManager, Settings};
use atis_core::engine::{AtisEngine, Publication};
use atis_core::logging::{init_tracing, LogConfig, SessionLogger};
use atis_core::models::RawFieldId;

#[derive(Parser)]
#[command(name = "atis")]
#[command(version, about = "Compose an ATIS broadcast transcript", long_about = None)]
struct Cli {
    /// Config file (created with defaults if missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print publications as JSON
    #[arg(long)]
    json: bool,

    /// Seed the observation time from the system clock
    #[arg(long)]
    now: bool,

    /// Export the final transcript (defaults to the configured folder)
    #[arg(long, value_name = "DIR")]
    export: Option<Option<PathBuf>>,

    /// Edits such as `airport=KSEA`, `gust=20` or `advance`
    edits: Vec<String>,
}

/// One parsed command-line or stdin edit.
enum Edit {
    Field(RawFieldId, String),
    Advance,
}

fn parse_edit(line: &str) -> Result<Edit> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("advance") {
        return Ok(Edit::Advance);
    }
    let Some((name, value)) = line.split_once('=') else {
        bail!("expected field=value or 'advance', got '{}'", line);
    };
    let field: RawFieldId = name.trim().parse()?;
    Ok(Edit::Field(field, value.trim().to_string()))
}

fn apply(engine: &mut AtisEngine, edit: Edit) {
    let result = match edit {
        Edit::Field(field, value) => engine.update(field, &value),
        Edit::Advance => engine.advance_information(),
    };
    if let Err(err) = result {
        eprintln!("rejected: {}", err);
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => {
            let mut manager = ConfigManager::new(path);
            manager
                .load_or_create()
                .with_context(|| format!("loading config {}", path.display()))?;
            Ok(manager.settings().clone())
        }
        None => Ok(Settings::default()),
    }
}

fn print_publication(publication: &Publication, json: bool) {
    if json {
        match serde_json::to_string(publication) {
            Ok(line) => println!("{}", line),
            Err(err) => eprintln!("failed to encode publication: {}", err),
        }
    } else if publication.accepted {
        println!("{}", publication.transcript);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;
    init_tracing(settings.logging.level);

    let mut engine = AtisEngine::new(&settings);
    if settings.logging.session_log {
        let name = format!("session_{}", Utc::now().format("%Y%m%d_%H%M%S"));
        let logger = SessionLogger::new(
            name,
            &settings.logging.logs_folder,
            LogConfig::from_settings(&settings.logging),
            None,
        )
        .context("creating session log")?;
        engine = engine.with_logger(Arc::new(logger));
    }

    if cli.now {
        if let Err(err) = engine.set_time_from(Utc::now()) {
            eprintln!("rejected: {}", err);
        }
    }

    if cli.edits.is_empty() {
        let json = cli.json;
        engine.subscribe(move |p| print_publication(p, json));

        for line in io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            match parse_edit(&line) {
                Ok(edit) => apply(&mut engine, edit),
                Err(err) => eprintln!("{}", err),
            }
        }
    } else {
        for raw in &cli.edits {
            apply(&mut engine, parse_edit(raw)?);
        }
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        } else {
            println!("{}", engine.transcript());
        }
    }

    if let Some(dir) = cli.export {
        let dir = dir.unwrap_or_else(|| PathBuf::from(&settings.export.output_folder));
        let path = engine
            .export_transcript()
            .write_to(&dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        tracing::info!(path = %path.display(), "Transcript written");
        eprintln!("wrote {}", path.display());
    }

    if let Some(logger) = engine.logger() {
        logger.show_tail("Rejected edits");
        logger.flush();
    }
    Ok(())
}
