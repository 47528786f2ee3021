#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for inspecting, playing and converting Sokoban
//! collections.

mod config;

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pushbox_collection::{export, import, ExportOptions, Imported};
use pushbox_core::{Command, Event};
use pushbox_level::{self as level, query, Level, RowLayout};
use pushbox_system_replay::{Recorder, Replay};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "pushbox", about = "Inspect, play and convert Sokoban level collections")]
struct Cli {
    /// Configuration file. Defaults to `pushbox.toml` when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Lists every level with its size and validation verdict.
    List {
        /// Collection file to read.
        collection: PathBuf,
    },
    /// Prints one level with its headers, metadata and notes.
    Show {
        /// Collection file to read.
        collection: PathBuf,
        /// Level name.
        level: String,
    },
    /// Replays a LURD move string on a level.
    Play {
        /// Collection file to read.
        collection: PathBuf,
        /// Level name.
        level: String,
        /// Moves in LURD notation; counts such as `3r` are expanded.
        moves: String,
        /// Number of moves to undo after the replay.
        #[arg(long, default_value_t = 0)]
        undo: usize,
    },
    /// Reads a collection and writes it back out.
    Convert {
        /// Collection file to read.
        input: PathBuf,
        /// Destination file.
        output: PathBuf,
        /// Packs each board onto one run-length coded line.
        #[arg(long)]
        compact: bool,
    },
}

/// Entry point for the pushbox command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log.filter)?;

    match cli.action {
        Action::List { collection } => list(&collection),
        Action::Show { collection, level } => show(&collection, &level),
        Action::Play {
            collection,
            level,
            moves,
            undo,
        } => play(&collection, &level, &moves, undo),
        Action::Convert {
            input,
            output,
            compact,
        } => convert(&input, &output, compact || config.export.compact),
    }
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter `{default_filter}`"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn list(path: &Path) -> Result<()> {
    let imported = import(path)?;
    eprintln!("{}", imported.report);
    for (name, mut level) in imported.levels {
        let verdict = if level.validate() { "valid" } else { "invalid" };
        println!(
            "{name}\t{}x{}\t{verdict}",
            level.size_x(),
            level.size_y()
        );
    }
    Ok(())
}

fn show(path: &Path, name: &str) -> Result<()> {
    let level = find_level(import(path)?, name)?;
    let mut out = String::new();
    level.write_headers(&mut out)?;
    writeln!(out, "{}", level.name())?;
    level.write_tiles(&mut out, RowLayout::Lines)?;
    level.write_metadata(&mut out)?;
    level.write_notes(&mut out)?;
    print!("{out}");
    Ok(())
}

fn play(path: &Path, name: &str, moves: &str, undo: usize) -> Result<()> {
    let mut level = find_level(import(path)?, name)?;
    let mut replay = Replay::from_lurd(moves).context("invalid move string")?;
    let mut recorder = Recorder::new();
    let mut events = Vec::new();

    level::apply(&mut level, Command::Validate, &mut events);
    if let Some(Event::ValidationFailed { players }) = events.first() {
        bail!("level `{name}` has {players} players; exactly one is required");
    }

    let mut commands = Vec::new();
    loop {
        commands.clear();
        replay.handle(&events, &mut commands);
        if commands.is_empty() {
            break;
        }

        events.clear();
        for command in commands.drain(..) {
            level::apply(&mut level, command, &mut events);
        }
        recorder.handle(&events);
    }

    if let Some(reason) = replay.halted() {
        warn!(%reason, remaining = replay.remaining(), "replay stopped early");
        println!(
            "stopped: {reason} ({} queued move(s) skipped)",
            replay.remaining()
        );
    }

    for _ in 0..undo {
        events.clear();
        level::apply(&mut level, Command::Undo, &mut events);
        recorder.handle(&events);
    }

    print!("{level}");
    println!("moves: {}", recorder.as_str());
    println!(
        "move count: {}, push count: {}",
        query::move_count(&level),
        query::push_count(&level)
    );
    println!("solved: {}", query::is_solved(&level));
    Ok(())
}

fn convert(input: &Path, output: &Path, compact: bool) -> Result<()> {
    let imported = import(input)?;
    eprintln!("{}", imported.report);
    export(output, &imported.levels, ExportOptions { compact })?;
    info!(levels = imported.levels.len(), compact, "conversion finished");
    println!(
        "wrote {} level(s) to {}",
        imported.levels.len(),
        output.display()
    );
    Ok(())
}

fn find_level(imported: Imported, name: &str) -> Result<Level> {
    let mut levels = imported.levels;
    levels
        .remove(name)
        .with_context(|| format!("level `{name}` not found in collection"))
}
