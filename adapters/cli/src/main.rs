#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that paints, solves and replays Queens puzzles.

mod config;
mod puzzle;
mod terminal;

use std::{
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use queens_master_gateway::HttpSolverGateway;
use queens_master_rendering::{
    BoardScene, MessagePresentation, Presentation, RenderingBackend, ReplayIndicator,
};
use queens_master_surface::BoardSurface;
use queens_master_system_messages as messages;
use queens_master_system_replay::ReplayPhase;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::{config::Settings, puzzle::Puzzle, terminal::TerminalBackend};

const TITLE: &str = "Queens Master";

#[derive(Debug, Parser)]
#[command(
    name = "queens-master",
    about = "Paint Queens puzzles, submit them to a solver and replay the solution"
)]
struct Options {
    /// Configuration file; `queens-master.toml` is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Render the painted board of a puzzle file.
    Show {
        /// Puzzle file to render.
        #[arg(long)]
        puzzle: PathBuf,
    },
    /// Solve a puzzle and replay the solver's steps. Ctrl-C stops the replay.
    Solve {
        /// Puzzle file to solve.
        #[arg(long)]
        puzzle: PathBuf,
        /// Base address of the solver service.
        #[arg(long)]
        solver_url: Option<String>,
        /// Milliseconds between replayed steps.
        #[arg(long)]
        step_delay_ms: Option<u64>,
        /// Only show the solved board.
        #[arg(long)]
        no_replay: bool,
    },
    /// Print the structured form of a raw solver message.
    Parse {
        /// Message as produced by the solver.
        raw: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let options = Options::parse();
    init_tracing(options.verbose);

    let settings = Settings::load(options.config.as_deref())?;
    match options.command {
        CliCommand::Show { puzzle } => show(&settings, &puzzle),
        CliCommand::Solve {
            puzzle,
            solver_url,
            step_delay_ms,
            no_replay,
        } => {
            let settings = settings.with_overrides(solver_url, step_delay_ms)?;
            solve(&settings, &puzzle, no_replay).await
        }
        CliCommand::Parse { raw } => print_parsed(&raw),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn painted_surface(settings: &Settings, path: &Path) -> Result<BoardSurface> {
    let puzzle = Puzzle::load(path)?;
    tracing::info!(size = %puzzle.size(), path = %path.display(), "loaded puzzle");
    let mut surface = BoardSurface::new(settings.step_delay());
    puzzle.paint(&mut surface)?;
    Ok(surface)
}

fn show(settings: &Settings, path: &Path) -> Result<()> {
    let surface = painted_surface(settings, path)?;
    TerminalBackend::new(io::stdout().lock(), settings.ansi).present(&presentation(&surface))
}

async fn solve(settings: &Settings, path: &Path, no_replay: bool) -> Result<()> {
    let mut surface = painted_surface(settings, path)?;
    let gateway = HttpSolverGateway::new(&settings.solver_url)
        .context("failed to build the solver client")?;
    let mut terminal = TerminalBackend::new(io::stdout().lock(), settings.ansi);

    let steps = surface
        .solve(&gateway)
        .await
        .with_context(|| format!("failed to solve the puzzle via {}", gateway.endpoint()))?;
    if no_replay || steps == 0 {
        return terminal.present(&presentation(&surface));
    }

    surface.start_replay()?;
    let step_delay = settings.step_delay();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last_tick = Instant::now();

    loop {
        terminal.present(&presentation(&surface))?;
        if surface.replay_status().phase != ReplayPhase::Playing {
            return Ok(());
        }

        tokio::select! {
            () = tokio::time::sleep(step_delay) => {
                let now = Instant::now();
                surface.advance(now - last_tick);
                last_tick = now;
            }
            signal = &mut ctrl_c => {
                signal.context("failed to listen for ctrl-c")?;
                surface.cancel_replay()?;
                tracing::info!("replay cancelled");
            }
        }
    }
}

fn print_parsed(raw: &str) -> Result<()> {
    let parsed = messages::parse(raw);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", parsed.message)?;
    for colour in &parsed.colours {
        writeln!(stdout, "colour: {colour}")?;
    }
    Ok(())
}

fn presentation(surface: &BoardSurface) -> Presentation {
    let mut presentation = Presentation::new(TITLE, BoardScene::from_grid(surface.grid()));
    if let Some(parsed) = surface.current_message() {
        presentation = presentation.with_message(MessagePresentation::from_parsed(&parsed));
    }

    let status = surface.replay_status();
    if status.step_count > 0 {
        presentation = presentation.with_replay(ReplayIndicator {
            phase: status.phase.to_string(),
            position: status
                .current_index
                .map(|index| index.min(status.step_count - 1)),
            step_count: status.step_count,
        });
    }
    presentation
}
