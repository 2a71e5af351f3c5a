#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal front end for Pipes.
//!
//! Boards come either from a `.map` level file or from the random generator.
//! By default the round advances one tick per command; `--realtime` hands the
//! clock to a background thread instead.

mod display;
mod input;
mod session;
mod settings;
mod ticker;

use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use pipes_core::WELCOME_BANNER;
use pipes_game::Game;
use pipes_level_io::LevelCatalog;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    session::{game_from_level, Session},
    settings::Settings,
};

/// Command-line arguments for the Pipes binary.
#[derive(Debug, Parser)]
#[command(name = "pipes", about = "Pipe-connection puzzle for the terminal")]
struct Cli {
    /// TOML settings file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Interior rows of a generated board.
    #[arg(long)]
    rows: Option<i32>,
    /// Interior columns of a generated board.
    #[arg(long)]
    cols: Option<i32>,
    /// Flow rounds before water leaves the source.
    #[arg(long)]
    delay: Option<i32>,
    /// Ticks per flow round.
    #[arg(long)]
    flow_duration: Option<u32>,
    /// Seed for reproducible boards and pipe queues.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory holding `.map` level files.
    #[arg(long, value_name = "DIR")]
    levels_dir: Option<PathBuf>,
    /// Level to start with: a file path or a name from the levels directory.
    #[arg(long)]
    level: Option<String>,
    /// Advance the round on a wall-clock timer.
    #[arg(long)]
    realtime: bool,
    /// Milliseconds between ticks in real-time mode.
    #[arg(long)]
    tick_millis: Option<u64>,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(rows) = self.rows {
            settings.rows = rows;
        }
        if let Some(cols) = self.cols {
            settings.cols = cols;
        }
        if let Some(delay) = self.delay {
            settings.delay = delay;
        }
        if let Some(flow_duration) = self.flow_duration {
            settings.flow_duration = flow_duration;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.levels_dir.is_some() {
            settings.levels_dir.clone_from(&self.levels_dir);
        }
        if let Some(tick_millis) = self.tick_millis {
            settings.tick_millis = tick_millis;
        }
        settings.realtime |= self.realtime;

        settings.validate()?;
        Ok(settings)
    }
}

fn open_catalog(settings: &Settings) -> LevelCatalog {
    let directory = settings
        .levels_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    match LevelCatalog::open(&directory) {
        Ok(catalog) => catalog,
        Err(error) => {
            warn!(
                target: "pipes::levels",
                directory = %directory.display(),
                %error,
                "levels.catalog_unavailable"
            );
            LevelCatalog::empty(directory)
        }
    }
}

fn first_game(
    level: Option<&str>,
    settings: &Settings,
    catalog: &mut LevelCatalog,
) -> Result<(Game, i32)> {
    let Some(level) = level else {
        let game = Game::generate(settings.rows, settings.cols, &settings.game_config())
            .context("failed to generate a board")?;
        info!(
            target: "pipes::game",
            rows = settings.rows,
            cols = settings.cols,
            seed = ?settings.seed,
            "game.generated"
        );
        return Ok((game, settings.delay));
    };

    let path = Path::new(level);
    if path.is_file() {
        return game_from_level(path, settings);
    }

    catalog
        .set_level(Some(level))
        .with_context(|| format!("no level named {level} in {}", catalog.directory().display()))?;
    let path = catalog
        .current_path()
        .with_context(|| format!("level {level} has no file"))?;
    game_from_level(&path, settings)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;
    let mut catalog = open_catalog(&settings);
    let (game, delay) = first_game(cli.level.as_deref(), &settings, &mut catalog)?;

    println!("{WELCOME_BANNER}");
    let mut session = Session::new(game, delay, settings, catalog);
    let stdin = io::stdin();
    session.run(stdin.lock(), &mut io::stdout())
}
