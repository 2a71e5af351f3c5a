//! Settings file for the terminal front end.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use pipes_game::{GameConfig, DEFAULT_COLS, DEFAULT_ROWS};
use serde::Deserialize;

const DEFAULT_TICK_MILLIS: u64 = 1_000;

/// Values read from the optional TOML settings file.
///
/// Missing keys fall back to the defaults; command-line flags are applied on
/// top afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Interior rows of a generated board.
    pub(crate) rows: i32,
    /// Interior columns of a generated board.
    pub(crate) cols: i32,
    /// Flow rounds before water leaves the source.
    pub(crate) delay: i32,
    /// Ticks per flow round.
    pub(crate) flow_duration: u32,
    /// Seed for reproducible boards and pipe queues.
    pub(crate) seed: Option<u64>,
    /// Directory holding `.map` level files.
    pub(crate) levels_dir: Option<PathBuf>,
    /// Milliseconds between ticks in real-time mode.
    pub(crate) tick_millis: u64,
    /// Whether a background ticker drives the round.
    pub(crate) realtime: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            delay: config.delay(),
            flow_duration: config.flow_duration(),
            seed: None,
            levels_dir: None,
            tick_millis: DEFAULT_TICK_MILLIS,
            realtime: false,
        }
    }
}

impl Settings {
    /// Loads settings from the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file at {}", path.display()))
    }

    /// Parses settings from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values no round can be played with.
    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            self.rows >= 1 && self.cols >= 1,
            "board must have at least one interior row and column, got {}x{}",
            self.rows,
            self.cols
        );
        ensure!(self.delay >= 0, "delay must not be negative, got {}", self.delay);
        ensure!(self.tick_millis > 0, "tick_millis must be positive");
        Ok(())
    }

    /// Round configuration derived from these settings.
    pub(crate) fn game_config(&self) -> GameConfig {
        let config = GameConfig::new(self.delay, self.flow_duration, None);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Wall-clock time between ticks in real-time mode.
    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
