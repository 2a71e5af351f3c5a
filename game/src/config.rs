//! Round configuration.

use pipes_system_flow_timer::{DEFAULT_DELAY, DEFAULT_FLOW_DURATION};

/// Interior rows of a generated board when none are requested.
pub const DEFAULT_ROWS: i32 = 8;

/// Interior columns of a generated board when none are requested.
pub const DEFAULT_COLS: i32 = 8;

/// Parameters shared by every way of constructing a [`crate::Game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    delay: i32,
    flow_duration: u32,
    seed: Option<u64>,
}

impl GameConfig {
    /// Creates a configuration from explicit values.
    ///
    /// Without a seed, map and queue generation draw from entropy.
    #[must_use]
    pub const fn new(delay: i32, flow_duration: u32, seed: Option<u64>) -> Self {
        Self {
            delay,
            flow_duration,
            seed,
        }
    }

    /// Same configuration with a different countdown.
    #[must_use]
    pub const fn with_delay(self, delay: i32) -> Self {
        Self { delay, ..self }
    }

    /// Same configuration with a fixed random stream.
    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Flow rounds before water leaves the source.
    #[must_use]
    pub const fn delay(&self) -> i32 {
        self.delay
    }

    /// Ticks per flow round.
    #[must_use]
    pub const fn flow_duration(&self) -> u32 {
        self.flow_duration
    }

    /// Seed for map and queue generation.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY, DEFAULT_FLOW_DURATION, None)
    }
}
