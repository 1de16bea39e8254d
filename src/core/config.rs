//! Game configuration.
//!
//! The board layout is fixed (8 symbols, 16 cards). What a host can tune
//! is timing and the seed:
//! - `flip_back_delay`: how long a mismatched pair stays face-up
//! - `tick_interval`: how often the elapsed-time counter advances
//! - `seed`: fixed seed for reproducible deals, or `None` for entropy

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Default delay before a mismatched pair is turned back over.
pub const DEFAULT_FLIP_BACK_DELAY: Duration = Duration::from_millis(1000);

/// Default interval between elapsed-time ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Delay before a mismatched pair flips back face-down.
    pub flip_back_delay: Duration,

    /// Interval of the elapsed-time timer. Each tick adds one second
    /// to the displayed time regardless of the interval.
    pub tick_interval: Duration,

    /// Seed for deterministic deals. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            flip_back_delay: DEFAULT_FLIP_BACK_DELAY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with default timing and an entropy seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mismatch flip-back delay.
    #[must_use]
    pub fn with_flip_back_delay(mut self, delay: Duration) -> Self {
        self.flip_back_delay = delay;
        self
    }

    /// Set the timer tick interval.
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Use a fixed seed so deals are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every duration is usable by the scheduler.
    ///
    /// Durations are scheduled at millisecond resolution, so anything
    /// under one millisecond is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.flip_back_delay.as_millis() == 0 {
            return Err(GameError::InvalidConfig {
                field: "flip_back_delay",
                message: "must be at least 1ms".to_string(),
            });
        }
        if self.tick_interval.as_millis() == 0 {
            return Err(GameError::InvalidConfig {
                field: "tick_interval",
                message: "must be at least 1ms".to_string(),
            });
        }
        Ok(())
    }
}
