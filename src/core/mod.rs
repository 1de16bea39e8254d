//! Core engine types: RNG, configuration, errors.

pub mod config;
pub mod error;
pub mod rng;

pub use config::{GameConfig, DEFAULT_FLIP_BACK_DELAY, DEFAULT_TICK_INTERVAL};
pub use error::{GameError, Result};
pub use rng::{GameRng, GameRngState};
