//! Error types for the memory game engine.
//!
//! Player actions never fail: clicks on locked, revealed or matched cards
//! are reported as ignored selections. Errors are reserved for caller bugs
//! (unknown card ids, bad configuration) and snapshot decoding.

use thiserror::Error;

use crate::cards::CardId;

/// Errors returned by the engine.
#[derive(Debug, Error)]
pub enum GameError {
    /// A card id that is not part of the current deck was selected.
    #[error("unknown card {id}: the deck holds ids 0..{deck_size}")]
    UnknownCard { id: CardId, deck_size: usize },

    /// A configuration value was rejected by `GameConfig::validate`.
    #[error("invalid configuration for `{field}`: {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// Snapshot bytes could not be encoded or decoded.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    /// A decoded snapshot violates a game invariant.
    #[error("corrupt snapshot: {message}")]
    CorruptSnapshot { message: String },
}

impl GameError {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptSnapshot {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;
