//! # memory-match
//!
//! Engine for a memory-matching card game: sixteen face-down cards
//! holding eight symbol pairs. The player turns two cards per turn;
//! matches stay face-up, mismatches turn back after a delay. The engine
//! counts moves and elapsed time until every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Pure state**: `GameState` is plain data with explicit
//!    transitions. No globals, no callbacks, no wall clock.
//!
//! 2. **Virtual time**: the mismatch flip-back and the timer tick are
//!    cancelable tasks on a `Scheduler`. Hosts advance time explicitly,
//!    so tests are deterministic.
//!
//! 3. **Seeded deals**: shuffles use a ChaCha8 `GameRng`, so a seed
//!    reproduces every deal of a session.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, errors
//! - `cards`: symbols, cards, the dealt deck
//! - `schedule`: virtual-time scheduler
//! - `game`: game state, the `MemoryGame` controller, stats, snapshots
//!
//! Rendering is left to the host: read `card_views()` and `stats()`,
//! forward clicks to `select_card`, and call `advance` as time passes.

pub mod cards;
pub mod core;
pub mod game;
pub mod schedule;

// Re-export commonly used types
pub use crate::core::{GameConfig, GameError, GameRng, GameRngState};

pub use crate::cards::{Card, CardId, Deck, Symbol, SymbolSet, DECK_SIZE};

pub use crate::schedule::{FiredTask, Scheduler, TaskId, TaskKind, MAX_FIRINGS_PER_ADVANCE};

pub use crate::game::{
    format_elapsed, CardView, GameSnapshot, GameState, GameStats, GameStatus, IgnoreReason,
    MemoryGame, Selection, TurnPhase,
};
