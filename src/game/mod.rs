//! The memory game: state, turn resolution, controller.
//!
//! - `GameState`: deck, revealed cards, matched symbols, counters
//! - `MemoryGame`: owns one `GameState` plus the scheduler that delivers
//!   flip-backs and timer ticks
//! - `GameStats` / `format_elapsed`: presentation helpers
//! - `GameSnapshot`: checkpoint and restore of a whole session

mod engine;
mod format;
mod snapshot;
mod state;
mod stats;

pub use engine::MemoryGame;
pub use format::format_elapsed;
pub use snapshot::GameSnapshot;
pub use state::{CardView, GameState, GameStatus, IgnoreReason, Selection, TurnPhase};
pub use stats::GameStats;
