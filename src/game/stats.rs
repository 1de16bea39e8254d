//! Game statistics for status bars and the victory banner.

use serde::{Deserialize, Serialize};

use super::format::format_elapsed;
use super::state::{GameState, GameStatus};
use crate::cards::Symbol;

/// Summary of a game in progress or finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    /// Completed turns.
    pub moves: u32,

    /// Seconds on the timer.
    pub elapsed_seconds: u64,

    /// Pairs found so far.
    pub pairs_found: usize,

    /// Pairs in the deck.
    pub total_pairs: usize,

    /// Lifecycle stage.
    pub status: GameStatus,
}

impl GameStats {
    /// Collect statistics from a game state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            moves: state.move_count(),
            elapsed_seconds: state.elapsed_seconds(),
            pairs_found: state.pairs_found(),
            total_pairs: Symbol::COUNT,
            status: state.status(),
        }
    }

    /// Elapsed time as `MM:SS`.
    #[must_use]
    pub fn elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    /// Victory line, once the game is won.
    #[must_use]
    pub fn victory_summary(&self) -> Option<String> {
        (self.status == GameStatus::Won)
            .then(|| format!("won in {} moves and {}", self.moves, self.elapsed()))
    }
}

impl std::fmt::Display for GameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "moves {} | time {} | pairs {}/{}",
            self.moves,
            self.elapsed(),
            self.pairs_found,
            self.total_pairs
        )
    }
}
