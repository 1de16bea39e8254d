//! Session snapshots.
//!
//! A `GameSnapshot` captures everything needed to rebuild a
//! `MemoryGame` exactly: configuration, RNG position, game state and the
//! scheduler with its pending tasks. Snapshots are an in-memory
//! checkpoint for replays and tests; the bincode encoding is stable only
//! within one build of the crate.

use serde::{Deserialize, Serialize};

use super::state::{GameState, TurnPhase};
use crate::core::{GameConfig, GameError, GameRngState, Result};
use crate::schedule::{Scheduler, TaskId, TaskKind};

/// Serializable capture of a `MemoryGame`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub(crate) config: GameConfig,
    pub(crate) rng: GameRngState,
    pub(crate) state: GameState,
    pub(crate) scheduler: Scheduler,
    pub(crate) tick_task: Option<TaskId>,
    pub(crate) flip_back_task: Option<TaskId>,
    pub(crate) games_dealt: u32,
}

impl GameSnapshot {
    /// The captured game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The captured configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Virtual time at capture, in milliseconds.
    #[must_use]
    pub fn captured_at(&self) -> u64 {
        self.scheduler.now()
    }

    /// Encode with bincode.
    ///
    /// # Errors
    ///
    /// `GameError::Snapshot` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes produced by `to_bytes`.
    ///
    /// Decoding does not check game invariants; `MemoryGame::restore`
    /// does.
    ///
    /// # Errors
    ///
    /// `GameError::Snapshot` if the bytes are not a valid encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Check that the snapshot describes a reachable session.
    pub(crate) fn validate(&self) -> Result<()> {
        self.config.validate()?;
        self.state.validate()?;
        self.scheduler.validate()?;

        if let Some(id) = self.tick_task {
            self.check_task(id, TaskKind::TimerTick, true)?;
        }
        if let Some(id) = self.flip_back_task {
            self.check_task(id, TaskKind::FlipBack, false)?;
        }

        let tick_pending = self.tick_task.is_some_and(|id| self.scheduler.is_pending(id));
        if self.state.timer_active() != tick_pending {
            return Err(GameError::corrupt("timer flag disagrees with the scheduled tick"));
        }

        let awaiting = self.state.turn_phase() == TurnPhase::AwaitingFlipBack;
        let flip_pending = self.flip_back_task.is_some_and(|id| self.scheduler.is_pending(id));
        if awaiting != flip_pending {
            return Err(GameError::corrupt("revealed pair disagrees with the pending flip-back"));
        }

        let tracked = usize::from(tick_pending) + usize::from(flip_pending);
        if self.scheduler.pending_count() != tracked {
            return Err(GameError::corrupt("scheduler holds untracked tasks"));
        }

        if self.games_dealt == 0 {
            return Err(GameError::corrupt("session has not dealt a game"));
        }
        Ok(())
    }

    /// A tracked task, if still queued, must have the kind and cadence
    /// the engine gives it.
    fn check_task(&self, id: TaskId, kind: TaskKind, repeating: bool) -> Result<()> {
        match self.scheduler.kind_of(id) {
            None => Ok(()),
            Some(found) if found != kind => Err(GameError::corrupt(format!(
                "{} should be {:?} but is {:?}",
                id, kind, found
            ))),
            Some(_) if self.scheduler.is_repeating(id) != repeating => {
                Err(GameError::corrupt(format!("{} has the wrong cadence for {:?}", id, kind)))
            }
            Some(_) => Ok(()),
        }
    }
}
