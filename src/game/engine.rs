//! The game controller.
//!
//! `MemoryGame` owns the single `GameState` of a session together with
//! the scheduler that delivers its deferred work. Every mutation goes
//! through `&mut self`: a selection from the player or a firing released
//! by `advance`. Each is processed to completion before the next.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use super::snapshot::GameSnapshot;
use super::state::{CardView, GameState, Selection};
use super::stats::GameStats;
use crate::cards::{CardId, Deck, Symbol};
use crate::core::{GameConfig, GameRng, Result};
use crate::schedule::{FiredTask, Scheduler, TaskId, TaskKind, MAX_FIRINGS_PER_ADVANCE};

/// A memory game session.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use memory_match::{MemoryGame, Selection, Symbol};
///
/// let mut game = MemoryGame::seeded(42);
/// let [a, b] = game.state().deck().pair_of(Symbol::Guitar);
///
/// game.select_card(a).unwrap();
/// let result = game.select_card(b).unwrap();
/// assert!(matches!(result, Selection::Matched { symbol: Symbol::Guitar, .. }));
///
/// game.advance(Duration::from_secs(3));
/// assert_eq!(game.state().elapsed_seconds(), 3);
/// assert_eq!(game.stats().to_string(), "moves 1 | time 00:03 | pairs 1/8");
/// ```
#[derive(Clone, Debug)]
pub struct MemoryGame {
    config: GameConfig,

    /// Session RNG; every deal forks from it.
    rng: GameRng,

    state: GameState,

    scheduler: Scheduler,

    /// Repeating timer task while the timer runs.
    tick_task: Option<TaskId>,

    /// Pending flip-back of a mismatched pair.
    flip_back_task: Option<TaskId>,

    /// Games dealt in this session, including the current one.
    games_dealt: u32,
}

impl Default for MemoryGame {
    fn default() -> Self {
        Self::with_rng(GameConfig::default(), GameRng::from_entropy())
    }
}

impl MemoryGame {
    /// Start a session and deal its first game.
    ///
    /// # Errors
    ///
    /// `GameError::InvalidConfig` if the configuration fails validation.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        Ok(Self::with_rng(config, rng))
    }

    /// Start a session with default timing and a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(GameConfig::default().with_seed(seed), GameRng::new(seed))
    }

    fn with_rng(config: GameConfig, mut rng: GameRng) -> Self {
        let state = deal(&mut rng, 1);
        Self {
            config,
            rng,
            state,
            scheduler: Scheduler::new(),
            tick_task: None,
            flip_back_task: None,
            games_dealt: 1,
        }
    }

    /// Deal a new game, replacing the current one.
    ///
    /// Every pending task of the previous game is canceled, so a stale
    /// tick or flip-back can never touch the new state.
    pub fn new_game(&mut self) -> &GameState {
        self.scheduler.cancel_all();
        self.tick_task = None;
        self.flip_back_task = None;

        self.games_dealt += 1;
        self.state = deal(&mut self.rng, self.games_dealt);
        &self.state
    }

    /// Select a card.
    ///
    /// Returns what happened. Clicks the player is not allowed to make
    /// come back as `Selection::Ignored` and change nothing.
    ///
    /// # Errors
    ///
    /// `GameError::UnknownCard` if `id` is not in the current deck. That
    /// means the caller is out of sync with the engine; the state is left
    /// untouched.
    pub fn select_card(&mut self, id: CardId) -> Result<Selection> {
        let timer_was_active = self.state.timer_active();

        let selection = match self.state.select(id) {
            Ok(selection) => selection,
            Err(err) => {
                warn!(card = %id, "rejected selection of a card outside the deck");
                return Err(err);
            }
        };

        if !timer_was_active && self.state.timer_active() {
            self.start_timer();
        }

        match selection {
            Selection::FirstRevealed { card } => {
                debug!(card = %card, "first card revealed");
            }
            Selection::Matched { symbol, cards } => {
                debug!(?symbol, first = %cards[0], second = %cards[1], moves = self.state.move_count(), "pair matched");
            }
            Selection::Mismatched { cards } => {
                debug_assert!(self.flip_back_task.is_none(), "at most one flip-back may be pending");
                let task = self.scheduler.schedule_once(TaskKind::FlipBack, self.config.flip_back_delay);
                self.flip_back_task = Some(task);
                debug!(first = %cards[0], second = %cards[1], moves = self.state.move_count(), "pair mismatched");
            }
            Selection::Won { moves, .. } => {
                self.stop_timer();
                info!(
                    moves,
                    elapsed = self.state.elapsed_seconds(),
                    game = self.games_dealt,
                    "all pairs found"
                );
            }
            Selection::Ignored(reason) => {
                trace!(card = %id, ?reason, "selection ignored");
            }
        }

        Ok(selection)
    }

    /// Advance virtual time, applying every task that falls due.
    ///
    /// Firings are applied one at a time in due order. Returns them in
    /// the order they were applied. A single call applies at most
    /// `MAX_FIRINGS_PER_ADVANCE` ticks; further missed ticks are skipped.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FiredTask> {
        let deadline = self.scheduler.deadline_after(elapsed);
        let mut fired = Vec::new();

        while let Some(task) = self.scheduler.fire_next(deadline) {
            self.apply(task);
            fired.push(task);
            if fired.len() == MAX_FIRINGS_PER_ADVANCE {
                let skipped = self.scheduler.skip_missed(deadline);
                warn!(skipped, deadline, "firing limit reached, skipping missed ticks");
            }
        }

        self.scheduler.advance_to(deadline);

        // The tick retires once the virtual clock cannot reach its next firing.
        if self.tick_task.is_some() && !self.is_tick_scheduled() {
            self.tick_task = None;
            self.state.stop_timer();
            warn!(at = self.scheduler.now(), "virtual clock exhausted, timer stopped");
        }
        fired
    }

    fn apply(&mut self, task: FiredTask) {
        match task.kind {
            TaskKind::FlipBack => {
                if self.flip_back_task == Some(task.id) {
                    self.flip_back_task = None;
                }
                if self.state.flip_back() {
                    debug!(at = task.at, "mismatched pair turned back");
                }
            }
            TaskKind::TimerTick => {
                if self.state.tick() {
                    trace!(elapsed = self.state.elapsed_seconds(), "timer tick");
                }
            }
        }
    }

    fn start_timer(&mut self) {
        if let Some(old) = self.tick_task.take() {
            self.scheduler.cancel(old);
        }
        self.tick_task = self.scheduler.schedule_repeating(TaskKind::TimerTick, self.config.tick_interval);
        if self.tick_task.is_none() {
            self.state.stop_timer();
            warn!(interval = ?self.config.tick_interval, "tick interval too short, timer not started");
            return;
        }
        debug!(at = self.scheduler.now(), "timer started");
    }

    fn stop_timer(&mut self) {
        if let Some(task) = self.tick_task.take() {
            self.scheduler.cancel(task);
            debug!(at = self.scheduler.now(), "timer stopped");
        }
    }

    // === Queries ===

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The scheduler holding pending timer and flip-back tasks.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of games dealt in this session.
    #[must_use]
    pub fn games_dealt(&self) -> u32 {
        self.games_dealt
    }

    /// Check if a mismatched pair is waiting to be turned back.
    #[must_use]
    pub fn is_flip_back_pending(&self) -> bool {
        self.flip_back_task.is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// Check if a timer tick is scheduled.
    #[must_use]
    pub fn is_tick_scheduled(&self) -> bool {
        self.tick_task.is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// Renderer view of one card.
    #[must_use]
    pub fn card_view(&self, id: CardId) -> Option<CardView> {
        self.state.card_view(id)
    }

    /// Renderer views of every card in deck order.
    #[must_use]
    pub fn card_views(&self) -> Vec<CardView> {
        self.state.card_views()
    }

    /// Cards the player can select right now.
    #[must_use]
    pub fn selectable_cards(&self) -> Vec<CardId> {
        self.state.selectable_cards()
    }

    /// Pairs found so far.
    #[must_use]
    pub fn pairs_found(&self) -> usize {
        self.state.pairs_found()
    }

    /// Pairs in a deck.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        Symbol::COUNT
    }

    /// Statistics for a status bar.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        GameStats::from_state(&self.state)
    }

    /// Victory line once every pair is found.
    #[must_use]
    pub fn victory_summary(&self) -> Option<String> {
        self.stats().victory_summary()
    }

    // === Snapshots ===

    /// Capture the whole session: state, pending tasks, RNG, config.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            rng: self.rng.state(),
            state: self.state.clone(),
            scheduler: self.scheduler.clone(),
            tick_task: self.tick_task,
            flip_back_task: self.flip_back_task,
            games_dealt: self.games_dealt,
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// # Errors
    ///
    /// `GameError::InvalidConfig` or `GameError::CorruptSnapshot` if the
    /// snapshot violates a game invariant.
    pub fn restore(snapshot: GameSnapshot) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            config: snapshot.config,
            rng: GameRng::from_state(&snapshot.rng),
            state: snapshot.state,
            scheduler: snapshot.scheduler,
            tick_task: snapshot.tick_task,
            flip_back_task: snapshot.flip_back_task,
            games_dealt: snapshot.games_dealt,
        })
    }
}

/// Deal a game from a fresh fork of the session RNG.
fn deal(rng: &mut GameRng, game: u32) -> GameState {
    let mut deal_rng = rng.fork();
    let state = GameState::new(Deck::shuffled(&mut deal_rng));
    debug!(game, deal_seed = deal_rng.seed(), "dealt new game");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameError;
    use crate::game::state::{GameStatus, IgnoreReason, TurnPhase};

    fn mismatched_pair(game: &MemoryGame) -> [CardId; 2] {
        let deck = game.state().deck();
        let first = deck.pair_of(Symbol::Gamepad)[0];
        let second = deck.pair_of(Symbol::Target)[0];
        [first, second]
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = GameConfig::new().with_flip_back_delay(Duration::ZERO);
        assert!(matches!(
            MemoryGame::new(config),
            Err(GameError::InvalidConfig { field: "flip_back_delay", .. })
        ));
    }

    #[test]
    fn test_seeded_sessions_deal_identically() {
        let a = MemoryGame::seeded(11);
        let b = MemoryGame::seeded(11);
        assert_eq!(a.state().deck(), b.state().deck());
        assert_eq!(a.games_dealt(), 1);
    }

    #[test]
    fn test_timer_scheduled_on_first_selection() {
        let mut game = MemoryGame::seeded(1);
        assert!(!game.is_tick_scheduled());

        game.select_card(CardId::new(0)).unwrap();
        assert!(game.is_tick_scheduled());
        assert_eq!(game.state().status(), GameStatus::Running);
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut game = MemoryGame::seeded(5);
        let [a, b] = mismatched_pair(&game);

        game.select_card(a).unwrap();
        let result = game.select_card(b).unwrap();
        assert_eq!(result, Selection::Mismatched { cards: [a, b] });
        assert!(game.is_flip_back_pending());

        game.advance(Duration::from_millis(999));
        assert_eq!(game.state().turn_phase(), TurnPhase::AwaitingFlipBack);

        game.advance(Duration::from_millis(1));
        assert_eq!(game.state().turn_phase(), TurnPhase::Idle);
        assert!(!game.is_flip_back_pending());
        assert_eq!(game.state().move_count(), 1);
    }

    #[test]
    fn test_locked_during_flip_back() {
        let mut game = MemoryGame::seeded(5);
        let [a, b] = mismatched_pair(&game);
        game.select_card(a).unwrap();
        game.select_card(b).unwrap();

        let other = game.state().deck().pair_of(Symbol::Die)[0];
        assert_eq!(
            game.select_card(other).unwrap(),
            Selection::Ignored(IgnoreReason::Locked)
        );
        assert_eq!(game.scheduler().pending_count(), 2);
    }

    #[test]
    fn test_new_game_cancels_pending_tasks() {
        let mut game = MemoryGame::seeded(5);
        let [a, b] = mismatched_pair(&game);
        game.select_card(a).unwrap();
        game.select_card(b).unwrap();

        game.new_game();
        assert_eq!(game.scheduler().pending_count(), 0);
        assert!(!game.is_flip_back_pending());
        assert!(!game.is_tick_scheduled());

        game.advance(Duration::from_secs(5));
        assert_eq!(game.state().elapsed_seconds(), 0);
        assert_eq!(game.games_dealt(), 2);
    }

    #[test]
    fn test_unknown_card() {
        let mut game = MemoryGame::seeded(5);
        let err = game.select_card(CardId::new(99)).unwrap_err();

        assert!(matches!(err, GameError::UnknownCard { .. }));
        assert!(!game.is_tick_scheduled());
    }

    #[test]
    fn test_pair_count() {
        let game = MemoryGame::seeded(5);
        assert_eq!(game.pair_count(), 8);
        assert_eq!(game.pairs_found(), 0);
        assert_eq!(game.victory_summary(), None);
    }
}
