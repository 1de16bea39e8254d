//! Game state and turn resolution.
//!
//! `GameState` is the complete state of one game: the dealt deck, the
//! face-up unresolved cards, the matched symbols, the move counter and
//! the elapsed-time counter. It knows nothing about time; the
//! `MemoryGame` controller schedules flip-backs and ticks and calls
//! back into the state when they fire.
//!
//! ## Turn cycle
//!
//! ```text
//! Idle ──select──▶ OneRevealed ──select──▶ match ──▶ Idle
//!                                     └──▶ mismatch ──▶ AwaitingFlipBack ──flip_back──▶ Idle
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardId, Deck, Symbol, SymbolSet};
use crate::core::{GameError, Result};

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Two cards are face-up waiting to be turned back.
    Locked,
    /// The card is already face-up in the current turn.
    AlreadyRevealed,
    /// The card's pair has already been found.
    AlreadyMatched,
    /// Every pair has been found.
    GameOver,
}

/// Result of selecting a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection {
    /// First card of a turn turned face-up.
    FirstRevealed { card: CardId },

    /// Second card matched the first; both stay face-up.
    Matched { symbol: Symbol, cards: [CardId; 2] },

    /// Second card did not match; both flip back after the delay.
    Mismatched { cards: [CardId; 2] },

    /// The final pair was found.
    Won { symbol: Symbol, cards: [CardId; 2], moves: u32 },

    /// Nothing changed.
    Ignored(IgnoreReason),
}

impl Selection {
    /// Check if the selection was a no-op.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Selection::Ignored(_))
    }

    /// Check if the selection completed a turn (counted as a move).
    #[must_use]
    pub fn completes_turn(&self) -> bool {
        matches!(
            self,
            Selection::Matched { .. } | Selection::Mismatched { .. } | Selection::Won { .. }
        )
    }
}

/// Game lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Dealt, no card selected yet.
    NotStarted,
    /// At least one card selected, pairs remain.
    Running,
    /// Every pair found.
    Won,
}

/// Where the current turn stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No unresolved card is face-up.
    Idle,
    /// One card is face-up waiting for its partner.
    OneRevealed,
    /// A mismatched pair is face-up until the flip-back fires.
    AwaitingFlipBack,
}

/// What a renderer may know about one card.
///
/// `symbol` is only exposed while the card is face-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub face_up: bool,
    pub matched: bool,
    pub symbol: Option<Symbol>,
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    deck: Deck,

    /// Face-up cards of the current turn, in selection order (at most 2).
    revealed: SmallVec<[CardId; 2]>,

    /// Symbols whose pair has been found.
    matched: SymbolSet,

    /// Completed turns.
    move_count: u32,

    /// Seconds counted by the timer.
    elapsed_seconds: u64,

    /// Whether timer ticks currently count.
    timer_active: bool,

    won: bool,
}

impl GameState {
    /// Start a game on a freshly dealt deck.
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            revealed: SmallVec::new(),
            matched: SymbolSet::new(),
            move_count: 0,
            elapsed_seconds: 0,
            timer_active: false,
            won: false,
        }
    }

    // === Accessors ===

    /// The dealt deck.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Face-up cards of the current turn, in selection order.
    #[must_use]
    pub fn revealed(&self) -> &[CardId] {
        &self.revealed
    }

    /// Symbols already matched.
    #[must_use]
    pub fn matched(&self) -> SymbolSet {
        self.matched
    }

    /// Number of completed turns.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Seconds counted since the first selection.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Whether the timer is running.
    #[must_use]
    pub fn timer_active(&self) -> bool {
        self.timer_active
    }

    /// Whether every pair has been found.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Number of pairs found.
    #[must_use]
    pub fn pairs_found(&self) -> usize {
        self.matched.len()
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.won {
            GameStatus::Won
        } else if self.timer_active || self.move_count > 0 || !self.revealed.is_empty() {
            GameStatus::Running
        } else {
            GameStatus::NotStarted
        }
    }

    /// Current stage of the turn.
    #[must_use]
    pub fn turn_phase(&self) -> TurnPhase {
        match self.revealed.len() {
            0 => TurnPhase::Idle,
            1 => TurnPhase::OneRevealed,
            _ => TurnPhase::AwaitingFlipBack,
        }
    }

    // === Projection ===

    /// Check if a card is showing its face.
    #[must_use]
    pub fn is_face_up(&self, id: CardId) -> bool {
        self.card_view(id).is_some_and(|view| view.face_up)
    }

    /// Renderer view of one card. `None` for ids outside the deck.
    #[must_use]
    pub fn card_view(&self, id: CardId) -> Option<CardView> {
        let card = self.deck.get(id)?;
        let matched = self.matched.contains(card.symbol);
        let face_up = matched || self.revealed.contains(&id);
        Some(CardView {
            id,
            face_up,
            matched,
            symbol: face_up.then_some(card.symbol),
        })
    }

    /// Renderer views of every card in deck order.
    #[must_use]
    pub fn card_views(&self) -> Vec<CardView> {
        self.deck
            .iter()
            .filter_map(|card| self.card_view(card.id))
            .collect()
    }

    /// Cards for which a selection would not be ignored.
    #[must_use]
    pub fn selectable_cards(&self) -> Vec<CardId> {
        self.deck
            .iter()
            .filter(|card| self.ignore_reason(card.id, card.symbol).is_none())
            .map(|card| card.id)
            .collect()
    }

    fn ignore_reason(&self, id: CardId, symbol: Symbol) -> Option<IgnoreReason> {
        if self.won {
            Some(IgnoreReason::GameOver)
        } else if self.revealed.len() >= 2 {
            Some(IgnoreReason::Locked)
        } else if self.revealed.contains(&id) {
            Some(IgnoreReason::AlreadyRevealed)
        } else if self.matched.contains(symbol) {
            Some(IgnoreReason::AlreadyMatched)
        } else {
            None
        }
    }

    // === Transitions ===

    /// Select a card.
    ///
    /// Selections the player cannot make (locked board, card already up,
    /// pair already found, game over) return `Selection::Ignored` and
    /// change nothing. The first accepted selection of a game starts the
    /// timer. Completing a pair counts one move whatever the outcome.
    ///
    /// # Errors
    ///
    /// `GameError::UnknownCard` if `id` is not part of the deck.
    pub fn select(&mut self, id: CardId) -> Result<Selection> {
        let card = *self.deck.get(id).ok_or(GameError::UnknownCard {
            id,
            deck_size: self.deck.len(),
        })?;

        if let Some(reason) = self.ignore_reason(id, card.symbol) {
            return Ok(Selection::Ignored(reason));
        }

        if self.move_count == 0 && !self.timer_active {
            self.timer_active = true;
        }

        self.revealed.push(id);
        if self.revealed.len() == 1 {
            return Ok(Selection::FirstRevealed { card: id });
        }

        self.move_count += 1;
        let first = self.revealed[0];
        let cards = [first, id];
        let first_symbol = self.deck.get(first).map(|c| c.symbol);

        if first_symbol != Some(card.symbol) {
            return Ok(Selection::Mismatched { cards });
        }

        self.matched.insert(card.symbol);
        self.revealed.clear();

        if self.matched.is_full() {
            self.won = true;
            self.timer_active = false;
            return Ok(Selection::Won {
                symbol: card.symbol,
                cards,
                moves: self.move_count,
            });
        }

        Ok(Selection::Matched {
            symbol: card.symbol,
            cards,
        })
    }

    /// Turn every unresolved card face-down.
    ///
    /// Idempotent. Returns `true` if any card was turned over.
    pub fn flip_back(&mut self) -> bool {
        let had_cards = !self.revealed.is_empty();
        self.revealed.clear();
        had_cards
    }

    /// Count one second if the timer is running.
    ///
    /// The running flag is read when the tick fires, so a tick that
    /// arrives after the timer stopped does nothing. Returns `true` if
    /// the second was counted.
    pub fn tick(&mut self) -> bool {
        if !self.timer_active {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    /// Stop the timer without ending the game.
    pub(crate) fn stop_timer(&mut self) {
        self.timer_active = false;
    }

    /// Check internal invariants of a state built outside `select`.
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.deck.is_valid() {
            return Err(GameError::corrupt("deck must hold 16 cards, two of each symbol"));
        }
        if self.revealed.len() > 2 {
            return Err(GameError::corrupt("more than two cards revealed"));
        }
        if let Some(id) = self.revealed.iter().find(|id| !self.deck.contains(**id)) {
            return Err(GameError::corrupt(format!("revealed {} is not in the deck", id)));
        }
        if self.revealed.len() == 2 && self.revealed[0] == self.revealed[1] {
            return Err(GameError::corrupt("the same card is revealed twice"));
        }
        if self.won != self.matched.is_full() {
            return Err(GameError::corrupt("win flag disagrees with matched pairs"));
        }
        if self.won && self.timer_active {
            return Err(GameError::corrupt("timer running after the game was won"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deck where card `i` and card `i + 8` share a symbol.
    fn ordered_state() -> GameState {
        let order: Vec<Symbol> = Symbol::ALL.iter().chain(Symbol::ALL.iter()).copied().collect();
        GameState::new(Deck::from_symbols(&order).expect("valid order"))
    }

    fn id(raw: u8) -> CardId {
        CardId::new(raw)
    }

    #[test]
    fn test_new_state() {
        let state = ordered_state();

        assert_eq!(state.move_count(), 0);
        assert_eq!(state.elapsed_seconds(), 0);
        assert!(!state.timer_active());
        assert!(!state.is_won());
        assert!(state.revealed().is_empty());
        assert!(state.matched().is_empty());
        assert_eq!(state.status(), GameStatus::NotStarted);
        assert_eq!(state.turn_phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_first_selection_starts_timer() {
        let mut state = ordered_state();

        let result = state.select(id(3)).unwrap();

        assert_eq!(result, Selection::FirstRevealed { card: id(3) });
        assert!(state.timer_active());
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.turn_phase(), TurnPhase::OneRevealed);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut state = ordered_state();
        state.select(id(3)).unwrap();

        let result = state.select(id(3)).unwrap();

        assert_eq!(result, Selection::Ignored(IgnoreReason::AlreadyRevealed));
        assert_eq!(state.revealed(), &[id(3)]);
        assert_eq!(state.move_count(), 0);
    }

    #[test]
    fn test_match() {
        let mut state = ordered_state();
        state.select(id(2)).unwrap();

        let result = state.select(id(10)).unwrap();

        assert_eq!(
            result,
            Selection::Matched { symbol: Symbol::Palette, cards: [id(2), id(10)] }
        );
        assert_eq!(state.move_count(), 1);
        assert!(state.revealed().is_empty());
        assert!(state.matched().contains(Symbol::Palette));
        assert!(state.is_face_up(id(2)));
        assert!(state.is_face_up(id(10)));
    }

    #[test]
    fn test_mismatch_locks_until_flip_back() {
        let mut state = ordered_state();
        state.select(id(0)).unwrap();

        let result = state.select(id(1)).unwrap();
        assert_eq!(result, Selection::Mismatched { cards: [id(0), id(1)] });
        assert_eq!(state.move_count(), 1);
        assert_eq!(state.turn_phase(), TurnPhase::AwaitingFlipBack);

        let third = state.select(id(5)).unwrap();
        assert_eq!(third, Selection::Ignored(IgnoreReason::Locked));
        assert_eq!(state.revealed(), &[id(0), id(1)]);
        assert!(state.selectable_cards().is_empty());

        assert!(state.flip_back());
        assert!(state.revealed().is_empty());
        assert!(!state.is_face_up(id(0)));
        assert!(!state.flip_back());
    }

    #[test]
    fn test_matched_card_is_ignored() {
        let mut state = ordered_state();
        state.select(id(4)).unwrap();
        state.select(id(12)).unwrap();

        let result = state.select(id(12)).unwrap();
        assert_eq!(result, Selection::Ignored(IgnoreReason::AlreadyMatched));
        assert_eq!(state.move_count(), 1);
    }

    #[test]
    fn test_unknown_card_errors_without_change() {
        let mut state = ordered_state();
        let before = state.clone();

        let err = state.select(id(16)).unwrap_err();

        assert!(matches!(err, GameError::UnknownCard { deck_size: 16, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_win() {
        let mut state = ordered_state();
        for i in 0..7u8 {
            state.select(id(i)).unwrap();
            state.select(id(i + 8)).unwrap();
        }
        assert!(!state.is_won());

        state.select(id(7)).unwrap();
        let result = state.select(id(15)).unwrap();

        assert_eq!(
            result,
            Selection::Won { symbol: Symbol::SlotMachine, cards: [id(7), id(15)], moves: 8 }
        );
        assert!(state.is_won());
        assert!(!state.timer_active());
        assert_eq!(state.status(), GameStatus::Won);
        assert_eq!(state.pairs_found(), 8);
        assert!(state.card_views().iter().all(|v| v.face_up && v.matched));
    }

    #[test]
    fn test_selection_after_win_ignored() {
        let mut state = ordered_state();
        for i in 0..8u8 {
            state.select(id(i)).unwrap();
            state.select(id(i + 8)).unwrap();
        }

        assert_eq!(state.select(id(0)).unwrap(), Selection::Ignored(IgnoreReason::GameOver));
        assert!(!state.timer_active());
        assert_eq!(state.move_count(), 8);
    }

    #[test]
    fn test_tick_gated_on_timer() {
        let mut state = ordered_state();
        assert!(!state.tick());
        assert_eq!(state.elapsed_seconds(), 0);

        state.select(id(0)).unwrap();
        assert!(state.tick());
        assert!(state.tick());
        assert_eq!(state.elapsed_seconds(), 2);
    }

    #[test]
    fn test_card_view_hides_face_down_symbols() {
        let mut state = ordered_state();
        state.select(id(6)).unwrap();

        let up = state.card_view(id(6)).unwrap();
        assert_eq!(up, CardView { id: id(6), face_up: true, matched: false, symbol: Some(Symbol::Die) });

        let down = state.card_view(id(7)).unwrap();
        assert_eq!(down, CardView { id: id(7), face_up: false, matched: false, symbol: None });

        assert!(state.card_view(id(20)).is_none());
    }

    #[test]
    fn test_selectable_cards() {
        let mut state = ordered_state();
        assert_eq!(state.selectable_cards().len(), 16);

        state.select(id(0)).unwrap();
        assert_eq!(state.selectable_cards().len(), 15);

        state.select(id(8)).unwrap();
        assert_eq!(state.selectable_cards().len(), 14);
    }

    #[test]
    fn test_selection_helpers() {
        assert!(Selection::Ignored(IgnoreReason::Locked).is_ignored());
        assert!(!Selection::FirstRevealed { card: id(0) }.completes_turn());
        assert!(Selection::Mismatched { cards: [id(0), id(1)] }.completes_turn());
    }

    #[test]
    fn test_validate() {
        let mut state = ordered_state();
        assert!(state.validate().is_ok());

        state.select(id(0)).unwrap();
        state.select(id(1)).unwrap();
        assert!(state.validate().is_ok());

        state.won = true;
        assert!(state.validate().is_err());
    }
}
