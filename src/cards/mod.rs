//! Card system: symbols, cards, and the dealt deck.
//!
//! - `Symbol`: the eight card faces
//! - `Card`: an immutable (id, symbol) pair
//! - `Deck`: sixteen cards, two per symbol, in dealt order

mod card;
mod deck;
mod symbol;

pub use card::{Card, CardId};
pub use deck::{Deck, DECK_SIZE};
pub use symbol::{Symbol, SymbolSet};
