//! Card symbols.
//!
//! The alphabet is fixed: eight symbols, each dealt twice.

use serde::{Deserialize, Serialize};

/// One of the eight card faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    Gamepad,
    Target,
    Palette,
    Masks,
    CircusTent,
    Guitar,
    Die,
    SlotMachine,
}

impl Symbol {
    /// Number of distinct symbols (and pairs) in a deck.
    pub const COUNT: usize = 8;

    /// Every symbol in declaration order.
    pub const ALL: [Symbol; Self::COUNT] = [
        Symbol::Gamepad,
        Symbol::Target,
        Symbol::Palette,
        Symbol::Masks,
        Symbol::CircusTent,
        Symbol::Guitar,
        Symbol::Die,
        Symbol::SlotMachine,
    ];

    /// Position of this symbol in `ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The glyph a renderer shows on the card face.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Symbol::Gamepad => "🎮",
            Symbol::Target => "🎯",
            Symbol::Palette => "🎨",
            Symbol::Masks => "🎭",
            Symbol::CircusTent => "🎪",
            Symbol::Guitar => "🎸",
            Symbol::Die => "🎲",
            Symbol::SlotMachine => "🎰",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Set of symbols stored as a bitmask.
///
/// Used for the matched pairs of a game. Insertion is the only mutation,
/// so a symbol never leaves the set for the rest of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolSet(u8);

impl SymbolSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a symbol. Returns `true` if it was not already present.
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        let bit = 1u8 << symbol.index();
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, symbol: Symbol) -> bool {
        self.0 & (1u8 << symbol.index()) != 0
    }

    /// Number of symbols in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if every symbol is present.
    #[must_use]
    pub const fn is_full(self) -> bool {
        self.len() == Symbol::COUNT
    }

    /// Iterate members in `Symbol::ALL` order.
    pub fn iter(self) -> impl Iterator<Item = Symbol> {
        Symbol::ALL.into_iter().filter(move |&s| self.contains(s))
    }
}
