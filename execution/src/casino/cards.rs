//! Shared playing-card helpers.
//!
//! Cards carry a 1-based rank (`1` = Ace, `11..=13` = Jack/Queen/King) and a suit.
//! A card can also be addressed by its deck index `0..52`, where
//! `suit = index / 13` and `rank = index % 13 + 1`.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Total cards in a standard deck.
pub const CARDS_PER_DECK: usize = 52;

/// Ranks per suit.
pub const RANKS_PER_SUIT: u8 = 13;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub const ACE: u8 = 1;
    pub const JACK: u8 = 11;
    pub const QUEEN: u8 = 12;
    pub const KING: u8 = 13;

    /// Returns `None` unless `rank` is in `1..=13`.
    pub fn new(rank: u8, suit: Suit) -> Option<Self> {
        (1..=RANKS_PER_SUIT)
            .contains(&rank)
            .then_some(Self { rank, suit })
    }

    /// Card at deck position `index` (`0..52`).
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= CARDS_PER_DECK {
            return None;
        }
        let suit = Suit::ALL[index / RANKS_PER_SUIT as usize];
        let rank = (index % RANKS_PER_SUIT as usize) as u8 + 1;
        Some(Self { rank, suit })
    }

    /// 1-based rank (1 = Ace, 13 = King).
    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Self::ACE
    }

    /// Blackjack points before soft/hard adjustment: Ace 11, faces 10.
    pub fn points(&self) -> u8 {
        match self.rank {
            Self::ACE => 11,
            r if r >= 10 => 10,
            r => r,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            Self::ACE => "A".to_string(),
            10 => "T".to_string(),
            Self::JACK => "J".to_string(),
            Self::QUEEN => "Q".to_string(),
            Self::KING => "K".to_string(),
            r => r.to_string(),
        };
        write!(f, "{}{}", rank, self.suit.symbol())
    }
}

/// One 52-card deck in index order.
pub fn standard_deck() -> impl Iterator<Item = Card> {
    (0..CARDS_PER_DECK).filter_map(Card::from_index)
}

/// Comma-separated card list for log fields.
pub fn format_card_list(cards: &[Card]) -> String {
    let mut out = String::with_capacity(cards.len().saturating_mul(3));
    for (idx, card) in cards.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", card);
    }
    out
}
