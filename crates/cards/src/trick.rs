// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! A played trick.
use crate::{Card, Suit};

/// Cards played in a trick, first-played first, and the trick trump.
///
/// For unsuited tricks use [Suit::None] as trump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trick {
    cards: Vec<Card>,
    trump: Suit,
}

impl Trick {
    /// Creates a trick.
    pub fn new(cards: Vec<Card>, trump: Suit) -> Self {
        Self { cards, trump }
    }

    /// Creates an empty trick.
    pub fn empty(trump: Suit) -> Self {
        Self::new(Vec::new(), trump)
    }

    /// Returns a new trick with the card added.
    #[must_use]
    pub fn add(&self, card: Card) -> Self {
        let mut cards = self.cards.clone();
        cards.push(card);
        Self::new(cards, self.trump)
    }

    /// The played cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The trick trump.
    pub fn trump(&self) -> Suit {
        self.trump
    }

    /// The suit of the first card played.
    pub fn led(&self) -> Option<Suit> {
        self.cards.first().map(Card::suit)
    }

    /// Number of cards played.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Checks if no card has been played.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_cards;

    #[test]
    fn add_returns_new_trick() {
        let trick = Trick::empty(Suit::Hearts);
        assert!(trick.is_empty());
        assert_eq!(trick.led(), None);

        let cards = parse_cards("10D AH").unwrap();
        let t1 = trick.add(cards[0]);
        let t2 = t1.add(cards[1]);

        assert!(trick.is_empty());
        assert_eq!(t1.len(), 1);
        assert_eq!(t2.cards(), &cards[..]);
        assert_eq!(t2.led(), Some(Suit::Diamonds));
        assert_eq!(t2.trump(), Suit::Hearts);
    }
}
