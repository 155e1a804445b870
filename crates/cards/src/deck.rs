// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Cards deck.
use rand::prelude::*;

use crate::{Card, Rank, Suit};

/// A cards Deck.
///
/// Cards are dealt from the top of the deck, i.e. the end of the cards
/// vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in a standard deck.
    pub const SIZE: usize = 52;

    /// Creates a deck with the given cards.
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Creates a new shuffled standard deck.
    pub fn new_and_shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    /// Shuffles the deck to a uniformly random permutation.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals a card from the deck.
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Deals `n` cards, or nothing if fewer than `n` cards are left.
    pub fn deal_many(&mut self, n: usize) -> Option<Vec<Card>> {
        if n > self.cards.len() {
            return None;
        }

        let at = self.cards.len() - n;
        Some(self.cards.split_off(at).into_iter().rev().collect())
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes a card from the deck.
    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }

    /// The cards left in the deck.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Calls the `f` closure for each k-cards hand.
    pub fn for_each<F>(&self, k: usize, mut f: F)
    where
        F: FnMut(&[Card]),
    {
        for_each_combination(&self.cards, k, &mut f);
    }
}

/// Calls the `f` closure for each k-cards combination of `cards`, in the
/// order they appear in `cards`.
pub fn for_each_combination<F>(cards: &[Card], k: usize, f: &mut F)
where
    F: FnMut(&[Card]),
{
    fn visit<F>(cards: &[Card], start: usize, hand: &mut Vec<Card>, k: usize, f: &mut F)
    where
        F: FnMut(&[Card]),
    {
        if hand.len() == k {
            f(hand);
            return;
        }

        let needed = k - hand.len();
        for idx in start..=cards.len() - needed {
            hand.push(cards[idx]);
            visit(cards, idx + 1, hand, k, f);
            hand.pop();
        }
    }

    if k > cards.len() {
        return;
    }

    let mut hand = Vec::with_capacity(k);
    visit(cards, 0, &mut hand, k, f);
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| {
                Rank::numbers()
                    .chain(Rank::faces())
                    .chain([Rank::Ace])
                    .map(move |r| Card::new(r, s))
            })
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self::new(cards)
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::HashSet;
    use rand::rngs::StdRng;

    #[test]
    fn standard_deck() {
        let deck = Deck::default();
        assert_eq!(deck.count(), Deck::SIZE);

        let cards = deck.into_iter().collect::<HashSet<_>>();
        assert_eq!(cards.len(), Deck::SIZE);
        assert!(cards.iter().all(|c| c.rank() != Rank::Joker));
        assert!(cards.iter().all(|c| c.suit() != Suit::None));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut deck = Deck::new_and_shuffled(&mut rng);
        assert_ne!(deck, Deck::default());

        let mut cards = HashSet::default();
        while let Some(card) = deck.deal() {
            cards.insert(card);
        }

        assert!(deck.is_empty());
        assert_eq!(cards.len(), Deck::SIZE);
    }

    #[test]
    fn seeded_shuffles_repeat() {
        let d1 = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(7));
        let d2 = Deck::new_and_shuffled(&mut StdRng::seed_from_u64(7));
        assert_eq!(d1, d2);
    }

    #[test]
    fn deal_many() {
        let mut deck = Deck::default();
        let top = deck.cards()[Deck::SIZE - 1];

        let hand = deck.deal_many(10).unwrap();
        assert_eq!(hand.len(), 10);
        assert_eq!(hand[0], top);
        assert_eq!(deck.count(), Deck::SIZE - 10);

        assert!(deck.deal_many(50).is_none());
        assert_eq!(deck.count(), Deck::SIZE - 10);
    }

    #[test]
    fn deck_for_each() {
        let deck = Deck::default();

        let mut hands = HashSet::default();
        deck.for_each(2, |cards| {
            assert_eq!(cards.len(), 2);
            hands.insert(cards.to_owned());
        });
        assert_eq!(hands.len(), 1_326);

        hands.clear();
        deck.for_each(3, |cards| {
            assert_eq!(cards.len(), 3);
            hands.insert(cards.to_owned());
        });
        assert_eq!(hands.len(), 22_100);
    }

    #[test]
    fn deck_for_each_remove() {
        let mut deck = Deck::default();
        deck.remove(Card::new(Rank::Ace, Suit::Diamonds));
        deck.remove(Card::new(Rank::King, Suit::Diamonds));

        let mut count = 0;
        deck.for_each(2, |_| count += 1);
        assert_eq!(count, 1_225);
    }

    #[test]
    fn combinations_of_seven() {
        let cards = Deck::default().into_iter().take(7).collect::<Vec<_>>();

        let mut count = 0;
        for_each_combination(&cards, 5, &mut |hand| {
            assert_eq!(hand.len(), 5);
            count += 1;
        });
        assert_eq!(count, 21);

        let mut count = 0;
        for_each_combination(&cards, 8, &mut |_| count += 1);
        assert_eq!(count, 0);
    }
}
