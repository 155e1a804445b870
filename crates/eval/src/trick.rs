// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Trick resolution with trumps, bowers and the Joker.
use cardgame_cards::{Card, Rank, Suit, Trick};

use crate::{Error, Ranking, Result};

/// Ranks of Five Hundred decks, lowest first.
///
/// Six players decks include numbered 11, 12 and 13 below the faces.
pub fn five_hundred_ranks() -> impl Iterator<Item = Rank> {
    Rank::numbers()
        .chain((11..=13).map(Rank::Numbered))
        .chain(Rank::faces())
        .chain([Rank::Ace])
}

/// Resolves the winning card of Five Hundred tricks.
///
/// Cards are ranked, highest first, by: the Joker, the right bower (Jack of
/// trumps), the left bower (Jack of the other suit of the trump color), any
/// trump, any card of the led suit, and finally by rank.
#[derive(Debug, Clone)]
pub struct TrickResolver {
    partners: [(Suit, Suit); 4],
    ranks: Ranking,
}

impl Default for TrickResolver {
    fn default() -> Self {
        Self {
            partners: [
                (Suit::Hearts, Suit::Diamonds),
                (Suit::Diamonds, Suit::Hearts),
                (Suit::Clubs, Suit::Spades),
                (Suit::Spades, Suit::Clubs),
            ],
            ranks: Ranking::from_ranks(five_hundred_ranks().collect()),
        }
    }
}

impl TrickResolver {
    /// Creates a resolver that breaks final ties with the given ranking.
    pub fn new(ranks: Ranking) -> Self {
        Self {
            ranks,
            ..Self::default()
        }
    }

    /// The suit sharing the trump color, [Suit::None] for no trumps.
    pub fn partner(&self, trump: Suit) -> Suit {
        self.partners
            .iter()
            .find_map(|&(suit, partner)| (suit == trump).then_some(partner))
            .unwrap_or(Suit::None)
    }

    /// Builds the ranking used for a trick with the given trump and led suit.
    pub fn ranking(&self, trump: Suit, led: Suit) -> Result<Ranking> {
        Ranking::composite([
            Ranking::matching(Card::joker()),
            Ranking::matching(Card::new(Rank::Jack, trump)),
            Ranking::matching(Card::new(Rank::Jack, self.partner(trump))),
            Ranking::suit(trump),
            Ranking::suit(led),
            self.ranks.clone(),
        ])
    }

    /// Returns the winning card of a trick.
    pub fn winning_card(&self, trick: &Trick) -> Result<Card> {
        let led = trick.led().ok_or(Error::EmptyTrick)?;
        let ranking = self.ranking(trick.trump(), led)?;
        ranking.highest(trick.cards())?.ok_or(Error::EmptyTrick)
    }
}

/// Returns the winning card of a trick using the Five Hundred rules.
///
/// ```
/// # use cardgame_eval::{parse_cards, winning_card, Suit, Trick};
/// let trick = Trick::new(parse_cards("10D JD 4H KD").unwrap(), Suit::Hearts);
/// assert_eq!(winning_card(&trick).unwrap(), "JD".parse().unwrap());
/// ```
pub fn winning_card(trick: &Trick) -> Result<Card> {
    TrickResolver::default().winning_card(trick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardgame_cards::parse_cards;

    #[track_caller]
    fn assert_winner(winner: &str, cards: &str, trump: Suit) {
        let trick = Trick::new(parse_cards(cards).unwrap(), trump);
        assert_eq!(
            winning_card(&trick).unwrap(),
            winner.parse::<Card>().unwrap(),
            "trick {cards} with trump {trump:?}"
        );
    }

    #[test]
    fn highest_card() {
        assert_winner("AD", "10D 9D AD 2D", Suit::None);
    }

    #[test]
    fn highest_card_of_led_suit() {
        assert_winner("KD", "10D JS AC KD", Suit::None);
    }

    #[test]
    fn trump_beats_high_suit() {
        assert_winner("5S", "10D 5S AC KD", Suit::Spades);
    }

    #[test]
    fn left_bower_beats_ace() {
        assert_winner("JD", "10D JD 4H KD", Suit::Hearts);
        assert_winner("JH", "10D JH KD KH", Suit::Diamonds);
        assert_winner("JS", "5H JS 5C KS", Suit::Clubs);
        assert_winner("JC", "5S JC KC KS", Suit::Spades);
    }

    #[test]
    fn right_bower_beats_left_bower() {
        assert_winner("JH", "10S JD JH AH", Suit::Hearts);
        assert_winner("JD", "10S JD JH AD", Suit::Diamonds);
        assert_winner("JC", "5H JS JC KC", Suit::Clubs);
        assert_winner("JS", "5D JC JS QS", Suit::Spades);
    }

    #[test]
    fn joker_beats_everything() {
        assert_winner("Jk", "Jk JD JH AH", Suit::Hearts);
        assert_winner("Jk", "AD Jk AS AH", Suit::None);
    }

    #[test]
    fn no_trumps_ignores_bowers() {
        assert_winner("QH", "JH QH 10S JD", Suit::None);
    }

    #[test]
    fn six_players_ranks() {
        assert_winner("13H", "13H 12H 11H 10H", Suit::None);
        assert_winner("JH", "13H JH 11H 10H", Suit::None);
    }

    #[test]
    fn empty_trick_fails() {
        let trick = Trick::empty(Suit::Hearts);
        assert_eq!(winning_card(&trick), Err(Error::EmptyTrick));
    }

    #[test]
    fn partners() {
        let resolver = TrickResolver::default();
        assert_eq!(resolver.partner(Suit::Hearts), Suit::Diamonds);
        assert_eq!(resolver.partner(Suit::Clubs), Suit::Spades);
        assert_eq!(resolver.partner(Suit::None), Suit::None);
    }

    #[test]
    fn custom_ranks() {
        // With aces low the king wins the led suit.
        let resolver = TrickResolver::new(Ranking::ace_low());
        let trick = Trick::new(parse_cards("AD KD 2D").unwrap(), Suit::None);
        assert_eq!(resolver.winning_card(&trick).unwrap(), "KD".parse().unwrap());
    }
}
