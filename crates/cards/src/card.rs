// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Card value types.
//!
//! Cards are deliberately not ordered: every game defines its own ordering,
//! see the `cardgame-eval` rankings.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Error returned when a card shorthand token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card {token:?}: {reason}")]
pub struct ParseCardError {
    token: String,
    reason: &'static str,
}

impl ParseCardError {
    fn new(token: &str, reason: &'static str) -> Self {
        Self {
            token: token.to_string(),
            reason,
        }
    }

    /// The token that failed to parse.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Card rank, a number or a named face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// A numbered rank, 2 to 10 in standard decks, up to 13 in six players
    /// Five Hundred decks.
    Numbered(u8),
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
    /// Joker
    Joker,
}

impl Rank {
    /// The numbers 2 to 10.
    pub fn numbers() -> impl DoubleEndedIterator<Item = Rank> {
        (2..=10).map(Rank::Numbered)
    }

    /// The three face ranks: Jack, Queen, and King.
    pub fn faces() -> impl DoubleEndedIterator<Item = Rank> {
        [Rank::Jack, Rank::Queen, Rank::King].into_iter()
    }

    /// All standard ranks plus the Joker.
    pub fn all() -> impl Iterator<Item = Rank> {
        Rank::numbers()
            .chain(Rank::faces())
            .chain([Rank::Ace, Rank::Joker])
    }

    /// Long name of this rank.
    pub fn name(&self) -> String {
        match self {
            Rank::Numbered(n) => format!("R{n}"),
            Rank::Jack => "Jack".to_string(),
            Rank::Queen => "Queen".to_string(),
            Rank::King => "King".to_string(),
            Rank::Ace => "Ace".to_string(),
            Rank::Joker => "Joker".to_string(),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Numbered(n) => write!(f, "{n}"),
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            Rank::Ace => write!(f, "A"),
            Rank::Joker => write!(f, "Jk"),
        }
    }
}

/// Suit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Hearts and diamonds.
    Red,
    /// Clubs and spades.
    Black,
    /// The color of the unsuited cards.
    None,
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Hearts suit.
    Hearts,
    /// Diamonds suit.
    Diamonds,
    /// Clubs suit.
    Clubs,
    /// Spades suit.
    Spades,
    /// No suit, used for the Joker and for no trumps.
    None,
}

impl Suit {
    /// The four colored suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades].into_iter()
    }

    /// All suits, including [Suit::None].
    pub fn all() -> impl DoubleEndedIterator<Item = Suit> {
        Suit::suits().chain([Suit::None])
    }

    /// Color of the suit.
    pub fn color(&self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
            Suit::None => Color::None,
        }
    }

    fn from_letter(letter: char) -> Option<Suit> {
        match letter {
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Hearts => "H",
            Suit::Diamonds => "D",
            Suit::Clubs => "C",
            Suit::Spades => "S",
            Suit::None => "",
        };

        write!(f, "{suit}")
    }
}

/// A playing card of rank and suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a card given a rank and suit.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Self { rank, suit }
    }

    /// Create a card with no suit.
    pub fn unsuited(rank: Rank) -> Card {
        Self::new(rank, Suit::None)
    }

    /// The Joker.
    pub fn joker() -> Card {
        Self::unsuited(Rank::Joker)
    }

    /// Returns the card rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the card suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    /// Parses the shorthand syntax: a rank (`A`, `K`, `Q`, `J` or a number)
    /// followed by a suit letter (`H`, `D`, `S`, `C`), or `Jk` for the Joker.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Jk" {
            return Ok(Card::joker());
        }

        let mut chars = s.chars();
        let suit = chars
            .next_back()
            .ok_or_else(|| ParseCardError::new(s, "empty token"))?;
        let suit = Suit::from_letter(suit).ok_or_else(|| ParseCardError::new(s, "unknown suit"))?;

        let rank = match chars.as_str() {
            "A" => Rank::Ace,
            "K" => Rank::King,
            "Q" => Rank::Queen,
            "J" => Rank::Jack,
            "" => return Err(ParseCardError::new(s, "missing rank")),
            n if n.starts_with(['+', '0']) => return Err(ParseCardError::new(s, "unknown rank")),
            n => match n.parse::<u8>() {
                Ok(n) if (2..=13).contains(&n) => Rank::Numbered(n),
                _ => return Err(ParseCardError::new(s, "unknown rank")),
            },
        };

        Ok(Card::new(rank, suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The Joker renders the same whatever its suit.
        if self.rank == Rank::Joker {
            return write!(f, "{}", self.rank);
        }

        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({self})")
    }
}

/// Builds cards from whitespace separated shorthand tokens.
///
/// ```
/// # use cardgame_cards::{parse_cards, Card, Rank, Suit};
/// let hand = parse_cards("10H JC Jk").unwrap();
/// assert_eq!(hand[0], Card::new(Rank::Numbered(10), Suit::Hearts));
/// assert_eq!(hand[2], Card::joker());
/// ```
pub fn parse_cards(s: &str) -> Result<Vec<Card>, ParseCardError> {
    s.split_whitespace().map(str::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_from_string() {
        let c: Card = "AD".parse().unwrap();
        assert_eq!(c, Card::new(Rank::Ace, Suit::Diamonds));

        let c: Card = "10H".parse().unwrap();
        assert_eq!(c, Card::new(Rank::Numbered(10), Suit::Hearts));

        let c: Card = "KS".parse().unwrap();
        assert_eq!(c, Card::new(Rank::King, Suit::Spades));

        let c: Card = "13D".parse().unwrap();
        assert_eq!(c, Card::new(Rank::Numbered(13), Suit::Diamonds));

        let c: Card = "Jk".parse().unwrap();
        assert_eq!(c, Card::joker());
    }

    #[test]
    fn card_to_string() {
        let c = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(c.to_string(), "KD");

        let c = Card::new(Rank::Numbered(10), Suit::Hearts);
        assert_eq!(c.to_string(), "10H");

        let c = Card::new(Rank::Jack, Suit::Clubs);
        assert_eq!(c.to_string(), "JC");

        assert_eq!(Card::joker().to_string(), "Jk");
        assert_eq!(Card::new(Rank::Joker, Suit::Spades).to_string(), "Jk");
    }

    #[test]
    fn shorthand_round_trip() {
        for rank in Rank::numbers()
            .chain(Rank::faces())
            .chain([Rank::Ace, Rank::Numbered(11), Rank::Numbered(13)])
        {
            for suit in Suit::suits() {
                let card = Card::new(rank, suit);
                assert_eq!(card.to_string().parse::<Card>(), Ok(card));
            }
        }

        // Jokers always come back unsuited.
        let joker = Card::new(Rank::Joker, Suit::Hearts);
        assert_eq!(joker.to_string().parse::<Card>(), Ok(Card::joker()));
    }

    #[test]
    fn malformed_tokens() {
        for token in ["", "H", "1H", "14H", "AX", "ZH", "10", "jk", "+5H", "05H", "010C"] {
            let err = token.parse::<Card>().unwrap_err();
            assert_eq!(err.token(), token);
        }

        assert!(parse_cards("AH KX").is_err());
    }

    #[test]
    fn suit_colors() {
        assert_eq!(Suit::Hearts.color(), Suit::Diamonds.color());
        assert_eq!(Suit::Clubs.color(), Suit::Spades.color());
        assert_ne!(Suit::Hearts.color(), Suit::Spades.color());
        assert_eq!(Suit::None.color(), Color::None);
        assert_eq!(Suit::all().count(), 5);
    }

    #[test]
    fn rank_sets() {
        assert_eq!(Rank::numbers().count(), 9);
        assert_eq!(Rank::all().count(), 14);
        assert_eq!(Rank::Numbered(7).name(), "R7");
        assert_eq!(Rank::Joker.name(), "Joker");
    }
}
