// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Card ranking schemes.
//!
//! A [Ranking] maps a card to an opaque [Token] that orders cards for a
//! specific purpose (ace-high, ace-low, trump suit first, etc). Rankings can
//! be chained with [Ranking::composite], earlier rankings dominate and later
//! ones break ties.
//!
//! Tokens are only comparable with tokens produced by the same ranking:
//! [Ranking::ace_high] and [Ranking::ace_low] are process-wide singletons,
//! while every call to the other constructors creates a new ranking, even if
//! called with the same arguments:
//!
//! ```
//! # use cardgame_eval::{Card, Error, Ranking, Suit};
//! let ah: Card = "AH".parse().unwrap();
//! let kd: Card = "KD".parse().unwrap();
//!
//! let r1 = Ranking::ace_high();
//! let r2 = Ranking::ace_high();
//! let t1 = r1.token(&ah).unwrap();
//! let t2 = r2.token(&kd).unwrap();
//! assert!(t1.try_cmp(&t2).unwrap().is_gt());
//!
//! let hearts1 = Ranking::suit(Suit::Hearts).token(&ah).unwrap();
//! let hearts2 = Ranking::suit(Suit::Hearts).token(&ah).unwrap();
//! assert_eq!(hearts1.try_cmp(&hearts2), Err(Error::IncomparableTokens));
//! ```
use std::{
    cmp::Ordering,
    iter,
    sync::{Arc, LazyLock, atomic},
};

use cardgame_cards::{Card, Rank, Suit};

use crate::{Error, Result};

/// Identifies the ranking that produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Scope(u64);

impl Scope {
    fn new_scope() -> Scope {
        static LAST_ID: atomic::AtomicU64 = atomic::AtomicU64::new(1);
        Scope(LAST_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

static ACE_HIGH: LazyLock<Ranking> = LazyLock::new(|| {
    let ranks = Rank::numbers()
        .chain(Rank::faces())
        .chain([Rank::Ace])
        .collect();
    Ranking::new(Scheme::FromArray(ranks))
});

static ACE_LOW: LazyLock<Ranking> = LazyLock::new(|| {
    let ranks = iter::once(Rank::Ace)
        .chain(Rank::numbers())
        .chain(Rank::faces())
        .collect();
    Ranking::new(Scheme::FromArray(ranks))
});

#[derive(Debug)]
enum Scheme {
    /// Total order over a rank sequence, lowest first.
    FromArray(Vec<Rank>),
    /// Scores 1 for cards matching the condition, 0 otherwise.
    Binary(Condition),
    /// Child rankings, left-most first.
    Composite(Vec<Ranking>),
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    Suit(Suit),
    Card(Card),
}

impl Condition {
    fn matches(&self, card: &Card) -> bool {
        match self {
            Condition::Suit(suit) => card.suit() == *suit,
            Condition::Card(c) => card == c,
        }
    }
}

/// A card ranking scheme.
///
/// Cloning a ranking keeps its scope, tokens produced by the clone compare
/// with tokens produced by the original.
#[derive(Debug, Clone)]
pub struct Ranking {
    scope: Scope,
    scheme: Arc<Scheme>,
}

impl Ranking {
    fn new(scheme: Scheme) -> Self {
        Self {
            scope: Scope::new_scope(),
            scheme: Arc::new(scheme),
        }
    }

    /// Creates a rank ranking from a non empty sequence.
    pub(crate) fn from_ranks(ranks: Vec<Rank>) -> Self {
        debug_assert!(!ranks.is_empty());
        Self::new(Scheme::FromArray(ranks))
    }

    /// Order aces high, ignoring suit.
    pub fn ace_high() -> Ranking {
        ACE_HIGH.clone()
    }

    /// Order aces low, ignoring suit.
    pub fn ace_low() -> Ranking {
        ACE_LOW.clone()
    }

    /// Order cards by the position of their rank in `ranks`, lowest first.
    pub fn by_rank<I>(ranks: I) -> Result<Ranking>
    where
        I: IntoIterator<Item = Rank>,
    {
        let ranks = ranks.into_iter().collect::<Vec<_>>();
        if ranks.is_empty() {
            return Err(Error::InvalidArgument(
                "rank ranking must have at least one rank".to_string(),
            ));
        }

        Ok(Self::new(Scheme::FromArray(ranks)))
    }

    /// Any card matching the suit is ranked higher than any card of
    /// non-matching suits.
    pub fn suit(suit: Suit) -> Ranking {
        Self::new(Scheme::Binary(Condition::Suit(suit)))
    }

    /// The given card is ranked higher than every other card. Useful for
    /// dealing with jokers and other special cards.
    pub fn matching(card: Card) -> Ranking {
        Self::new(Scheme::Binary(Condition::Card(card)))
    }

    /// Create a composite ranking from child rankings. Left-most rankings are
    /// used first, with subsequent ones used to break ties.
    ///
    /// A child that cannot rank a card does not fail the composite token, the
    /// failure is raised only if that child's token is compared.
    ///
    /// ```
    /// # use cardgame_eval::{Card, Ranking, Suit};
    /// let ranking = Ranking::composite([
    ///     Ranking::suit(Suit::Hearts),
    ///     Ranking::ace_high(),
    /// ]).unwrap();
    ///
    /// let cards = ["AS", "2H", "KS"].map(|c| c.parse::<Card>().unwrap());
    /// let sorted = ranking.sort(&cards).unwrap();
    /// assert_eq!(sorted, ["KS", "AS", "2H"].map(|c| c.parse::<Card>().unwrap()));
    /// ```
    pub fn composite<I>(children: I) -> Result<Ranking>
    where
        I: IntoIterator<Item = Ranking>,
    {
        let children = children.into_iter().collect::<Vec<_>>();
        if children.is_empty() {
            return Err(Error::InvalidArgument(
                "composite ranking must have at least one child".to_string(),
            ));
        }

        Ok(Self::new(Scheme::Composite(children)))
    }

    /// Returns a token for a card that sorts with this ranking properties.
    ///
    /// Two cards may produce equal tokens. Tokens are not stable across
    /// versions and should not be persisted.
    pub fn token(&self, card: &Card) -> Result<Token> {
        let value = match self.scheme.as_ref() {
            Scheme::FromArray(ranks) => Value::Index {
                index: self.position(card.rank())?,
                max: ranks.len() - 1,
            },
            Scheme::Binary(condition) => Value::Binary(condition.matches(card)),
            Scheme::Composite(children) => Value::Composite(
                children
                    .iter()
                    .map(|child| match child.token(card) {
                        Ok(token) => Slot::Ranked(token),
                        Err(e) => Slot::Deferred(e),
                    })
                    .collect(),
            ),
        };

        Ok(Token {
            scope: self.scope,
            value,
        })
    }

    /// The highest token this ranking can produce.
    pub fn max(&self) -> Token {
        let value = match self.scheme.as_ref() {
            Scheme::FromArray(ranks) => Value::Index {
                index: ranks.len() - 1,
                max: ranks.len() - 1,
            },
            Scheme::Binary(_) => Value::Binary(true),
            Scheme::Composite(children) => Value::Composite(
                children
                    .iter()
                    .map(|child| Slot::Ranked(child.max()))
                    .collect(),
            ),
        };

        Token {
            scope: self.scope,
            value,
        }
    }

    /// Compares two cards.
    pub fn compare(&self, a: &Card, b: &Card) -> Result<Ordering> {
        self.token(a)?.try_cmp(&self.token(b)?)
    }

    /// Returns the cards sorted from lowest to highest.
    pub fn sort(&self, cards: &[Card]) -> Result<Vec<Card>> {
        let mut keyed = cards
            .iter()
            .map(|card| Ok((self.token(card)?, *card)))
            .collect::<Result<Vec<_>>>()?;

        let mut error = None;
        keyed.sort_by(|(t1, _), (t2, _)| {
            t1.try_cmp(t2).unwrap_or_else(|e| {
                error.get_or_insert(e);
                Ordering::Equal
            })
        });

        match error {
            Some(e) => Err(e),
            None => Ok(keyed.into_iter().map(|(_, card)| card).collect()),
        }
    }

    /// Returns the highest card, the first one played wins ties.
    pub fn highest(&self, cards: &[Card]) -> Result<Option<Card>> {
        let mut best: Option<(Token, Card)> = None;

        for card in cards {
            let token = self.token(card)?;
            let replace = match &best {
                Some((top, _)) => top.try_cmp(&token)? == Ordering::Less,
                None => true,
            };

            if replace {
                best = Some((token, *card));
            }
        }

        Ok(best.map(|(_, card)| card))
    }

    /// Position of a rank in a rank sequence ranking.
    pub(crate) fn position(&self, rank: Rank) -> Result<usize> {
        match self.scheme.as_ref() {
            Scheme::FromArray(ranks) => {
                ranks
                    .iter()
                    .position(|r| *r == rank)
                    .ok_or_else(|| Error::RankNotSupported {
                        rank,
                        known: ranks
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" "),
                    })
            }
            _ => Err(Error::InvalidArgument(
                "ranking does not order ranks".to_string(),
            )),
        }
    }
}

/// An opaque sortable token produced by a [Ranking].
#[derive(Debug, Clone)]
pub struct Token {
    scope: Scope,
    value: Value,
}

#[derive(Debug, Clone)]
enum Value {
    Index { index: usize, max: usize },
    Binary(bool),
    Composite(Vec<Slot>),
}

/// A composite token component.
#[derive(Debug, Clone)]
enum Slot {
    Ranked(Token),
    /// The child could not rank the card, raised if compared.
    Deferred(Error),
}

impl Token {
    /// Compares two tokens.
    ///
    /// Fails with [Error::IncomparableTokens] if the tokens were produced by
    /// different rankings, or with the child error if a composite component
    /// that could not be ranked takes part in the comparison.
    pub fn try_cmp(&self, other: &Token) -> Result<Ordering> {
        if self.scope != other.scope {
            return Err(Error::IncomparableTokens);
        }

        match (&self.value, &other.value) {
            (Value::Index { index: a, .. }, Value::Index { index: b, .. }) => Ok(a.cmp(b)),
            (Value::Binary(a), Value::Binary(b)) => Ok(a.cmp(b)),
            (Value::Composite(a), Value::Composite(b)) => {
                for (a, b) in a.iter().zip(b) {
                    let ord = match (a, b) {
                        (Slot::Ranked(a), Slot::Ranked(b)) => a.try_cmp(b)?,
                        (Slot::Deferred(e), _) | (_, Slot::Deferred(e)) => return Err(e.clone()),
                    };

                    if ord.is_ne() {
                        return Ok(ord);
                    }
                }

                Ok(Ordering::Equal)
            }
            _ => Err(Error::IncomparableTokens),
        }
    }

    /// Returns the next sequential token in the ranking, or nothing past the
    /// highest token.
    ///
    /// The next token does not map back to a specific card since many cards
    /// may share it. Composite tokens have no successor.
    pub fn succ(&self) -> Option<Token> {
        let value = match self.value {
            Value::Index { index, max } if index < max => Value::Index {
                index: index + 1,
                max,
            },
            Value::Binary(false) => Value::Binary(true),
            _ => return None,
        };

        Some(Token {
            scope: self.scope,
            value,
        })
    }
}
