// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Poker hand patterns.
//!
//! [classify] returns the highest pattern present in a hand, standard poker
//! rules are used and suits only matter for flushes. Classified hands are
//! totally ordered:
//!
//! ```
//! # use cardgame_eval::{parse_cards, poker::{classify, PatternKind}};
//! let flush = classify(&parse_cards("2S 7S 4S 5S KS").unwrap()).unwrap();
//! let straight = classify(&parse_cards("2S 3H 4D 5C 6D").unwrap()).unwrap();
//! assert_eq!(flush.kind(), PatternKind::Flush);
//! assert!(flush > straight);
//! ```
use ahash::AHashMap;
use std::{cmp::Ordering, fmt};

use cardgame_cards::{Card, Deck, Rank, for_each_combination};

use crate::{Error, Ranking, Result, Token};

/// The kinds of poker patterns, from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternKind {
    /// No other pattern.
    HighCard,
    /// Two cards of the same rank.
    OnePair,
    /// Two pairs.
    TwoPair,
    /// Three cards of the same rank.
    ThreeOfAKind,
    /// Five cards of sequential rank.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three of a kind and a pair.
    FullHouse,
    /// Four cards of the same rank.
    FourOfAKind,
    /// A straight of the same suit, royal if ace high.
    StraightFlush,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            PatternKind::HighCard => "high card",
            PatternKind::OnePair => "one pair",
            PatternKind::TwoPair => "two pair",
            PatternKind::ThreeOfAKind => "three of a kind",
            PatternKind::Straight => "straight",
            PatternKind::Flush => "flush",
            PatternKind::FullHouse => "full house",
            PatternKind::FourOfAKind => "four of a kind",
            PatternKind::StraightFlush => "straight flush",
        };

        write!(f, "{kind}")
    }
}

/// Position of a rank in the ace-high ranking.
fn ace_high(rank: Rank) -> Result<usize> {
    Ranking::ace_high().position(rank)
}

/// Ace-high values of the cards, highest first.
fn high_cards_key(cards: &[Card]) -> Result<Vec<usize>> {
    let mut key = cards
        .iter()
        .map(|c| ace_high(c.rank()))
        .collect::<Result<Vec<_>>>()?;
    key.sort_unstable_by(|a, b| b.cmp(a));
    Ok(key)
}

/// Cards compared by their ace-high ranks, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighCard {
    key: Vec<usize>,
}

impl HighCard {
    fn new(cards: &[Card]) -> Result<Self> {
        Ok(Self {
            key: high_cards_key(cards)?,
        })
    }
}

/// `n` cards of the same rank and the remaining cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfAKind {
    rank: Rank,
    n: usize,
    remainder: Vec<Card>,
    key: Vec<usize>,
}

impl OfAKind {
    /// Finds the best ranked group of exactly `n` cards of the same rank.
    fn find(hand: &[Card], n: usize) -> Result<Option<OfAKind>> {
        if n < 2 {
            return Ok(None);
        }

        let mut groups = AHashMap::<Rank, usize>::new();
        for card in hand {
            *groups.entry(card.rank()).or_default() += 1;
        }

        let mut top: Option<(usize, Rank)> = None;
        for (&rank, &count) in &groups {
            if count != n {
                continue;
            }

            let value = ace_high(rank)?;
            if top.is_none_or(|(best, _)| value > best) {
                top = Some((value, rank));
            }
        }

        let Some((value, rank)) = top else {
            return Ok(None);
        };

        let remainder = hand
            .iter()
            .copied()
            .filter(|c| c.rank() != rank)
            .collect::<Vec<_>>();

        let key = [n, value]
            .into_iter()
            .chain(high_cards_key(&remainder)?)
            .collect();

        Ok(Some(OfAKind {
            rank,
            n,
            remainder,
            key,
        }))
    }

    /// The rank of the matched cards.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// The number of matched cards.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The unmatched cards.
    pub fn remainder(&self) -> &[Card] {
        &self.remainder
    }
}

/// Two pairs, the highest first, and the remaining cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoPair {
    first: Rank,
    second: Rank,
    key: Vec<usize>,
}

impl TwoPair {
    fn find(hand: &[Card]) -> Result<Option<TwoPair>> {
        let Some(first) = OfAKind::find(hand, 2)? else {
            return Ok(None);
        };

        let Some(second) = OfAKind::find(&first.remainder, 2)? else {
            return Ok(None);
        };

        let key = [ace_high(first.rank)?, ace_high(second.rank)?]
            .into_iter()
            .chain(high_cards_key(&second.remainder)?)
            .collect();

        Ok(Some(TwoPair {
            first: first.rank,
            second: second.rank,
            key,
        }))
    }

    /// The rank of the highest pair.
    pub fn first(&self) -> Rank {
        self.first
    }

    /// The rank of the lowest pair.
    pub fn second(&self) -> Rank {
        self.second
    }
}

/// Five cards of sequential rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Straight {
    high: Rank,
    key: Vec<usize>,
}

impl Straight {
    /// Finds the highest run of five or more sequential ranks, with aces
    /// high or low. The straight high card is the top of the run, always
    /// valued ace-high.
    fn find(hand: &[Card]) -> Result<Option<Straight>> {
        for ranking in [Ranking::ace_high(), Ranking::ace_low()] {
            let mut high = None;
            let mut run = 0;
            let mut prev: Option<Token> = None;

            for card in ranking.sort(hand)? {
                let token = ranking.token(&card)?;
                let next = match &prev {
                    // Same rank, the run neither grows nor breaks.
                    Some(p) if p.try_cmp(&token)?.is_eq() => continue,
                    Some(p) => p
                        .succ()
                        .map(|succ| succ.try_cmp(&token))
                        .transpose()?
                        .is_some_and(|ord| ord.is_eq()),
                    None => false,
                };

                run = if next { run + 1 } else { 1 };
                if run >= 5 {
                    high = Some(card.rank());
                }

                prev = Some(token);
            }

            if let Some(high) = high {
                return Ok(Some(Straight {
                    high,
                    key: vec![ace_high(high)?],
                }));
            }
        }

        Ok(None)
    }

    /// The straight high card rank.
    pub fn high(&self) -> Rank {
        self.high
    }
}

fn is_flush(hand: &[Card]) -> bool {
    hand.len() == 5 && hand.iter().all(|c| c.suit() == hand[0].suit())
}

/// A classified pattern with its tie-break key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// High card pattern.
    HighCard(HighCard),
    /// Pair, three or four of a kind.
    OfAKind(OfAKind),
    /// Two pair pattern.
    TwoPair(TwoPair),
    /// Straight pattern.
    Straight(Straight),
    /// Flush pattern, compared by high cards.
    Flush(HighCard),
    /// Full house pattern, compared by its three of a kind.
    FullHouse(OfAKind),
    /// Straight flush pattern.
    StraightFlush(Straight),
}

impl Pattern {
    /// The kind of this pattern.
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::HighCard(_) => PatternKind::HighCard,
            Pattern::OfAKind(p) => match p.n {
                2 => PatternKind::OnePair,
                3 => PatternKind::ThreeOfAKind,
                _ => PatternKind::FourOfAKind,
            },
            Pattern::TwoPair(_) => PatternKind::TwoPair,
            Pattern::Straight(_) => PatternKind::Straight,
            Pattern::Flush(_) => PatternKind::Flush,
            Pattern::FullHouse(_) => PatternKind::FullHouse,
            Pattern::StraightFlush(_) => PatternKind::StraightFlush,
        }
    }

    fn key(&self) -> &[usize] {
        match self {
            Pattern::HighCard(p) | Pattern::Flush(p) => &p.key,
            Pattern::OfAKind(p) | Pattern::FullHouse(p) => &p.key,
            Pattern::TwoPair(p) => &p.key,
            Pattern::Straight(p) | Pattern::StraightFlush(p) => &p.key,
        }
    }

    /// Compares two patterns of the same kind.
    ///
    /// Tie-break keys of different kinds are meaningless to each other,
    /// comparing them fails with [Error::IncomparablePatterns].
    pub fn try_cmp(&self, other: &Pattern) -> Result<Ordering> {
        let (k1, k2) = (self.kind(), other.kind());
        if k1 != k2 {
            return Err(Error::IncomparablePatterns(k1, k2));
        }

        Ok(self.key().cmp(other.key()))
    }
}

/// The matching rule of a [Matcher].
#[derive(Debug, Clone, Copy)]
enum Rule {
    HighCard,
    OfAKind(usize),
    TwoPair,
    Straight,
    Flush,
    FullHouse,
    StraightFlush,
}

impl Rule {
    fn apply(&self, hand: &[Card]) -> Result<Option<Pattern>> {
        let pattern = match self {
            Rule::HighCard => Some(Pattern::HighCard(HighCard::new(hand)?)),
            Rule::OfAKind(n) => OfAKind::find(hand, *n)?.map(Pattern::OfAKind),
            Rule::TwoPair => TwoPair::find(hand)?.map(Pattern::TwoPair),
            Rule::Straight => Straight::find(hand)?.map(Pattern::Straight),
            Rule::Flush if is_flush(hand) => Some(Pattern::Flush(HighCard::new(hand)?)),
            Rule::Flush => None,
            Rule::FullHouse => match OfAKind::find(hand, 3)? {
                Some(three) if OfAKind::find(&three.remainder, 2)?.is_some() => {
                    Some(Pattern::FullHouse(three))
                }
                _ => None,
            },
            Rule::StraightFlush if is_flush(hand) => {
                Straight::find(hand)?.map(Pattern::StraightFlush)
            }
            Rule::StraightFlush => None,
        };

        Ok(pattern)
    }
}

/// A pattern rule tagged with the rank of its kind.
#[derive(Debug, Clone, Copy)]
struct Matcher {
    kind: PatternKind,
    rule: Rule,
}

impl Matcher {
    const fn new(kind: PatternKind, rule: Rule) -> Self {
        Self { kind, rule }
    }

    fn apply(&self, hand: &[Card]) -> Result<Option<Classification>> {
        Ok(self.rule.apply(hand)?.map(|pattern| Classification {
            rank: self.kind as u8,
            pattern,
            cards: hand.to_vec(),
        }))
    }
}

/// Matchers from the lowest to the highest pattern.
const MATCHERS: [Matcher; 9] = [
    Matcher::new(PatternKind::HighCard, Rule::HighCard),
    Matcher::new(PatternKind::OnePair, Rule::OfAKind(2)),
    Matcher::new(PatternKind::TwoPair, Rule::TwoPair),
    Matcher::new(PatternKind::ThreeOfAKind, Rule::OfAKind(3)),
    Matcher::new(PatternKind::Straight, Rule::Straight),
    Matcher::new(PatternKind::Flush, Rule::Flush),
    Matcher::new(PatternKind::FullHouse, Rule::FullHouse),
    Matcher::new(PatternKind::FourOfAKind, Rule::OfAKind(4)),
    Matcher::new(PatternKind::StraightFlush, Rule::StraightFlush),
];

/// A classified hand: the pattern found and the rank of its matcher.
///
/// Hands are ordered by the matcher rank first, then by the pattern
/// tie-break key.
#[derive(Debug, Clone)]
pub struct Classification {
    rank: u8,
    pattern: Pattern,
    cards: Vec<Card>,
}

impl Classification {
    /// The matcher rank, 0 for high card up to 8 for straight flush.
    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// The pattern kind.
    pub fn kind(&self) -> PatternKind {
        self.pattern.kind()
    }

    /// The classified pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The classified cards.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl PartialEq for Classification {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Classification {}

impl PartialOrd for Classification {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Classification {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal ranks come from the same matcher so keys are comparable.
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.pattern.key().cmp(other.pattern.key()))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        for card in &self.cards {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}

/// A standard 52 cards poker deck, no Joker.
pub fn deck() -> Deck {
    Deck::default()
}

/// Returns the highest pattern describing the hand.
///
/// Never returns nothing, hands with nothing interesting are classified as
/// high card. The usual hand length is five cards, though not required:
/// longer hands are matched as a whole, flushes need exactly five cards and
/// straights take the top of the highest run. Use [best_hand] to pick the
/// best five cards of a longer hand.
/// Fails if a card rank cannot be ordered ace-high, e.g. a Joker.
pub fn classify(hand: &[Card]) -> Result<Classification> {
    MATCHERS
        .iter()
        .rev()
        .find_map(|matcher| matcher.apply(hand).transpose())
        .unwrap_or_else(|| {
            Err(Error::InvalidArgument(format!(
                "no pattern matches {hand:?}"
            )))
        })
}

/// Returns the best classified `size` cards hand out of `cards`.
///
/// Hands with at most `size` cards are classified as they are.
pub fn best_hand(cards: &[Card], size: usize) -> Result<Classification> {
    if cards.len() <= size {
        return classify(cards);
    }

    let mut best: Option<Classification> = None;
    let mut error = None;

    for_each_combination(cards, size, &mut |hand| {
        if error.is_some() {
            return;
        }

        match classify(hand) {
            Ok(c) if best.as_ref().is_none_or(|b| c > *b) => best = Some(c),
            Ok(_) => {}
            Err(e) => error = Some(e),
        }
    });

    match (error, best) {
        (Some(e), _) => Err(e),
        (None, Some(best)) => Ok(best),
        (None, None) => Err(Error::InvalidArgument(format!(
            "cannot choose {size} cards out of {}",
            cards.len()
        ))),
    }
}
