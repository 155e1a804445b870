// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Card evaluation.
//!
//! This crate orders cards with composable [Ranking] schemes and builds two
//! evaluators on top of them: a poker hand classifier and a Five Hundred
//! trick resolver.
//!
//! ```
//! # use cardgame_eval::*;
//! let straight = poker::classify(&parse_cards("2S 3H 4D 5C 6D").unwrap()).unwrap();
//! let pair = poker::classify(&parse_cards("AS AH 4D 5C 6D").unwrap()).unwrap();
//! assert!(straight > pair);
//!
//! let trick = Trick::new(parse_cards("10D 5S AC KD").unwrap(), Suit::Spades);
//! assert_eq!(winning_card(&trick).unwrap(), "5S".parse().unwrap());
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod error;
pub use error::{Error, Result};

pub mod poker;
pub use poker::{Classification, PatternKind, classify};

mod ranking;
pub use ranking::{Ranking, Token};

mod trick;
pub use trick::{TrickResolver, five_hundred_ranks, winning_card};

// Reexport cards types.
pub use cardgame_cards::{Card, Color, Deck, Rank, Suit, Trick, parse_cards};
