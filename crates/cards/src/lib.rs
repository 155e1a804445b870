// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Card value types.
//!
//! This crate defines plain immutable card values, with equality, hashing and
//! a shorthand string syntax:
//!
//! ```
//! # use cardgame_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! assert_eq!(ah, "AH".parse().unwrap());
//! assert_eq!(ah.to_string(), "AH");
//!
//! let tc: Card = "10C".parse().unwrap();
//! assert_eq!(tc.rank(), Rank::Numbered(10));
//!
//! let joker: Card = "Jk".parse().unwrap();
//! assert_eq!(joker.suit(), Suit::None);
//! ```
//!
//! Cards are not ordered, games use the rankings defined in `cardgame-eval`.
//!
//! A [Deck] type shuffles, deals and iterates k-cards hands:
//!
//! ```
//! # use cardgame_cards::Deck;
//! let mut count = 0;
//! Deck::default().for_each(2, |hand| {
//!     assert_eq!(hand.len(), 2);
//!     count += 1;
//! });
//! assert_eq!(count, 1_326);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod card;
pub use card::{parse_cards, Card, Color, ParseCardError, Rank, Suit};

mod deck;
pub use deck::{for_each_combination, Deck};

mod trick;
pub use trick::Trick;
