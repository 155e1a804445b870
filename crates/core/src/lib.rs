// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Phase based card games.
//!
//! The [game] module defines a generic engine that threads an immutable
//! state through the phases of a game. Two games are built on it:
//! [five_hundred] and Texas Hold'em [poker].
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod five_hundred;
pub mod game;
pub use game::{Game, Phase, Player, StateError};
pub mod poker;
