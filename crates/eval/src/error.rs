// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Ranking and evaluation errors.
use thiserror::Error;

use cardgame_cards::Rank;

use crate::poker::PatternKind;

/// Errors raised when ranking cards or comparing their tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A card rank is outside the ranks known by a ranking.
    #[error("cannot order {rank}, known ranks: {known}")]
    RankNotSupported {
        /// The unsupported rank.
        rank: Rank,
        /// The ranks known by the ranking.
        known: String,
    },
    /// Tokens produced by different rankings were compared.
    #[error("cannot compare tokens from different orderings")]
    IncomparableTokens,
    /// Patterns of different kinds were compared without their rank.
    #[error("cannot compare {0} to {1}")]
    IncomparablePatterns(PatternKind, PatternKind),
    /// A trick without cards has no winner.
    #[error("trick must contain at least one card")]
    EmptyTrick,
    /// A structurally invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Ranking and evaluation result.
pub type Result<T> = std::result::Result<T, Error>;
