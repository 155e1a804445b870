// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em betting game.
//!
//! Players are dealt two hole cards and bet in turn, community cards are
//! dealt three then one at a time between betting rounds. A betting round
//! ends when priority returns to the last player who raised, or to the first
//! player who called. The best five cards hand out of hole and community
//! cards wins the pot. The game ends when a single player has chips left.
use log::info;
use serde::{Deserialize, Serialize};
use std::{fmt, ops};

use crate::game::{self, Game, Player, Result, StateError};

mod state;
pub use state::State;

/// Chips amount.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Chips(u32);

impl Chips {
    /// The zero chips.
    pub const ZERO: Chips = Chips(0);

    /// Creates chips with the given value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The integer amount.
    pub fn amount(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Chips {
    fn from(val: u32) -> Self {
        Chips(val)
    }
}

impl ops::Add for Chips {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Chips(self.0.saturating_add(rhs.0))
    }
}

impl ops::AddAssign for Chips {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl ops::Sub for Chips {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl ops::SubAssign for Chips {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl ops::Div<u32> for Chips {
    type Output = Self;

    fn div(self, rhs: u32) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl ops::Rem<u32> for Chips {
    type Output = Self;

    fn rem(self, rhs: u32) -> Self::Output {
        Self(self.0 % rhs)
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0;
        if amount >= 1_000_000 {
            write!(
                f,
                "{},{:03},{:03}",
                amount / 1_000_000,
                amount % 1_000_000 / 1_000,
                amount % 1000
            )
        } else if amount >= 1_000 {
            write!(f, "{},{:03}", amount / 1000, amount % 1000)
        } else {
            write!(f, "{amount}")
        }
    }
}

/// Hold'em rules configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    players: usize,
    buy_in: Chips,
}

impl Rules {
    /// Maximum number of players at a table.
    pub const MAX_PLAYERS: usize = 10;

    /// Creates rules for 2 to 10 players.
    pub fn new(players: usize, buy_in: Chips) -> Result<Rules> {
        if !(2..=Self::MAX_PLAYERS).contains(&players) {
            return Err(StateError::illegal(format!(
                "only 2 to {} players are supported, not {players}",
                Self::MAX_PLAYERS
            )));
        }

        if buy_in == Chips::ZERO {
            return Err(StateError::illegal("buy in must be more than zero chips"));
        }

        Ok(Rules { players, buy_in })
    }

    /// Number of players.
    pub fn players(&self) -> usize {
        self.players
    }

    /// Chips each player starts with.
    pub fn buy_in(&self) -> Chips {
        self.buy_in
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            players: 2,
            buy_in: Chips::new(100),
        }
    }
}

/// A player betting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leaves the hand.
    Fold {
        /// The folding player.
        actor: Player,
    },
    /// Matches the highest bet.
    Call {
        /// The calling player.
        actor: Player,
    },
    /// Matches the highest bet and raises it.
    Raise {
        /// The raising player.
        actor: Player,
        /// Chips over the highest bet.
        chips: Chips,
    },
}

impl Action {
    /// The acting player.
    pub fn actor(&self) -> Player {
        match self {
            Action::Fold { actor } | Action::Call { actor } | Action::Raise { actor, .. } => {
                *actor
            }
        }
    }
}

/// Hold'em phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Picks the first dealer.
    Setup,
    /// Shuffles and deals hole cards.
    NewRound,
    /// Players fold, call or raise in turn.
    Betting,
    /// Deals the flop, turn or river.
    CommunityCard,
    /// Pays the pot to the best hands.
    DecideRound,
    /// Pays the pot to the only player who did not fold.
    EndRound,
    /// A single player has chips left.
    Completed,
}

impl game::Phase for Phase {
    type State = State;
    type Action = Action;

    fn enter(&self, state: State) -> Result<State> {
        match self {
            Phase::Setup => {
                let dealer = state
                    .players()
                    .first()
                    .copied()
                    .ok_or(StateError::Missing("players"))?;
                Ok(state.give_deal(dealer))
            }
            Phase::NewRound => {
                let state = state.clear_table().shuffle_deck().deal_hand_cards(2)?;
                info!("Round dealt by {}", state.dealer()?);
                Ok(state.give_priority(state.left_of_dealer()?))
            }
            Phase::Betting => Ok(state.clear_last_raiser()),
            Phase::CommunityCard => {
                let n = if state.board().is_empty() { 3 } else { 1 };
                let state = state.deal_community_cards(n)?;
                Ok(state.give_priority(state.left_of_dealer()?))
            }
            Phase::DecideRound => {
                let winners = state.showdown_winners()?;
                for winner in &winners {
                    info!("{winner} wins with {}", state.best_hand(*winner)?);
                }
                state.give_pot_to(&winners)
            }
            Phase::EndRound => {
                let winner = state
                    .active()
                    .first()
                    .copied()
                    .ok_or_else(|| StateError::illegal("no active players"))?;
                info!("{winner} wins {} chips uncontested", state.pot());
                state.give_pot_to(&[winner])
            }
            Phase::Completed => {
                if let Some(winner) = state.seated().first() {
                    info!("Game completed {winner} won {} chips", state.chips(*winner));
                }
                Ok(state)
            }
        }
    }

    fn exit(&self, state: State) -> Result<State> {
        match self {
            Phase::DecideRound | Phase::EndRound => state.advance_dealer(),
            _ => Ok(state),
        }
    }

    fn apply(&self, state: &State, action: &Action) -> Result<State> {
        if *self != Phase::Betting {
            return Err(StateError::illegal(format!(
                "phase {self:?} does not accept {action:?}"
            )));
        }

        let actor = action.actor();
        let priority = state.priority()?;
        if actor != priority {
            return Err(StateError::illegal(format!(
                "{actor} cannot go, waiting for {priority}"
            )));
        }

        match action {
            Action::Fold { .. } => state.fold(actor),
            Action::Call { .. } => state.call_bet(actor),
            Action::Raise { chips, .. } => state.raise_bet(actor, *chips),
        }
    }

    fn transition(&self, state: &State) -> Result<Option<Phase>> {
        let next = match self {
            Phase::Setup => Some(Phase::NewRound),
            Phase::NewRound | Phase::CommunityCard => Some(Phase::Betting),
            Phase::Betting if state.active().len() == 1 => Some(Phase::EndRound),
            Phase::Betting if state.last_raiser() == Some(state.priority()?) => {
                if state.board().len() < 5 {
                    Some(Phase::CommunityCard)
                } else {
                    Some(Phase::DecideRound)
                }
            }
            Phase::DecideRound | Phase::EndRound if state.seated().len() > 1 => {
                Some(Phase::NewRound)
            }
            Phase::DecideRound | Phase::EndRound => Some(Phase::Completed),
            _ => None,
        };

        Ok(next)
    }
}

/// Starts a Texas Hold'em game, decks are shuffled from `seed`.
pub fn texas_holdem(rules: Rules, seed: u64) -> Result<Game<Phase>> {
    Game::new(Phase::Setup, State::initial(rules, seed))
}
