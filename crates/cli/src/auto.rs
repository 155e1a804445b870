// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Automatic players.
use anyhow::{Result, bail};
use log::{debug, info};

use cardgame_core::{
    Game, Phase, Player,
    five_hundred::{self, Bid},
    poker::{self, Chips},
};
use cardgame_eval::{Card, PatternKind, Suit, TrickResolver};

/// A strategy that picks the action of the player holding priority.
pub trait Strategy {
    /// The game phases this strategy plays.
    type Phase: Phase;

    /// Returns the action to apply in the current phase.
    fn execute(
        &mut self,
        phase: Self::Phase,
        state: &<Self::Phase as Phase>::State,
    ) -> Result<<Self::Phase as Phase>::Action>;

    /// Returns true if no more actions are expected.
    fn is_over(&self, phase: Self::Phase) -> bool;

    /// The dealer of the current round.
    fn dealer(&self, state: &<Self::Phase as Phase>::State) -> Option<Player>;
}

/// Plays a game with a strategy until it completes or `max_rounds` are dealt.
///
/// Returns the number of rounds played.
pub fn run<S: Strategy>(
    game: &mut Game<S::Phase>,
    strategy: &mut S,
    max_rounds: usize,
) -> Result<usize> {
    let mut rounds = 1;
    let mut dealer = strategy.dealer(game.state());

    while !strategy.is_over(game.phase()) {
        let action = strategy.execute(game.phase(), game.state())?;
        debug!("Apply {action:?} in {:?}", game.phase());
        game.apply(&action)?;

        let next = strategy.dealer(game.state());
        if next != dealer {
            dealer = next;
            rounds += 1;
            if rounds > max_rounds {
                info!("Stopping after {max_rounds} rounds");
                return Ok(max_rounds);
            }
        }
    }

    Ok(rounds)
}

/// Five Hundred strategy.
///
/// The first bidder bids six in its longest suit and everybody else passes.
/// The winning bidder discards its lowest cards and players always play the
/// highest card of the led suit, or their lowest card if they cannot follow.
#[derive(Debug, Default)]
pub struct FiveHundredBot {
    resolver: TrickResolver,
}

impl FiveHundredBot {
    fn longest_suit(hand: &[Card]) -> Suit {
        Suit::suits()
            .max_by_key(|suit| hand.iter().filter(|c| c.suit() == *suit).count())
            .unwrap_or(Suit::None)
    }
}

impl Strategy for FiveHundredBot {
    type Phase = five_hundred::Phase;

    fn execute(
        &mut self,
        phase: five_hundred::Phase,
        state: &five_hundred::State,
    ) -> Result<five_hundred::Action> {
        let actor = state.priority()?;
        let hand = state.priority_hand()?;

        let action = match phase {
            five_hundred::Phase::Bidding if state.bid().is_err() => five_hundred::Action::Bid {
                actor,
                bid: Bid::new(6, Self::longest_suit(hand))?,
            },
            five_hundred::Phase::Bidding => five_hundred::Action::Pass { actor },
            five_hundred::Phase::Kitty => {
                let trump = state.bid()?.suit();
                let sorted = self.resolver.ranking(trump, trump)?.sort(hand)?;
                let cards = sorted
                    .into_iter()
                    .take(state.rules().kitty_size())
                    .collect();
                five_hundred::Action::Kitty { actor, cards }
            }
            five_hundred::Phase::Playing => {
                let trick = state.trick()?;
                let card = match trick.led() {
                    Some(led) => {
                        let ranking = self.resolver.ranking(trick.trump(), led)?;
                        let follow = hand
                            .iter()
                            .copied()
                            .filter(|c| c.suit() == led)
                            .collect::<Vec<_>>();
                        match ranking.highest(&follow)? {
                            Some(card) => Some(card),
                            None => ranking.sort(hand)?.first().copied(),
                        }
                    }
                    None => {
                        let ranking = self.resolver.ranking(trick.trump(), trick.trump())?;
                        ranking.highest(hand)?
                    }
                };

                match card {
                    Some(card) => five_hundred::Action::Play { actor, card },
                    None => bail!("{actor} has no cards to play"),
                }
            }
            phase => bail!("no actions in phase {phase:?}"),
        };

        Ok(action)
    }

    fn is_over(&self, phase: five_hundred::Phase) -> bool {
        phase == five_hundred::Phase::Completed
    }

    fn dealer(&self, state: &five_hundred::State) -> Option<Player> {
        state.dealer().ok()
    }
}

/// Hold'em strategy that always calls and raises once with a pair or better.
#[derive(Debug)]
pub struct HoldemBot {
    raise: Chips,
}

impl Default for HoldemBot {
    fn default() -> Self {
        Self {
            raise: Chips::new(10),
        }
    }
}

impl HoldemBot {
    fn has_pair(state: &poker::State, player: Player) -> Result<bool> {
        if state.board().len() >= 3 {
            return Ok(state.best_hand(player)?.kind() >= PatternKind::OnePair);
        }

        let hand = state.hand(player)?;
        Ok(hand.windows(2).any(|w| w[0].rank() == w[1].rank()))
    }
}

impl Strategy for HoldemBot {
    type Phase = poker::Phase;

    fn execute(&mut self, phase: poker::Phase, state: &poker::State) -> Result<poker::Action> {
        if phase != poker::Phase::Betting {
            bail!("no actions in phase {phase:?}");
        }

        let actor = state.priority()?;
        let owed = state.owed(actor);
        let affordable = state.chips(actor) > owed + self.raise;

        if owed == Chips::ZERO && affordable && Self::has_pair(state, actor)? {
            Ok(poker::Action::Raise {
                actor,
                chips: self.raise,
            })
        } else {
            Ok(poker::Action::Call { actor })
        }
    }

    fn is_over(&self, phase: poker::Phase) -> bool {
        phase == poker::Phase::Completed
    }

    fn dealer(&self, state: &poker::State) -> Option<Player> {
        state.dealer().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_hundred_completes() {
        let rules = five_hundred::Rules::new(4).unwrap().with_winning_score(100);
        let mut game = five_hundred::play(rules, 7).unwrap();
        let rounds = run(&mut game, &mut FiveHundredBot::default(), 100).unwrap();

        assert!(rounds > 0);
        assert_eq!(game.phase(), five_hundred::Phase::Completed);
        assert!(game.state().scores().values().any(|s| s.abs() >= 100));
    }

    #[test]
    fn five_hundred_round_limit() {
        let mut game = five_hundred::play(five_hundred::Rules::default(), 3).unwrap();
        let rounds = run(&mut game, &mut FiveHundredBot::default(), 1).unwrap();
        assert_eq!(rounds, 1);
        assert_ne!(game.phase(), five_hundred::Phase::Completed);
    }

    #[test]
    fn holdem_plays_rounds() {
        let rules = poker::Rules::new(3, Chips::new(50)).unwrap();
        let mut game = poker::texas_holdem(rules, 11).unwrap();
        run(&mut game, &mut HoldemBot::default(), 20).unwrap();

        // Chips are only moved between players.
        let total = game
            .state()
            .players()
            .iter()
            .fold(Chips::ZERO, |acc, p| acc + game.state().chips(*p));
        assert_eq!(total + game.state().pot(), Chips::new(150));
    }
}
