// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Five Hundred.
//!
//! A trick taking game for 3 to 6 players played with a reduced deck and a
//! Joker. Players bid the number of tricks they expect to win and the trump
//! suit, the highest bidder exchanges cards with the kitty and leads the
//! first trick. Rounds are scored with the Avondale table and the game ends
//! when a team reaches 500 points, or loses 500.
//!
//! ```
//! # use cardgame_core::five_hundred::{self, Phase, Rules};
//! let game = five_hundred::play(Rules::default(), 42).unwrap();
//! assert_eq!(game.phase(), Phase::Bidding);
//! assert_eq!(game.state().priority_hand().unwrap().len(), 10);
//! ```
use log::info;
use std::{fmt, ops::RangeInclusive};

use cardgame_eval::{Card, Color, Deck, Rank, Suit, five_hundred_ranks};

use crate::game::{self, Game, Player, Result, StateError};

mod state;
pub use state::State;

/// Numbered ranks in a Five Hundred deck for each suit color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSpec {
    red: RangeInclusive<u8>,
    black: RangeInclusive<u8>,
}

impl DeckSpec {
    const FOUR_PLAYERS: DeckSpec = DeckSpec {
        red: 4..=10,
        black: 5..=10,
    };

    /// The deck for a number of players, 3 to 6.
    pub fn for_players(players: usize) -> Option<DeckSpec> {
        let (red, black) = match players {
            3 => (7..=10, 7..=10),
            4 => return Some(Self::FOUR_PLAYERS),
            5 => (2..=10, 2..=10),
            6 => (2..=13, 2..=12),
            _ => return None,
        };

        Some(DeckSpec { red, black })
    }

    /// Checks if a suited card belongs to the deck.
    ///
    /// All faces and aces are included, the Joker is added separately.
    pub fn contains(&self, card: &Card) -> bool {
        let numbers = match card.suit().color() {
            Color::Red => &self.red,
            Color::Black => &self.black,
            Color::None => return false,
        };

        match card.rank() {
            Rank::Numbered(n) => numbers.contains(&n),
            Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => true,
            Rank::Joker => false,
        }
    }
}

/// Five Hundred rules configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    players: usize,
    hand_size: usize,
    kitty_size: usize,
    winning_score: i32,
    deck: DeckSpec,
}

impl Rules {
    /// Cards dealt to each player.
    pub const HAND_SIZE: usize = 10;
    /// Cards dealt to the kitty.
    pub const KITTY_SIZE: usize = 3;
    /// Score that ends the game, either positive or negative.
    pub const WINNING_SCORE: i32 = 500;

    /// Creates the rules for a number of players.
    pub fn new(players: usize) -> Result<Rules> {
        let deck = DeckSpec::for_players(players).ok_or_else(|| {
            StateError::illegal(format!(
                "only 3 to 6 players are supported, not {players}"
            ))
        })?;

        Ok(Rules {
            players,
            hand_size: Self::HAND_SIZE,
            kitty_size: Self::KITTY_SIZE,
            winning_score: Self::WINNING_SCORE,
            deck,
        })
    }

    /// Sets the score that ends the game.
    pub fn with_winning_score(self, winning_score: i32) -> Self {
        Self {
            winning_score,
            ..self
        }
    }

    /// Number of players.
    pub fn players(&self) -> usize {
        self.players
    }

    /// Cards dealt to each player.
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    /// Cards dealt to the kitty.
    pub fn kitty_size(&self) -> usize {
        self.kitty_size
    }

    /// Score that ends the game.
    pub fn winning_score(&self) -> i32 {
        self.winning_score
    }

    /// The deck specification.
    pub fn deck(&self) -> &DeckSpec {
        &self.deck
    }
}

impl Default for Rules {
    /// Four players rules.
    fn default() -> Self {
        Rules {
            players: 4,
            hand_size: Self::HAND_SIZE,
            kitty_size: Self::KITTY_SIZE,
            winning_score: Self::WINNING_SCORE,
            deck: DeckSpec::FOUR_PLAYERS,
        }
    }
}

/// Creates the deck for the rules, one Joker included.
pub fn deck(rules: &Rules) -> Deck {
    let spec = rules.deck();
    let suited = five_hundred_ranks()
        .flat_map(|rank| Suit::suits().map(move |suit| Card::new(rank, suit)))
        .filter(|card| spec.contains(card));

    Deck::new([Card::joker()].into_iter().chain(suited).collect())
}

/// A bid for a number of tricks with a trump suit, [Suit::None] for no
/// trumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bid {
    tricks: u8,
    suit: Suit,
}

impl Bid {
    /// Tricks range for bids.
    pub const TRICKS: RangeInclusive<u8> = 6..=10;

    /// Creates a bid, fails if the tricks are outside [Bid::TRICKS].
    pub fn new(tricks: u8, suit: Suit) -> Result<Bid> {
        if !Self::TRICKS.contains(&tricks) {
            return Err(StateError::illegal(format!(
                "cannot bid {tricks} tricks, bids must be 6 to 10 tricks"
            )));
        }

        Ok(Bid { tricks, suit })
    }

    /// Number of tricks.
    pub fn tricks(&self) -> u8 {
        self.tricks
    }

    /// The trump suit.
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// The Avondale value of the bid.
    pub fn value(&self) -> i32 {
        let base = match self.suit {
            Suit::Spades => 40,
            Suit::Clubs => 60,
            Suit::Diamonds => 80,
            Suit::Hearts => 100,
            Suit::None => 120,
        };

        base + 100 * (i32::from(self.tricks) - 6)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Suit::None => write!(f, "{}NT", self.tricks),
            suit => write!(f, "{}{}", self.tricks, suit),
        }
    }
}

/// A player action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Bids to win tricks.
    Bid {
        /// The bidding player.
        actor: Player,
        /// The bid.
        bid: Bid,
    },
    /// Passes the bid.
    Pass {
        /// The passing player.
        actor: Player,
    },
    /// Returns cards to the kitty.
    Kitty {
        /// The winning bidder.
        actor: Player,
        /// The discarded cards.
        cards: Vec<Card>,
    },
    /// Plays a card to the trick.
    Play {
        /// The playing player.
        actor: Player,
        /// The card played.
        card: Card,
    },
}

impl Action {
    /// The acting player.
    pub fn actor(&self) -> Player {
        match self {
            Action::Bid { actor, .. }
            | Action::Pass { actor }
            | Action::Kitty { actor, .. }
            | Action::Play { actor, .. } => *actor,
        }
    }
}

/// Five Hundred phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Picks the first dealer.
    Setup,
    /// Deals a new round.
    NewRound,
    /// Players bid or pass in turn.
    Bidding,
    /// The winning bidder exchanges cards with the kitty.
    Kitty,
    /// Players play in turn to the current trick.
    Playing,
    /// The trick winner collects the trick and leads the next one.
    TrickWon,
    /// The round is scored.
    Scoring,
    /// A team reached the winning or losing score.
    Completed,
}

impl game::Phase for Phase {
    type State = State;
    type Action = Action;

    fn enter(&self, state: State) -> Result<State> {
        match self {
            Phase::Setup => {
                // The player after the dealer opens the bidding.
                let dealer = state.player_relative_to(Player::new(0), state.players().len() - 1);
                Ok(state.give_deal(dealer))
            }
            Phase::NewRound => {
                let dealer = state.dealer()?;
                let state = state.clear_bids().deal_shuffled()?;
                info!("Round dealt by {dealer}");
                Ok(state.give_priority(state.player_relative_to(dealer, 1)))
            }
            Phase::Kitty => {
                let bidder = state.bidder()?;
                info!("{bidder} won the bidding with {}", state.bid()?);
                state.give_priority(bidder).move_kitty_to_hand()
            }
            Phase::Playing => state.new_trick(),
            Phase::TrickWon => {
                let winner = state.trick_winner()?;
                info!("{winner} won trick {}", fmt_cards(state.trick()?.cards()));
                Ok(state.won_trick(winner).give_priority(winner))
            }
            Phase::Scoring => score_round(state),
            Phase::Completed => {
                for player in state.players() {
                    info!("Game completed {player} scored {}", state.score(*player));
                }
                Ok(state)
            }
            Phase::Bidding => Ok(state),
        }
    }

    fn exit(&self, state: State) -> Result<State> {
        match self {
            // Redeal by the next dealer if everyone passed.
            Phase::Bidding if state.all_passed() => state.advance_dealer(),
            Phase::Scoring => state.advance_dealer(),
            _ => Ok(state),
        }
    }

    fn apply(&self, state: &State, action: &Action) -> Result<State> {
        match (self, action) {
            (Phase::Bidding, Action::Bid { actor, bid }) => {
                check_priority(state, *actor)?;
                if let Ok(current) = state.bid() {
                    if bid.value() <= current.value() {
                        return Err(StateError::illegal(format!(
                            "bid {bid} must be higher than {current}"
                        )));
                    }
                }

                state.place_bid(*actor, *bid).advance_bidding()
            }
            (Phase::Bidding, Action::Pass { actor }) => {
                check_priority(state, *actor)?;
                state.pass(*actor).advance_bidding()
            }
            (Phase::Kitty, Action::Kitty { actor, cards }) => {
                check_priority(state, *actor)?;
                let kitty_size = state.rules().kitty_size();
                if cards.len() != kitty_size {
                    return Err(StateError::illegal(format!(
                        "kitty must have {kitty_size} cards, not {}",
                        cards.len()
                    )));
                }

                state.move_cards_to_kitty(cards)
            }
            (Phase::Playing, Action::Play { actor, card }) => {
                check_priority(state, *actor)?;
                state.add_card_to_trick(*card)?.advance()
            }
            _ => Err(StateError::illegal(format!(
                "phase {self:?} does not accept {action:?}"
            ))),
        }
    }

    fn transition(&self, state: &State) -> Result<Option<Phase>> {
        let next = match self {
            Phase::Setup => Some(Phase::NewRound),
            Phase::NewRound => Some(Phase::Bidding),
            Phase::Bidding if state.all_passed() => Some(Phase::NewRound),
            Phase::Bidding if state.bid().is_ok() && state.bidders_left() == 1 => {
                Some(Phase::Kitty)
            }
            Phase::Kitty if !state.kitty().is_empty() => Some(Phase::Playing),
            Phase::Playing if state.trick()?.len() == state.players().len() => {
                Some(Phase::TrickWon)
            }
            Phase::TrickWon if state.priority_hand()?.is_empty() => Some(Phase::Scoring),
            Phase::TrickWon => Some(Phase::Playing),
            Phase::Scoring => {
                let target = state.rules().winning_score();
                if state.scores().values().any(|s| s.abs() >= target) {
                    Some(Phase::Completed)
                } else {
                    Some(Phase::NewRound)
                }
            }
            _ => None,
        };

        Ok(next)
    }
}

fn check_priority(state: &State, actor: Player) -> Result<()> {
    let priority = state.priority()?;
    if actor != priority {
        return Err(StateError::illegal(format!(
            "{actor} cannot go, waiting for {priority}"
        )));
    }

    Ok(())
}

fn fmt_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scores the bidding team by its bid and defenders by their tricks.
fn score_round(state: State) -> Result<State> {
    let bid = state.bid()?;
    let bidders = state.team_for(state.bidder()?);
    let made = bidders.iter().map(|p| state.won(*p)).sum::<usize>();

    let points = if made >= usize::from(bid.tricks()) {
        bid.value()
    } else {
        -bid.value()
    };

    info!("Bid {bid} made {made} tricks scoring {points}");

    let mut state = state.adjust_score(&bidders, points);
    let mut scored = bidders;
    for player in state.players().to_vec() {
        if scored.contains(&player) {
            continue;
        }

        let team = state.team_for(player);
        let tricks = team.iter().map(|p| state.won(*p)).sum::<usize>();
        state = state.adjust_score(&team, 10 * tricks as i32);
        scored.extend(team);
    }

    Ok(state.clear_tricks())
}

/// Starts a Five Hundred game, deals are shuffled from `seed`.
pub fn play(rules: Rules, seed: u64) -> Result<Game<Phase>> {
    Game::new(Phase::Setup, State::initial(rules, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashSet;

    fn p(position: usize) -> Player {
        Player::new(position)
    }

    fn bid(actor: usize, tricks: u8, suit: Suit) -> Action {
        Action::Bid {
            actor: p(actor),
            bid: Bid::new(tricks, suit).unwrap(),
        }
    }

    fn pass(actor: usize) -> Action {
        Action::Pass { actor: p(actor) }
    }

    #[test]
    fn deck_sizes() {
        for (players, size) in [(3, 33), (4, 43), (5, 53), (6, 63)] {
            let deck = deck(&Rules::new(players).unwrap());
            assert_eq!(deck.count(), size);

            let jokers = deck.cards().iter().filter(|c| c.rank() == Rank::Joker);
            assert_eq!(jokers.count(), 1);

            let unique = deck.cards().iter().collect::<AHashSet<_>>();
            assert_eq!(unique.len(), size);
        }

        let four = deck(&Rules::default());
        assert!(four.cards().iter().all(|c| c.rank() != Rank::Numbered(2)));
        assert!(four.cards().contains(&"4H".parse().unwrap()));
        assert!(!four.cards().contains(&"4S".parse().unwrap()));

        let six = deck(&Rules::new(6).unwrap());
        let thirteens = six.cards().iter().filter(|c| c.rank() == Rank::Numbered(13));
        assert_eq!(thirteens.count(), 2);
    }

    #[test]
    fn rules_players() {
        assert!(Rules::new(2).is_err());
        assert!(Rules::new(7).is_err());
        assert_eq!(Rules::new(4).unwrap(), Rules::default());
        assert_eq!(Some(Rules::default().deck().clone()), DeckSpec::for_players(4));
    }

    #[test]
    fn bid_values() {
        assert_eq!(Bid::new(6, Suit::Spades).unwrap().value(), 40);
        assert_eq!(Bid::new(6, Suit::Clubs).unwrap().value(), 60);
        assert_eq!(Bid::new(6, Suit::Diamonds).unwrap().value(), 80);
        assert_eq!(Bid::new(6, Suit::Hearts).unwrap().value(), 100);
        assert_eq!(Bid::new(6, Suit::None).unwrap().value(), 120);
        assert_eq!(Bid::new(7, Suit::Hearts).unwrap().value(), 200);
        assert_eq!(Bid::new(10, Suit::None).unwrap().value(), 520);

        assert!(Bid::new(5, Suit::Hearts).is_err());
        assert!(Bid::new(11, Suit::Hearts).is_err());

        assert_eq!(Bid::new(8, Suit::None).unwrap().to_string(), "8NT");
        assert_eq!(Bid::new(7, Suit::Clubs).unwrap().to_string(), "7C");
    }

    /// A state after a round where each player won `tricks[position]`.
    fn played_round(players: usize, bidder: usize, bid: Bid, tricks: &[usize]) -> State {
        let rules = Rules::new(players).unwrap();
        let mut state = State::initial(rules, 0).place_bid(p(bidder), bid);
        for (position, won) in tricks.iter().enumerate() {
            for _ in 0..*won {
                state = state.won_trick(p(position));
            }
        }

        state
    }

    fn scores(state: &State) -> Vec<i32> {
        state.players().iter().map(|p| state.score(*p)).collect()
    }

    #[test]
    fn made_bid_scores_bid_value() {
        let bid = Bid::new(7, Suit::Hearts).unwrap();
        let state = score_round(played_round(4, 0, bid, &[4, 1, 3, 2])).unwrap();

        // Bidders 0 and 2 made 7 tricks, defenders 1 and 3 won 3.
        assert_eq!(scores(&state), [200, 30, 200, 30]);
        assert!(state.players().iter().all(|p| state.won(*p) == 0));
    }

    #[test]
    fn failed_bid_loses_bid_value() {
        let bid = Bid::new(7, Suit::Hearts).unwrap();
        let state = score_round(played_round(4, 1, bid, &[2, 3, 2, 3])).unwrap();

        // Bidders 1 and 3 made 6 tricks, defenders 0 and 2 won 4.
        assert_eq!(scores(&state), [40, -200, 40, -200]);
    }

    #[test]
    fn defenders_score_alone_with_odd_players() {
        let bid = Bid::new(6, Suit::Spades).unwrap();
        let state = score_round(played_round(3, 1, bid, &[3, 5, 2])).unwrap();
        assert_eq!(scores(&state), [30, -40, 20]);

        let bid = Bid::new(6, Suit::None).unwrap();
        let state = score_round(played_round(5, 4, bid, &[1, 0, 2, 0, 7])).unwrap();
        assert_eq!(scores(&state), [10, 0, 20, 0, 120]);
    }

    #[test]
    fn winning_score_completes_game() {
        let bid = Bid::new(7, Suit::Hearts).unwrap();
        let round = played_round(4, 0, bid, &[4, 1, 3, 2]);

        let state = score_round(round.clone()).unwrap();
        let next = <Phase as game::Phase>::transition(&Phase::Scoring, &state).unwrap();
        assert_eq!(next, Some(Phase::NewRound));

        let state = score_round(round.adjust_score(&[p(0), p(2)], 350)).unwrap();
        assert_eq!(state.score(p(0)), 550);
        let next = <Phase as game::Phase>::transition(&Phase::Scoring, &state).unwrap();
        assert_eq!(next, Some(Phase::Completed));

        // Losing the winning score also ends the game.
        let state = score_round(
            played_round(4, 1, bid, &[4, 1, 3, 2]).adjust_score(&[p(1), p(3)], -350),
        )
        .unwrap();
        assert_eq!(state.score(p(1)), -550);
        let next = <Phase as game::Phase>::transition(&Phase::Scoring, &state).unwrap();
        assert_eq!(next, Some(Phase::Completed));
    }

    #[test]
    fn game_play_through() {
        let mut game = play(Rules::default(), 500).unwrap();
        assert_eq!(game.phase(), Phase::Bidding);
        assert_eq!(game.state().dealer(), Ok(p(3)));
        assert!(game.state().hands().unwrap().values().all(|h| h.len() == 10));

        game.apply(&bid(0, 6, Suit::Hearts)).unwrap();
        game.apply(&pass(1)).unwrap();
        game.apply(&bid(2, 7, Suit::Hearts)).unwrap();
        game.apply(&pass(3)).unwrap();
        game.apply(&pass(0)).unwrap();

        assert_eq!(game.phase(), Phase::Kitty);
        assert_eq!(game.state().priority(), Ok(p(2)));
        assert_eq!(game.state().priority_hand().unwrap().len(), 13);

        let discard = game.state().priority_hand().unwrap()[..3].to_vec();
        game.apply(&Action::Kitty {
            actor: p(2),
            cards: discard,
        })
        .unwrap();
        assert_eq!(game.phase(), Phase::Playing);

        for _ in 0..10 {
            for _ in 0..4 {
                let actor = game.state().priority().unwrap();
                let card = game.state().priority_hand().unwrap()[0];
                game.apply(&Action::Play { actor, card }).unwrap();
            }
        }

        assert_eq!(game.phase(), Phase::Bidding);
        assert_ne!(game.state().scores().values().sum::<i32>(), 0);
        assert_eq!(game.state().dealer(), Ok(p(0)));
        assert_eq!(game.state().priority(), Ok(p(1)));
    }

    #[test]
    fn bids_must_increase() {
        let mut game = play(Rules::default(), 1).unwrap();
        game.apply(&bid(0, 7, Suit::Spades)).unwrap();

        let res = game.apply(&bid(1, 6, Suit::None));
        assert!(matches!(res, Err(StateError::Illegal(_))));
        assert_eq!(game.state().priority(), Ok(p(1)));

        game.apply(&bid(1, 7, Suit::Clubs)).unwrap();
        assert_eq!(game.state().bidder(), Ok(p(1)));
    }

    #[test]
    fn wrong_actor_leaves_game_unchanged() {
        let mut game = play(Rules::default(), 1).unwrap();
        let before = game.state().clone();

        let err = game.apply(&pass(2)).unwrap_err();
        assert_eq!(
            err,
            StateError::illegal("<Player 2> cannot go, waiting for <Player 0>")
        );
        assert_eq!(game.phase(), Phase::Bidding);
        assert_eq!(game.state(), &before);

        // Actions outside their phase.
        let card = game.state().priority_hand().unwrap()[0];
        let res = game.apply(&Action::Play { actor: p(0), card });
        assert!(matches!(res, Err(StateError::Illegal(_))));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn all_pass_redeals() {
        let mut game = play(Rules::new(3).unwrap(), 3).unwrap();
        let first_hands = game.state().hands().unwrap().clone();

        game.apply(&pass(0)).unwrap();
        game.apply(&pass(1)).unwrap();
        game.apply(&pass(2)).unwrap();

        assert_eq!(game.phase(), Phase::Bidding);
        assert_eq!(game.state().dealer(), Ok(p(0)));
        assert_eq!(game.state().priority(), Ok(p(1)));
        assert_ne!(game.state().hands().unwrap(), &first_hands);
        assert!(game.state().bid().is_err());
    }

    #[test]
    fn passed_players_are_skipped() {
        let mut game = play(Rules::default(), 9).unwrap();
        game.apply(&pass(0)).unwrap();
        game.apply(&bid(1, 6, Suit::Spades)).unwrap();
        game.apply(&pass(2)).unwrap();
        game.apply(&bid(3, 6, Suit::Clubs)).unwrap();

        // Player 0 passed, bidding goes back to player 1.
        assert_eq!(game.state().priority(), Ok(p(1)));
        assert!(game.apply(&pass(0)).is_err());

        game.apply(&pass(1)).unwrap();
        assert_eq!(game.phase(), Phase::Kitty);
        assert_eq!(game.state().priority(), Ok(p(3)));
    }

    #[test]
    fn kitty_must_have_kitty_size() {
        let mut game = play(Rules::default(), 4).unwrap();
        game.apply(&bid(0, 6, Suit::Spades)).unwrap();
        for actor in 1..4 {
            game.apply(&pass(actor)).unwrap();
        }

        assert_eq!(game.phase(), Phase::Kitty);
        let hand = game.state().priority_hand().unwrap().to_vec();
        let res = game.apply(&Action::Kitty {
            actor: p(0),
            cards: hand[..2].to_vec(),
        });
        assert!(res.is_err());
        assert_eq!(game.phase(), Phase::Kitty);
    }

    #[test]
    fn game_completes() {
        let mut game = play(Rules::default().with_winning_score(100), 11).unwrap();

        // Bid and lose all tricks until a team falls below the target.
        let mut rounds = 0;
        while game.phase() != Phase::Completed {
            rounds += 1;
            assert!(rounds < 20, "game did not complete");

            let opener = game.state().priority().unwrap();
            game.apply(&Action::Bid {
                actor: opener,
                bid: Bid::new(10, Suit::None).unwrap(),
            })
            .unwrap();

            for n in 1..4 {
                let actor = game.state().player_relative_to(opener, n);
                game.apply(&Action::Pass { actor }).unwrap();
            }

            let discard = game.state().priority_hand().unwrap()[..3].to_vec();
            game.apply(&Action::Kitty {
                actor: opener,
                cards: discard,
            })
            .unwrap();

            while game.phase() == Phase::Playing {
                let actor = game.state().priority().unwrap();
                let card = game.state().priority_hand().unwrap()[0];
                game.apply(&Action::Play { actor, card }).unwrap();
            }
        }

        assert!(game.state().scores().values().any(|s| s.abs() >= 100));
        assert!(game.apply(&pass(0)).is_err());
    }
}
