// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Five Hundred game state.
use ahash::{AHashMap, AHashSet};
use rand::{Rng, SeedableRng, rngs::StdRng};

use cardgame_eval::{Card, Deck, Trick, winning_card};

use super::{Bid, Rules, deck};
use crate::game::{Player, Result, StateError};

/// An immutable Five Hundred game state.
///
/// Transition methods return a new state leaving this one untouched. Fields
/// populated only in some phases fail with [StateError::Missing] when read
/// before they are set.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    rules: Rules,
    seed: u64,
    players: Vec<Player>,
    dealer: Option<Player>,
    priority: Option<Player>,
    hands: Option<AHashMap<Player, Vec<Card>>>,
    kitty: Vec<Card>,
    bid: Option<(Player, Bid)>,
    passed: AHashSet<Player>,
    trick: Option<(Player, Trick)>,
    tricks: AHashMap<Player, usize>,
    scores: AHashMap<Player, i32>,
}

impl State {
    /// Creates the state for a new game, deals are shuffled from `seed`.
    pub fn initial(rules: Rules, seed: u64) -> Self {
        let players = (0..rules.players()).map(Player::new).collect::<Vec<_>>();
        Self {
            tricks: players.iter().map(|p| (*p, 0)).collect(),
            scores: players.iter().map(|p| (*p, 0)).collect(),
            players,
            rules,
            seed,
            dealer: None,
            priority: None,
            hands: None,
            kitty: Vec::new(),
            bid: None,
            passed: AHashSet::default(),
            trick: None,
        }
    }

    /// The game rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The seed used by the next deal.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The players, in seating order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player who dealt the current round.
    pub fn dealer(&self) -> Result<Player> {
        self.dealer.ok_or(StateError::Missing("dealer"))
    }

    /// The player expected to act.
    pub fn priority(&self) -> Result<Player> {
        self.priority.ok_or(StateError::Missing("priority"))
    }

    /// All players hands.
    pub fn hands(&self) -> Result<&AHashMap<Player, Vec<Card>>> {
        self.hands.as_ref().ok_or(StateError::Missing("hands"))
    }

    /// A player hand.
    pub fn hand(&self, player: Player) -> Result<&[Card]> {
        self.hands()?
            .get(&player)
            .map(Vec::as_slice)
            .ok_or_else(|| StateError::illegal(format!("{player} is not playing")))
    }

    /// The hand of the player with priority.
    pub fn priority_hand(&self) -> Result<&[Card]> {
        self.hand(self.priority()?)
    }

    /// The kitty cards.
    pub fn kitty(&self) -> &[Card] {
        &self.kitty
    }

    /// The highest bid.
    pub fn bid(&self) -> Result<Bid> {
        self.bid.map(|(_, bid)| bid).ok_or(StateError::Missing("bid"))
    }

    /// The player who placed the highest bid.
    pub fn bidder(&self) -> Result<Player> {
        self.bid
            .map(|(player, _)| player)
            .ok_or(StateError::Missing("bidder"))
    }

    /// Checks if a player passed in this bidding round.
    pub fn has_passed(&self, player: Player) -> bool {
        self.passed.contains(&player)
    }

    /// Checks if every player passed.
    pub fn all_passed(&self) -> bool {
        self.passed.len() == self.players.len()
    }

    /// Number of players who have not passed yet.
    pub fn bidders_left(&self) -> usize {
        self.players.len() - self.passed.len()
    }

    /// The current trick.
    pub fn trick(&self) -> Result<&Trick> {
        self.trick
            .as_ref()
            .map(|(_, trick)| trick)
            .ok_or(StateError::Missing("trick"))
    }

    /// The player who led the current trick.
    pub fn leader(&self) -> Result<Player> {
        self.trick
            .as_ref()
            .map(|(leader, _)| *leader)
            .ok_or(StateError::Missing("trick"))
    }

    /// Tricks won by each player in this round.
    pub fn tricks(&self) -> &AHashMap<Player, usize> {
        &self.tricks
    }

    /// Tricks won by a player in this round.
    pub fn won(&self, player: Player) -> usize {
        self.tricks.get(&player).copied().unwrap_or_default()
    }

    /// The players scores.
    pub fn scores(&self) -> &AHashMap<Player, i32> {
        &self.scores
    }

    /// A player score.
    pub fn score(&self, player: Player) -> i32 {
        self.scores.get(&player).copied().unwrap_or_default()
    }

    /// The player `n` seats after `player`.
    pub fn player_relative_to(&self, player: Player, n: usize) -> Player {
        Player::new((player.position() + n) % self.players.len())
    }

    /// The players in the same team as `player`, itself included.
    ///
    /// With an even number of players partners sit opposite, otherwise every
    /// player is on its own.
    pub fn team_for(&self, player: Player) -> Vec<Player> {
        let count = self.players.len();
        if count % 2 == 0 {
            let mut team = vec![player, self.player_relative_to(player, count / 2)];
            team.sort();
            team
        } else {
            vec![player]
        }
    }

    /// Gives priority to a player.
    pub fn give_priority(&self, player: Player) -> Self {
        Self {
            priority: Some(player),
            ..self.clone()
        }
    }

    /// Passes priority to the next player.
    pub fn advance(&self) -> Result<Self> {
        let next = self.player_relative_to(self.priority()?, 1);
        Ok(self.give_priority(next))
    }

    /// Passes priority to the next player who has not passed.
    ///
    /// The priority does not move if every other player passed.
    pub fn advance_bidding(&self) -> Result<Self> {
        let priority = self.priority()?;
        let next = (1..self.players.len())
            .map(|n| self.player_relative_to(priority, n))
            .find(|p| !self.has_passed(*p))
            .unwrap_or(priority);
        Ok(self.give_priority(next))
    }

    /// Gives the deal to a player.
    pub fn give_deal(&self, player: Player) -> Self {
        Self {
            dealer: Some(player),
            ..self.clone()
        }
    }

    /// Passes the deal to the next player.
    pub fn advance_dealer(&self) -> Result<Self> {
        let next = self.player_relative_to(self.dealer()?, 1);
        Ok(self.give_deal(next))
    }

    /// Adds points to every member of a team.
    pub fn adjust_score(&self, team: &[Player], points: i32) -> Self {
        let mut scores = self.scores.clone();
        for player in team {
            *scores.entry(*player).or_default() += points;
        }

        Self {
            scores,
            ..self.clone()
        }
    }

    /// Counts a trick won by a player.
    pub fn won_trick(&self, player: Player) -> Self {
        let mut tricks = self.tricks.clone();
        *tricks.entry(player).or_default() += 1;
        Self {
            tricks,
            ..self.clone()
        }
    }

    /// Resets tricks counts and removes the current trick.
    pub fn clear_tricks(&self) -> Self {
        Self {
            tricks: self.players.iter().map(|p| (*p, 0)).collect(),
            trick: None,
            ..self.clone()
        }
    }

    /// Deals hands and kitty from the top of the deck.
    pub fn deal(&self, mut deck: Deck) -> Result<Self> {
        let needed = self.players.len() * self.rules.hand_size() + self.rules.kitty_size();
        if deck.count() < needed {
            return Err(StateError::illegal(format!(
                "cannot deal from a deck with fewer than {needed} cards"
            )));
        }

        let mut hands = AHashMap::with_capacity(self.players.len());
        for player in &self.players {
            let hand = deck
                .deal_many(self.rules.hand_size())
                .ok_or(StateError::Missing("deck"))?;
            hands.insert(*player, hand);
        }

        let kitty = deck
            .deal_many(self.rules.kitty_size())
            .ok_or(StateError::Missing("deck"))?;

        Ok(Self {
            hands: Some(hands),
            kitty,
            ..self.clone()
        })
    }

    /// Deals a deck shuffled from the state seed and moves to the next seed.
    pub fn deal_shuffled(&self) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut deck = deck(&self.rules);
        deck.shuffle(&mut rng);

        let state = self.deal(deck)?;
        Ok(Self {
            seed: rng.random(),
            ..state
        })
    }

    /// Removes bids and passes.
    pub fn clear_bids(&self) -> Self {
        Self {
            bid: None,
            passed: AHashSet::default(),
            ..self.clone()
        }
    }

    /// Replaces the current bid.
    pub fn place_bid(&self, player: Player, bid: Bid) -> Self {
        Self {
            bid: Some((player, bid)),
            ..self.clone()
        }
    }

    /// Records a player pass.
    pub fn pass(&self, player: Player) -> Self {
        let mut passed = self.passed.clone();
        passed.insert(player);
        Self {
            passed,
            ..self.clone()
        }
    }

    /// Moves the kitty into the priority hand.
    pub fn move_kitty_to_hand(&self) -> Result<Self> {
        let priority = self.priority()?;
        let mut hands = self.hands()?.clone();
        if let Some(hand) = hands.get_mut(&priority) {
            hand.extend_from_slice(&self.kitty);
        }

        Ok(Self {
            hands: Some(hands),
            kitty: Vec::new(),
            ..self.clone()
        })
    }

    /// Moves cards from the priority hand to the kitty, replacing it.
    pub fn move_cards_to_kitty(&self, cards: &[Card]) -> Result<Self> {
        let hands = self.take_from_priority_hand(cards)?;
        Ok(Self {
            hands: Some(hands),
            kitty: cards.to_vec(),
            ..self.clone()
        })
    }

    /// Starts a trick led by the priority player with the bid trump.
    pub fn new_trick(&self) -> Result<Self> {
        let trick = Trick::empty(self.bid()?.suit());
        Ok(Self {
            trick: Some((self.priority()?, trick)),
            ..self.clone()
        })
    }

    /// Moves a card from the priority hand to the current trick.
    pub fn add_card_to_trick(&self, card: Card) -> Result<Self> {
        let (leader, trick) = self.trick.as_ref().ok_or(StateError::Missing("trick"))?;
        let hands = self.take_from_priority_hand(&[card])?;
        Ok(Self {
            hands: Some(hands),
            trick: Some((*leader, trick.add(card))),
            ..self.clone()
        })
    }

    /// The player who played the winning card of the current trick.
    pub fn trick_winner(&self) -> Result<Player> {
        let trick = self.trick()?;
        let card = winning_card(trick)?;
        let offset = trick
            .cards()
            .iter()
            .position(|c| *c == card)
            .ok_or_else(|| StateError::illegal(format!("{card} is not in the trick")))?;
        Ok(self.player_relative_to(self.leader()?, offset))
    }

    fn take_from_priority_hand(&self, cards: &[Card]) -> Result<AHashMap<Player, Vec<Card>>> {
        let priority = self.priority()?;
        let mut hands = self.hands()?.clone();
        let hand = hands
            .get_mut(&priority)
            .ok_or_else(|| StateError::illegal(format!("{priority} is not playing")))?;

        for card in cards {
            let idx = hand
                .iter()
                .position(|c| c == card)
                .ok_or_else(|| StateError::illegal(format!("{card} not in hand of {priority}")))?;
            hand.remove(idx);
        }

        Ok(hands)
    }
}
