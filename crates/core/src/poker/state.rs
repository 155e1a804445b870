// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Texas Hold'em betting state.
use ahash::AHashMap;
use rand::{Rng, SeedableRng, rngs::StdRng};

use cardgame_eval::{Card, Classification, Deck, poker};

use super::{Chips, Rules};
use crate::game::{Player, Result, StateError};

/// An immutable Hold'em game state.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    rules: Rules,
    seed: u64,
    players: Vec<Player>,
    chips: AHashMap<Player, Chips>,
    dealer: Option<Player>,
    priority: Option<Player>,
    deck: Option<Deck>,
    hands: AHashMap<Player, Vec<Card>>,
    board: Vec<Card>,
    pot: AHashMap<Player, Chips>,
    active: Vec<Player>,
    last_raiser: Option<Player>,
}

impl State {
    /// Creates the state for a new game, every player buys in with the rules
    /// chips.
    pub fn initial(rules: Rules, seed: u64) -> Self {
        let players = (0..rules.players()).map(Player::new).collect::<Vec<_>>();
        Self {
            chips: players.iter().map(|p| (*p, rules.buy_in())).collect(),
            pot: players.iter().map(|p| (*p, Chips::ZERO)).collect(),
            active: players.clone(),
            players,
            rules,
            seed,
            dealer: None,
            priority: None,
            deck: None,
            hands: AHashMap::default(),
            board: Vec::new(),
            last_raiser: None,
        }
    }

    /// The game rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// The seed used by the next shuffle.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The players, in seating order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player chips, excluding bets in the pot.
    pub fn chips(&self, player: Player) -> Chips {
        self.chips.get(&player).copied().unwrap_or_default()
    }

    /// Players who still have chips.
    pub fn seated(&self) -> Vec<Player> {
        self.players
            .iter()
            .copied()
            .filter(|p| self.chips(*p) > Chips::ZERO)
            .collect()
    }

    /// The dealer.
    pub fn dealer(&self) -> Result<Player> {
        self.dealer.ok_or(StateError::Missing("dealer"))
    }

    /// The player expected to act.
    pub fn priority(&self) -> Result<Player> {
        self.priority.ok_or(StateError::Missing("priority"))
    }

    /// The remaining deck.
    pub fn deck(&self) -> Result<&Deck> {
        self.deck.as_ref().ok_or(StateError::Missing("deck"))
    }

    /// A player hole cards.
    pub fn hand(&self, player: Player) -> Result<&[Card]> {
        self.hands
            .get(&player)
            .map(Vec::as_slice)
            .ok_or(StateError::Missing("hand"))
    }

    /// The community cards.
    pub fn board(&self) -> &[Card] {
        &self.board
    }

    /// Chips a player put in the pot this round.
    pub fn bet(&self, player: Player) -> Chips {
        self.pot.get(&player).copied().unwrap_or_default()
    }

    /// The pot total.
    pub fn pot(&self) -> Chips {
        self.pot.values().fold(Chips::ZERO, |acc, c| acc + *c)
    }

    /// Players who have not folded, in seating order.
    pub fn active(&self) -> &[Player] {
        &self.active
    }

    /// The last player who raised, or the first who called, in this betting
    /// round.
    pub fn last_raiser(&self) -> Option<Player> {
        self.last_raiser
    }

    /// The first player in `among` seated after `player`.
    fn next_among(&self, among: &[Player], player: Player) -> Option<Player> {
        let count = self.players.len();
        (1..=count)
            .map(|n| Player::new((player.position() + n) % count))
            .find(|p| among.contains(p))
    }

    /// The first active player left of the dealer.
    pub fn left_of_dealer(&self) -> Result<Player> {
        self.next_among(&self.active, self.dealer()?)
            .ok_or_else(|| StateError::illegal("no active players"))
    }

    /// Gives the deal to a player.
    pub fn give_deal(&self, player: Player) -> Self {
        Self {
            dealer: Some(player),
            ..self.clone()
        }
    }

    /// Passes the deal to the next player with chips.
    pub fn advance_dealer(&self) -> Result<Self> {
        let dealer = self.dealer()?;
        let next = self.next_among(&self.seated(), dealer).unwrap_or(dealer);
        Ok(self.give_deal(next))
    }

    /// Gives priority to a player.
    pub fn give_priority(&self, player: Player) -> Self {
        Self {
            priority: Some(player),
            ..self.clone()
        }
    }

    /// Passes priority to the next active player.
    pub fn advance(&self) -> Result<Self> {
        let priority = self.priority()?;
        let next = self.next_among(&self.active, priority).unwrap_or(priority);
        Ok(self.give_priority(next))
    }

    /// Empties the pot.
    pub fn empty_pot(&self) -> Self {
        Self {
            pot: self.players.iter().map(|p| (*p, Chips::ZERO)).collect(),
            ..self.clone()
        }
    }

    /// Empties pot and board, players with chips become active.
    pub fn clear_table(&self) -> Self {
        Self {
            board: Vec::new(),
            hands: AHashMap::default(),
            active: self.seated(),
            last_raiser: None,
            ..self.empty_pot()
        }
    }

    /// Replaces the deck.
    pub fn reset_deck(&self, deck: Deck) -> Self {
        Self {
            deck: Some(deck),
            ..self.clone()
        }
    }

    /// Shuffles a new deck from the state seed and moves to the next seed.
    pub fn shuffle_deck(&self) -> Self {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut deck = poker::deck();
        deck.shuffle(&mut rng);

        Self {
            seed: rng.random(),
            ..self.reset_deck(deck)
        }
    }

    /// Deals `n` hole cards to each active player.
    pub fn deal_hand_cards(&self, n: usize) -> Result<Self> {
        let mut deck = self.deck()?.clone();
        let mut hands = AHashMap::with_capacity(self.active.len());
        for player in &self.active {
            let cards = deck
                .deal_many(n)
                .ok_or_else(|| StateError::illegal("not enough cards to deal hands"))?;
            hands.insert(*player, cards);
        }

        Ok(Self {
            deck: Some(deck),
            hands,
            ..self.clone()
        })
    }

    /// Deals `n` community cards.
    pub fn deal_community_cards(&self, n: usize) -> Result<Self> {
        let mut deck = self.deck()?.clone();
        let cards = deck
            .deal_many(n)
            .ok_or_else(|| StateError::illegal("not enough cards to deal the board"))?;

        let mut board = self.board.clone();
        board.extend(cards);

        Ok(Self {
            deck: Some(deck),
            board,
            ..self.clone()
        })
    }

    /// Forgets the last raiser at the start of a betting round.
    pub fn clear_last_raiser(&self) -> Self {
        Self {
            last_raiser: None,
            ..self.clone()
        }
    }

    /// Folds a player hand.
    pub fn fold(&self, actor: Player) -> Result<Self> {
        let state = self.advance()?;
        Ok(Self {
            active: self.active.iter().copied().filter(|p| *p != actor).collect(),
            ..state
        })
    }

    /// Chips a player must add to match the highest bet.
    pub fn owed(&self, player: Player) -> Chips {
        let max = self.pot.values().copied().max().unwrap_or_default();
        max - self.bet(player)
    }

    /// Matches the highest bet, or goes all in if short of chips.
    pub fn call_bet(&self, actor: Player) -> Result<Self> {
        let amount = self.owed(actor).min(self.chips(actor));
        let state = self.move_to_pot(actor, amount).advance()?;
        Ok(Self {
            last_raiser: self.last_raiser.or(Some(actor)),
            ..state
        })
    }

    /// Matches the highest bet and raises it by `amount`.
    pub fn raise_bet(&self, actor: Player, amount: Chips) -> Result<Self> {
        if amount == Chips::ZERO {
            return Err(StateError::illegal("raise must be more than zero chips"));
        }

        let total = self.owed(actor) + amount;
        let chips = self.chips(actor);
        if total > chips {
            return Err(StateError::illegal(format!(
                "{actor} cannot bet {total} chips with {chips} chips"
            )));
        }

        let state = self.move_to_pot(actor, total).advance()?;
        Ok(Self {
            last_raiser: Some(actor),
            ..state
        })
    }

    fn move_to_pot(&self, actor: Player, amount: Chips) -> Self {
        let mut chips = self.chips.clone();
        let mut pot = self.pot.clone();
        *chips.entry(actor).or_default() -= amount;
        *pot.entry(actor).or_default() += amount;

        Self {
            chips,
            pot,
            ..self.clone()
        }
    }

    /// The best hand of an active player using the community cards.
    pub fn best_hand(&self, player: Player) -> Result<Classification> {
        let mut cards = self.hand(player)?.to_vec();
        cards.extend_from_slice(&self.board);
        Ok(poker::best_hand(&cards, 5)?)
    }

    /// The active players holding the best hand.
    pub fn showdown_winners(&self) -> Result<Vec<Player>> {
        let mut best: Option<Classification> = None;
        let mut winners = Vec::new();

        for player in &self.active {
            let hand = self.best_hand(*player)?;
            match best.as_ref().map(|b| hand.cmp(b)) {
                Some(std::cmp::Ordering::Less) => {}
                Some(std::cmp::Ordering::Equal) => winners.push(*player),
                _ => {
                    best = Some(hand);
                    winners = vec![*player];
                }
            }
        }

        Ok(winners)
    }

    /// Splits the pot among the winners.
    ///
    /// Odd chips go one each to the winners starting from the first winner
    /// left of the dealer.
    pub fn give_pot_to(&self, winners: &[Player]) -> Result<Self> {
        if winners.is_empty() {
            return Err(StateError::illegal("pot must have at least one winner"));
        }

        let pot = self.pot();
        let count = winners.len() as u32;
        let share = pot / count;
        let mut odd = (pot % count).amount();

        let dealer = self.dealer()?;
        let mut order = winners.to_vec();
        order.sort_by_key(|p| {
            let n = self.players.len();
            (p.position() + n - dealer.position() - 1) % n
        });

        let mut chips = self.chips.clone();
        for player in order {
            let mut won = share;
            if odd > 0 {
                won += Chips::new(1);
                odd -= 1;
            }

            *chips.entry(player).or_default() += won;
        }

        Ok(Self {
            chips,
            ..self.empty_pot()
        })
    }
}
