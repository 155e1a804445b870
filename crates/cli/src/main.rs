// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Card games command line.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use cardgame_core::{five_hundred, poker};
use cardgame_eval::{Card, Suit, Trick, parse_cards, winning_card};

mod auto;
use auto::{FiveHundredBot, HoldemBot};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classifies a five cards poker hand, or the best hand of more cards.
    Classify {
        /// The cards, e.g. `AS KS QS JS 10S`.
        #[clap(required = true, num_args = 5..)]
        cards: Vec<String>,
    },
    /// Finds the winning card of a Five Hundred trick.
    Winner {
        /// The trump suit.
        #[clap(long, short, value_enum, default_value_t = Trump::None)]
        trump: Trump,
        /// The cards in play order, `Jk` for the Joker.
        #[clap(required = true)]
        cards: Vec<String>,
    },
    /// Plays a Five Hundred game with automatic players.
    FiveHundred {
        /// Number of players.
        #[clap(long, short, default_value_t = 4, value_parser = clap::value_parser!(u8).range(3..=6))]
        players: u8,
        /// The deals seed.
        #[clap(long, short, default_value_t = 0)]
        seed: u64,
        /// Score that ends the game.
        #[clap(long, default_value_t = five_hundred::Rules::WINNING_SCORE)]
        winning_score: i32,
        /// Maximum number of rounds to play.
        #[clap(long, default_value_t = 50)]
        max_rounds: usize,
    },
    /// Plays a Texas Hold'em game with automatic players.
    Holdem {
        /// Number of players.
        #[clap(long, short, default_value_t = 3, value_parser = clap::value_parser!(u8).range(2..=10))]
        players: u8,
        /// The deals seed.
        #[clap(long, short, default_value_t = 0)]
        seed: u64,
        /// Chips each player starts with.
        #[clap(long, default_value_t = 100)]
        buy_in: u32,
        /// Maximum number of rounds to play.
        #[clap(long, default_value_t = 50)]
        max_rounds: usize,
    },
}

/// Trump suit argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Trump {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
    None,
}

impl From<Trump> for Suit {
    fn from(trump: Trump) -> Suit {
        match trump {
            Trump::Hearts => Suit::Hearts,
            Trump::Diamonds => Suit::Diamonds,
            Trump::Clubs => Suit::Clubs,
            Trump::Spades => Suit::Spades,
            Trump::None => Suit::None,
        }
    }
}

fn cards(tokens: &[String]) -> Result<Vec<Card>> {
    parse_cards(&tokens.join(" ")).context("invalid cards")
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env()
        .init();

    match Cli::parse().command {
        Command::Classify { cards: tokens } => {
            let hand = cards(&tokens)?;
            let classification = if hand.len() == 5 {
                cardgame_eval::classify(&hand)?
            } else {
                cardgame_eval::poker::best_hand(&hand, 5)?
            };

            println!("{classification}");
        }
        Command::Winner {
            trump,
            cards: tokens,
        } => {
            let trick = Trick::new(cards(&tokens)?, trump.into());
            println!("{}", winning_card(&trick)?);
        }
        Command::FiveHundred {
            players,
            seed,
            winning_score,
            max_rounds,
        } => {
            let rules =
                five_hundred::Rules::new(players as usize)?.with_winning_score(winning_score);
            let mut game = five_hundred::play(rules, seed)?;
            let rounds = auto::run(&mut game, &mut FiveHundredBot::default(), max_rounds)?;

            info!("Played {rounds} rounds");
            let state = game.state();
            for player in state.players() {
                println!("{player} {}", state.score(*player));
            }
        }
        Command::Holdem {
            players,
            seed,
            buy_in,
            max_rounds,
        } => {
            let rules = poker::Rules::new(players as usize, poker::Chips::new(buy_in))?;
            let mut game = poker::texas_holdem(rules, seed)?;
            let rounds = auto::run(&mut game, &mut HoldemBot::default(), max_rounds)?;

            info!("Played {rounds} rounds");
            let state = game.state();
            for player in state.players() {
                println!("{player} {}", state.chips(*player));
            }
        }
    }

    Ok(())
}
