// Copyright (C) 2025 Cardgame Developers
// SPDX-License-Identifier: Apache-2.0

//! Phase based game engine.
//!
//! A [Game] couples a [Phase] with the game state. Players change the state
//! by applying actions to the current phase, after every change the phase
//! decides whether the game moves to another phase. Phases entered this way
//! may transition again before any action, so a game can cascade through
//! setup phases at construction.
use log::debug;
use std::fmt;
use thiserror::Error;

/// The game engine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A state field was read before the game populated it.
    #[error("{0} is not available in this state")]
    Missing(&'static str),
    /// An action or transition not allowed by the game rules.
    #[error("{0}")]
    Illegal(String),
    /// A legal action that did not change the state.
    #[error("action {action} did not change the state in phase {phase}")]
    Unchanged {
        /// The phase that applied the action.
        phase: String,
        /// The applied action.
        action: String,
    },
    /// A card evaluation error raised by the game rules.
    #[error(transparent)]
    Eval(#[from] cardgame_eval::Error),
}

impl StateError {
    /// Creates an illegal action error.
    pub fn illegal(msg: impl Into<String>) -> Self {
        StateError::Illegal(msg.into())
    }
}

/// Engine result type.
pub type Result<T> = std::result::Result<T, StateError>;

/// A seated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Player {
    position: usize,
}

impl Player {
    /// Creates a player sitting at the given position.
    pub const fn new(position: usize) -> Self {
        Self { position }
    }

    /// The player seat position.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Player {}>", self.position)
    }
}

/// A stage in a game lifecycle.
///
/// Phases are stateless values, all their behavior is a function of the game
/// state. Each hook returns a new state and never mutates the input.
pub trait Phase: Copy + Eq + fmt::Debug {
    /// The game state threaded through the phases.
    type State: Clone + PartialEq;
    /// The players actions.
    type Action: fmt::Debug;

    /// Called when the phase becomes active.
    fn enter(&self, state: Self::State) -> Result<Self::State> {
        Ok(state)
    }

    /// Called when the phase is about to be left.
    fn exit(&self, state: Self::State) -> Result<Self::State> {
        Ok(state)
    }

    /// Applies a player action while this phase is active.
    ///
    /// Legal actions must change the state. Phases that transition as soon
    /// as they are entered need not implement it as they never wait for
    /// actions.
    fn apply(&self, _state: &Self::State, action: &Self::Action) -> Result<Self::State> {
        Err(StateError::illegal(format!(
            "phase {self:?} does not accept {action:?}"
        )))
    }

    /// Returns the next phase to activate, or nothing to stay in this phase.
    fn transition(&self, _state: &Self::State) -> Result<Option<Self>> {
        Ok(None)
    }
}

/// A game driven by its current phase.
#[derive(Debug, Clone)]
pub struct Game<P: Phase> {
    phase: P,
    state: P::State,
}

impl<P: Phase> Game<P> {
    /// Creates a game entering the initial phase.
    ///
    /// The game transitions until it reaches a phase that waits for actions.
    pub fn new(phase: P, state: P::State) -> Result<Self> {
        let state = phase.enter(state)?;
        let (phase, state) = Self::settle(phase, state)?;
        Ok(Self { phase, state })
    }

    /// Applies an action to the current phase and transitions the game.
    ///
    /// On error the game phase and state are left unchanged.
    pub fn apply(&mut self, action: &P::Action) -> Result<()> {
        let state = self.phase.apply(&self.state, action)?;
        if state == self.state {
            return Err(StateError::Unchanged {
                phase: format!("{:?}", self.phase),
                action: format!("{action:?}"),
            });
        }

        let (phase, state) = Self::settle(self.phase, state)?;
        self.phase = phase;
        self.state = state;

        Ok(())
    }

    /// The current phase.
    pub fn phase(&self) -> P {
        self.phase
    }

    /// The current state.
    pub fn state(&self) -> &P::State {
        &self.state
    }

    /// Runs transitions until the phase wants to stay active.
    fn settle(mut phase: P, mut state: P::State) -> Result<(P, P::State)> {
        while let Some(next) = phase.transition(&state)? {
            debug!("Transition {phase:?} -> {next:?}");
            state = phase.exit(state)?;
            phase = next;
            state = phase.enter(state)?;
        }

        Ok((phase, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Counter {
        entered: Vec<&'static str>,
        exited: Vec<&'static str>,
        turn: usize,
        count: u32,
    }

    #[derive(Debug)]
    struct Add {
        actor: Player,
        n: u32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stage {
        Start,
        Middle,
        Counting,
        Done,
    }

    impl Stage {
        fn name(&self) -> &'static str {
            match self {
                Stage::Start => "start",
                Stage::Middle => "middle",
                Stage::Counting => "counting",
                Stage::Done => "done",
            }
        }
    }

    impl Phase for Stage {
        type State = Counter;
        type Action = Add;

        fn enter(&self, mut state: Counter) -> Result<Counter> {
            state.entered.push(self.name());
            Ok(state)
        }

        fn exit(&self, mut state: Counter) -> Result<Counter> {
            state.exited.push(self.name());
            Ok(state)
        }

        fn apply(&self, state: &Counter, action: &Add) -> Result<Counter> {
            match self {
                Stage::Counting => {
                    let expected = Player::new(state.turn % 2);
                    if action.actor != expected {
                        return Err(StateError::illegal(format!(
                            "{} cannot go, waiting for {expected}",
                            action.actor
                        )));
                    }

                    let mut state = state.clone();
                    state.turn += 1;
                    state.count += action.n;
                    Ok(state)
                }
                _ => Err(StateError::illegal("not counting")),
            }
        }

        fn transition(&self, state: &Counter) -> Result<Option<Stage>> {
            Ok(match self {
                Stage::Start => Some(Stage::Middle),
                Stage::Middle => Some(Stage::Counting),
                Stage::Counting if state.count >= 10 => Some(Stage::Done),
                _ => None,
            })
        }
    }

    #[test]
    fn construction_cascades() {
        let game = Game::new(Stage::Start, Counter::default()).unwrap();
        assert_eq!(game.phase(), Stage::Counting);
        assert_eq!(game.state().entered, ["start", "middle", "counting"]);
        assert_eq!(game.state().exited, ["start", "middle"]);
    }

    #[test]
    fn actions_transition() {
        let mut game = Game::new(Stage::Start, Counter::default()).unwrap();

        game.apply(&Add {
            actor: Player::new(0),
            n: 4,
        })
        .unwrap();
        assert_eq!(game.phase(), Stage::Counting);

        game.apply(&Add {
            actor: Player::new(1),
            n: 6,
        })
        .unwrap();
        assert_eq!(game.phase(), Stage::Done);
        assert_eq!(game.state().count, 10);
        assert_eq!(game.state().exited.last(), Some(&"counting"));

        // Done has no action window.
        let res = game.apply(&Add {
            actor: Player::new(0),
            n: 1,
        });
        assert!(matches!(res, Err(StateError::Illegal(_))));
    }

    #[test]
    fn wrong_actor_leaves_game_unchanged() {
        let mut game = Game::new(Stage::Start, Counter::default()).unwrap();
        let before = game.state().clone();

        let res = game.apply(&Add {
            actor: Player::new(1),
            n: 4,
        });
        assert_eq!(
            res,
            Err(StateError::illegal(
                "<Player 1> cannot go, waiting for <Player 0>"
            ))
        );
        assert_eq!(game.phase(), Stage::Counting);
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn unchanged_state_is_rejected() {
        let mut game = Game::new(Stage::Start, Counter::default()).unwrap();

        // Adding zero only changes the turn.
        game.apply(&Add {
            actor: Player::new(0),
            n: 0,
        })
        .unwrap();

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct Noop;

        impl Phase for Noop {
            type State = u32;
            type Action = ();

            fn apply(&self, state: &u32, _action: &()) -> Result<u32> {
                Ok(*state)
            }
        }

        let mut game = Game::new(Noop, 7).unwrap();
        assert!(matches!(
            game.apply(&()),
            Err(StateError::Unchanged { .. })
        ));
        assert_eq!(*game.state(), 7);
    }

    #[test]
    fn player_display() {
        assert_eq!(Player::new(3).to_string(), "<Player 3>");
    }
}
