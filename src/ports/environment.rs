//! Environment ports - what the agent needs to know about the game.
//!
//! The learning core never inspects a state directly. Every query goes
//! through these traits, so any grid game that can answer them can be
//! learned by the same agent.

use std::collections::HashSet;

use rand::Rng;

use crate::{
    Result,
    types::{Direction, Position},
};

/// Read-only view of a grid game, as consumed by the learning core.
///
/// # Examples
///
/// ```no_run
/// use gridq::{ports::Environment, types::Position};
///
/// fn moves_from_here<E: Environment>(env: &E, state: &E::State) -> Vec<Position> {
///     let here = env.agent_position(state);
///     env.legal_actions(state)
///         .into_iter()
///         .map(|action| env.successor_position(here, action))
///         .collect()
/// }
/// ```
pub trait Environment {
    /// Opaque snapshot owned by the environment.
    type State: Clone;

    /// Legal actions in enumeration order. Empty at terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Direction>;

    fn is_win(&self, state: &Self::State) -> bool;

    fn is_lose(&self, state: &Self::State) -> bool;

    /// Whether the episode has ended.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.is_win(state) || self.is_lose(state)
    }

    /// Position of the learning agent.
    fn agent_position(&self, state: &Self::State) -> Position;

    fn has_food_at(&self, state: &Self::State, position: Position) -> bool;

    /// Active capsule markers. Membership-tested, never indexed.
    fn capsule_positions(&self, state: &Self::State) -> HashSet<Position>;

    /// Positions of every other mobile entity (ghosts).
    fn other_entity_positions(&self, state: &Self::State) -> Vec<Position>;

    /// Position reached from `position` by taking `action`.
    fn successor_position(&self, position: Position, action: Direction) -> Position {
        position.step(action)
    }
}

/// An environment that can also advance itself, used by the training harness.
pub trait Simulator: Environment {
    /// Fresh state at the start of an episode.
    fn initial_state(&self) -> Self::State;

    /// Apply the agent's action and let the rest of the world respond.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::GameOver`] for terminal states and
    /// [`crate::Error::IllegalAction`] for actions outside
    /// [`Environment::legal_actions`].
    fn apply<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        action: Direction,
        rng: &mut R,
    ) -> Result<Self::State>;

    /// Running game score; the harness rewards the agent with score deltas.
    fn score(&self, state: &Self::State) -> f64;
}

/// Static grid geometry, needed by extractors that measure distances.
pub trait GridTopology {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn is_wall(&self, position: Position) -> bool;

    /// Non-wall neighbours reachable in a single move (excluding `Stop`).
    fn legal_neighbors(&self, position: Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter(|direction| *direction != Direction::Stop)
            .map(|direction| position.step(direction))
            .filter(|next| !self.is_wall(*next))
            .collect()
    }
}
