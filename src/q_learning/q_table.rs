//! Exact-match tabular Q-value store.
//!
//! Entries are keyed by (current position, resulting position) rather than by
//! full state, so every state that puts the agent on the same square shares
//! its action values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ports::{Environment, Transition, ValueSource},
    q_learning::reward::RewardSchedule,
    types::{Direction, Position},
};

/// Which state the tabular update bootstraps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bootstrap {
    /// Reward and best value of the pre-transition state.
    #[default]
    Current,
    /// Reward and best value of the post-transition state.
    Successor,
}

/// Sparse Q-table over (position, next position) pairs.
#[derive(Debug, Clone)]
pub struct QTable {
    /// Q-values: (current_position, resulting_position) -> Q-value
    q_values: HashMap<(Position, Position), f64>,
    /// Learning rate α
    learning_rate: f64,
    bootstrap: Bootstrap,
    rewards: RewardSchedule,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new(learning_rate: f64, bootstrap: Bootstrap, rewards: RewardSchedule) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            bootstrap,
            rewards,
        }
    }

    /// Stored value for an exact key, or 0.0 if it was never written.
    pub fn get(&self, from: Position, to: Position) -> f64 {
        self.q_values.get(&(from, to)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, from: Position, to: Position, value: f64) {
        self.q_values.insert((from, to), value);
    }

    /// Number of keys written so far
    pub fn size(&self) -> usize {
        self.q_values.len()
    }

    pub fn reset(&mut self) {
        self.q_values.clear();
    }
}

impl<E: Environment> ValueSource<E> for QTable {
    fn value(&self, env: &E, state: &E::State, action: Direction) -> f64 {
        let current = env.agent_position(state);
        self.get(current, env.successor_position(current, action))
    }

    /// Tabular update:
    ///
    /// Q(p, p') ← α · (R(s) + V(s) − Q(p, p'))
    ///
    /// The result replaces the old entry rather than being added to it, and the
    /// environment reward carried by the transition is not used; `R` is the
    /// shaped reward from [`RewardSchedule`]. With [`Bootstrap::Successor`],
    /// `R` and `V` are read from the next state instead.
    fn observe(&mut self, env: &E, transition: Transition<'_, E::State>) {
        let current = env.agent_position(transition.state);
        let resulting = env.successor_position(current, transition.action);
        let old_value = self.get(current, resulting);

        let target_state = match self.bootstrap {
            Bootstrap::Current => transition.state,
            Bootstrap::Successor => transition.next_state,
        };
        let reward = self.rewards.reward(env, target_state);
        let bootstrap = self.best_value(env, target_state);

        let new_value = self.learning_rate * (reward + bootstrap - old_value);
        self.set(current, resulting, new_value);
    }
}
