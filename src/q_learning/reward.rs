//! Shaped reward derived from a single state.

use serde::{Deserialize, Serialize};

use crate::ports::Environment;

/// Reward constants for terminal outcomes and intermediate incentives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    pub loss: f64,
    pub win: f64,
    /// Food marker at the agent's position
    pub food: f64,
    /// Active capsule at the agent's position
    pub capsule: f64,
    /// Per other entity sharing the agent's position
    pub scared_entity: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            loss: -1000.0,
            win: 1000.0,
            food: 1.0,
            capsule: 10.0,
            scared_entity: 50.0,
        }
    }
}

impl RewardSchedule {
    /// Reward for `state`. Pure and total.
    ///
    /// Loss is checked before win. Any entity sharing the agent's position in
    /// a non-terminal state must be harmless, so each one is a bonus.
    pub fn reward<E: Environment>(&self, env: &E, state: &E::State) -> f64 {
        if env.is_lose(state) {
            return self.loss;
        }
        if env.is_win(state) {
            return self.win;
        }

        let position = env.agent_position(state);
        let mut reward = 0.0;

        if env.has_food_at(state, position) {
            reward += self.food;
        }

        if env.capsule_positions(state).contains(&position) {
            reward += self.capsule;
        }

        let co_located = env
            .other_entity_positions(state)
            .into_iter()
            .filter(|other| *other == position)
            .count();
        reward += self.scared_entity * co_located as f64;

        reward
    }
}
