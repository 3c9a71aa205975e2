//! Q-learning agent lifecycle
//!
//! Wraps an [`Estimator`] with the episode bookkeeping the training harness
//! drives: ε-threshold action selection while training, one update per
//! observed transition, and greedy play once `num_training` episodes are done.

use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    ports::{Environment, Transition, ValueSource},
    q_learning::{estimator::Estimator, policy},
    types::Direction,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent over a tabular or linear value representation.
#[derive(Debug)]
pub struct QLearningAgent<E: Environment> {
    estimator: Estimator<E>,
    epsilon: f64,
    num_training: usize,
    episodes_so_far: usize,
    episode_rewards: f64,
    accum_train_rewards: f64,
    accum_test_rewards: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<E: Environment> QLearningAgent<E> {
    /// Create a new agent
    ///
    /// # Arguments
    ///
    /// * `estimator` - Value representation to learn
    /// * `epsilon` - Exploitation threshold for the ε-threshold policy
    /// * `num_training` - Episodes after which learning stops
    pub fn new(estimator: Estimator<E>, epsilon: f64, num_training: usize) -> Self {
        Self {
            estimator,
            epsilon,
            num_training,
            episodes_so_far: 0,
            episode_rewards: 0.0,
            accum_train_rewards: 0.0,
            accum_test_rewards: 0.0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.set_rng_seed(seed);
        self
    }

    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }

    pub fn estimator(&self) -> &Estimator<E> {
        &self.estimator
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn num_training(&self) -> usize {
        self.num_training
    }

    pub fn episodes_so_far(&self) -> usize {
        self.episodes_so_far
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes_so_far < self.num_training
    }

    pub fn is_in_testing(&self) -> bool {
        !self.is_in_training()
    }

    /// Pick the next action, or `None` at a terminal state.
    ///
    /// During training this is the ε-threshold policy; afterwards it is
    /// purely greedy and ε is ignored. Passing ε = 0 to the policy would not
    /// do the same thing: under the `r > ε` rule that explores on every draw.
    pub fn get_action(&mut self, env: &E, state: &E::State) -> Option<Direction> {
        if self.is_in_training() {
            policy::choose_action(&self.estimator, env, state, self.epsilon, &mut self.rng)
        } else {
            self.estimator.best_action(env, state)
        }
    }

    pub fn start_episode(&mut self) {
        self.episode_rewards = 0.0;
    }

    /// Record a transition the harness has already applied.
    ///
    /// Updates the estimator only while training.
    pub fn observe_transition(
        &mut self,
        env: &E,
        state: &E::State,
        action: Direction,
        next_state: &E::State,
        reward: f64,
    ) {
        self.episode_rewards += reward;
        if self.is_in_training() {
            self.estimator
                .observe(env, Transition::new(state, action, next_state, reward));
        }
    }

    /// Close the current episode.
    ///
    /// Returns the final weight vector exactly once, on the episode that
    /// completes training, for linear agents.
    pub fn final_episode(&mut self) -> Option<BTreeMap<String, f64>> {
        if self.is_in_training() {
            self.accum_train_rewards += self.episode_rewards;
        } else {
            self.accum_test_rewards += self.episode_rewards;
        }
        self.episodes_so_far += 1;

        if self.episodes_so_far == self.num_training {
            self.estimator.sorted_weights()
        } else {
            None
        }
    }

    /// Rewards collected in the episode in progress
    pub fn episode_rewards(&self) -> f64 {
        self.episode_rewards
    }

    /// Mean episode reward over the training episodes played so far
    pub fn average_training_reward(&self) -> f64 {
        let episodes = self.episodes_so_far.min(self.num_training);
        if episodes == 0 {
            0.0
        } else {
            self.accum_train_rewards / episodes as f64
        }
    }

    /// Mean episode reward over the test episodes played so far
    pub fn average_test_reward(&self) -> f64 {
        let episodes = self.episodes_so_far.saturating_sub(self.num_training);
        if episodes == 0 {
            0.0
        } else {
            self.accum_test_rewards / episodes as f64
        }
    }

    /// Forget everything learned and restart the episode count.
    pub fn reset(&mut self) {
        self.estimator.reset();
        self.episodes_so_far = 0;
        self.episode_rewards = 0.0;
        self.accum_train_rewards = 0.0;
        self.accum_test_rewards = 0.0;
        self.rng = build_rng(self.rng_seed);
    }
}
