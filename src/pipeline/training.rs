//! Episode loop driving an agent through a simulator

use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeOutcome, EpisodeReport, Observer, Simulator},
    q_learning::QLearningAgent,
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Total episodes to play, training and testing combined
    pub num_episodes: usize,

    /// Episodes are cut off after this many actions
    pub max_steps: usize,

    /// Random seed for the agent and the environment
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 100,
            max_steps: 1_000,
            seed: None,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_episodes: usize,

    /// Episodes played while the agent was learning
    pub training_episodes: usize,

    pub wins: usize,

    pub losses: usize,

    /// Episodes that hit the step limit
    pub truncated: usize,

    /// Wins among the post-training episodes
    pub test_wins: usize,

    pub win_rate: f64,

    /// Win rate over the post-training episodes (0 if there were none)
    pub test_win_rate: f64,

    pub average_training_reward: f64,

    pub average_test_reward: f64,

    /// Learned parameters at the end of the run
    pub parameters: usize,

    /// Weight vector captured when training completed (linear agents)
    pub final_weights: Option<BTreeMap<String, f64>>,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create training result {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open training result {}", path.display()),
            source,
        })?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Training pipeline for a single agent in a simulated environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Play `num_episodes` episodes.
    ///
    /// Each step asks the agent for an action, applies it, and hands the
    /// agent the score delta as its reward. The agent decides for itself
    /// whether it is still learning.
    pub fn run<S: Simulator>(
        &mut self,
        agent: &mut QLearningAgent<S>,
        simulator: &S,
    ) -> Result<TrainingResult> {
        let mut rng = match self.config.seed {
            Some(seed) => {
                agent.set_rng_seed(seed);
                StdRng::seed_from_u64(seed.wrapping_add(1))
            }
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut wins = 0;
        let mut losses = 0;
        let mut truncated = 0;
        let mut test_wins = 0;
        let mut training_episodes = 0;
        let mut final_weights = None;

        for observer in &mut self.observers {
            observer.on_training_start(self.config.num_episodes)?;
        }

        for episode in 0..self.config.num_episodes {
            let training = agent.is_in_training();
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            agent.start_episode();
            let mut state = simulator.initial_state();
            let mut steps = 0;

            while steps < self.config.max_steps {
                let Some(action) = agent.get_action(simulator, &state) else {
                    break;
                };
                let next_state = simulator.apply(&state, action, &mut rng)?;
                let reward = simulator.score(&next_state) - simulator.score(&state);
                agent.observe_transition(simulator, &state, action, &next_state, reward);

                for observer in &mut self.observers {
                    observer.on_step(episode, steps, action, reward)?;
                }

                state = next_state;
                steps += 1;
            }

            let outcome = if simulator.is_win(&state) {
                EpisodeOutcome::Win
            } else if simulator.is_lose(&state) {
                EpisodeOutcome::Loss
            } else {
                EpisodeOutcome::Truncated
            };
            match outcome {
                EpisodeOutcome::Win => wins += 1,
                EpisodeOutcome::Loss => losses += 1,
                EpisodeOutcome::Truncated => truncated += 1,
            }
            if training {
                training_episodes += 1;
            } else if outcome == EpisodeOutcome::Win {
                test_wins += 1;
            }

            let report = EpisodeReport {
                episode,
                outcome,
                steps,
                total_reward: agent.episode_rewards(),
                score: simulator.score(&state),
                training,
            };

            if let Some(weights) = agent.final_episode() {
                for observer in &mut self.observers {
                    observer.on_training_complete(&weights)?;
                }
                final_weights = Some(weights);
            }

            for observer in &mut self.observers {
                observer.on_episode_end(&report)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let total_episodes = self.config.num_episodes;
        Ok(TrainingResult {
            total_episodes,
            training_episodes,
            wins,
            losses,
            truncated,
            test_wins,
            win_rate: rate(wins, total_episodes),
            test_win_rate: rate(test_wins, total_episodes - training_episodes),
            average_training_reward: agent.average_training_reward(),
            average_test_reward: agent.average_test_reward(),
            parameters: agent.estimator().size(),
            final_weights,
        })
    }
}
