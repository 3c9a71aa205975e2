//! Configuration types for agent creation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    features::ExtractorKind,
    ports::{Environment, GridTopology},
    q_learning::{Bootstrap, Estimator, LinearEstimator, QLearningAgent, QTable, RewardSchedule},
};

/// Value representation learned by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Representation {
    /// Exact (position, next position) table
    #[default]
    Tabular,
    /// Linear function of extracted features
    Linear { extractor: ExtractorKind },
}

/// Configuration for creating a Q-learning agent.
///
/// # Examples
///
/// ```
/// use gridq::app::{AgentConfig, Representation};
/// use gridq::features::ExtractorKind;
///
/// let config = AgentConfig::default()
///     .with_alpha(0.5)
///     .with_num_training(200)
///     .with_representation(Representation::Linear {
///         extractor: ExtractorKind::Simple,
///     })
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exploitation threshold in [0, 1]
    pub epsilon: f64,
    /// Learning rate, > 0
    pub alpha: f64,
    /// Discount factor in [0, 1]
    pub gamma: f64,
    /// Episodes of learning before the agent switches to greedy play
    pub num_training: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    pub representation: Representation,
    /// Bootstrap state for the tabular update
    pub bootstrap: Bootstrap,
    /// Shaped rewards for the tabular update
    pub rewards: RewardSchedule,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            alpha: 0.2,
            gamma: 0.8,
            num_training: 0,
            seed: None,
            representation: Representation::default(),
            bootstrap: Bootstrap::default(),
            rewards: RewardSchedule::default(),
        }
    }
}

impl AgentConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_num_training(mut self, episodes: usize) -> Self {
        self.num_training = episodes;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(invalid(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(invalid(format!(
                "alpha must be positive and finite, got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(invalid(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Build a fresh agent for a grid environment.
    pub fn build_agent<E>(&self) -> Result<QLearningAgent<E>>
    where
        E: Environment + GridTopology,
    {
        self.validate()?;

        let estimator = match self.representation {
            Representation::Tabular => {
                Estimator::Tabular(QTable::new(self.alpha, self.bootstrap, self.rewards))
            }
            Representation::Linear { extractor } => Estimator::Linear(LinearEstimator::new(
                extractor.build::<E>(),
                self.alpha,
                self.gamma,
            )),
        };

        let agent = QLearningAgent::new(estimator, self.epsilon, self.num_training);
        Ok(match self.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}
