//! Linear Q-value approximation over named features.
//!
//! Q(s, a) = Σ_f w_f · f(s, a)
//!
//! The weight vector starts empty and grows lazily: a feature name gets a
//! weight the first time an update touches it. Until then it counts as 0.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use crate::{
    ports::{Environment, FeatureExtractor, FeatureVector, Transition, ValueSource},
    types::Direction,
};

/// Learned weights, keyed by feature name.
pub type WeightVector = HashMap<String, f64>;

/// Linear value estimator driven by a feature extractor.
pub struct LinearEstimator<E: Environment> {
    weights: WeightVector,
    extractor: Box<dyn FeatureExtractor<E>>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl<E: Environment> LinearEstimator<E> {
    pub fn new(
        extractor: Box<dyn FeatureExtractor<E>>,
        learning_rate: f64,
        discount_factor: f64,
    ) -> Self {
        Self {
            weights: WeightVector::new(),
            extractor,
            learning_rate,
            discount_factor,
        }
    }

    /// Weight for a feature name; 0.0 if it has never been updated.
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// Weights ordered by feature name, for reports and logs.
    pub fn sorted_weights(&self) -> BTreeMap<String, f64> {
        self.weights
            .iter()
            .map(|(name, weight)| (name.clone(), *weight))
            .collect()
    }

    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    pub fn reset(&mut self) {
        self.weights.clear();
    }

    fn dot(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .map(|(name, value)| self.weight(name) * value)
            .sum()
    }
}

impl<E: Environment> ValueSource<E> for LinearEstimator<E> {
    fn value(&self, env: &E, state: &E::State, action: Direction) -> f64 {
        self.dot(&self.extractor.extract(env, state, action))
    }

    /// w_f ← w_f + α · δ · f(s, a), with
    /// δ = r + γ · max_a' Q(s', a') − Q(s, a) and the max taken as 0 at terminal s'.
    fn observe(&mut self, env: &E, transition: Transition<'_, E::State>) {
        let features = self
            .extractor
            .extract(env, transition.state, transition.action);

        let next_value = if env.is_terminal(transition.next_state) {
            0.0
        } else {
            self.best_value(env, transition.next_state)
        };
        let target = transition.reward + self.discount_factor * next_value;
        let delta = target - self.dot(&features);

        for (name, value) in features {
            *self.weights.entry(name).or_insert(0.0) += self.learning_rate * delta * value;
        }
    }
}

impl<E: Environment> fmt::Debug for LinearEstimator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearEstimator")
            .field("extractor", &self.extractor.name())
            .field("weights", &self.weights)
            .field("learning_rate", &self.learning_rate)
            .field("discount_factor", &self.discount_factor)
            .finish()
    }
}
