//! Feature extractor port - sparse (state, action) summaries for linear
//! value estimation.

use std::collections::HashMap;

use crate::{ports::Environment, types::Direction};

/// Sparse feature vector: feature name -> value. Absent names are zero.
pub type FeatureVector = HashMap<String, f64>;

/// Maps a (state, action) pair to a sparse feature vector.
pub trait FeatureExtractor<E: Environment> {
    fn extract(&self, env: &E, state: &E::State, action: Direction) -> FeatureVector;

    /// Short identifier used in logs and summaries.
    fn name(&self) -> &str;
}
