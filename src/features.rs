//! Concrete feature extractors for the linear estimator.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{
    ports::{Environment, FeatureExtractor, FeatureVector, GridTopology},
    types::{Direction, Position},
};

/// Extractor selection, as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    #[default]
    Identity,
    Simple,
}

impl ExtractorKind {
    /// Boxed extractor for a grid environment.
    pub fn build<E>(self) -> Box<dyn FeatureExtractor<E>>
    where
        E: Environment + GridTopology,
    {
        match self {
            ExtractorKind::Identity => Box::new(IdentityExtractor),
            ExtractorKind::Simple => Box::new(SimpleExtractor),
        }
    }
}

/// One indicator feature per (agent position, action) pair.
///
/// A linear estimator over these features behaves like a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl IdentityExtractor {
    pub fn feature_name(position: Position, action: Direction) -> String {
        format!("{position}:{action}")
    }
}

impl<E: Environment> FeatureExtractor<E> for IdentityExtractor {
    fn extract(&self, env: &E, state: &E::State, action: Direction) -> FeatureVector {
        let name = Self::feature_name(env.agent_position(state), action);
        FeatureVector::from([(name, 1.0)])
    }

    fn name(&self) -> &str {
        "identity"
    }
}

pub const BIAS: &str = "bias";
pub const GHOSTS_ONE_STEP_AWAY: &str = "#-of-ghosts-1-step-away";
pub const EATS_FOOD: &str = "eats-food";
pub const CLOSEST_FOOD: &str = "closest-food";

/// Handful of general features that transfer across layouts:
///
/// - `bias`: always 1
/// - `#-of-ghosts-1-step-away`: ghosts that could step onto the square the
///   action leads to
/// - `eats-food`: the action eats food and no ghost is adjacent
/// - `closest-food`: maze distance to the nearest food, over grid area
///
/// Every value is divided by 10.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleExtractor;

impl<E> FeatureExtractor<E> for SimpleExtractor
where
    E: Environment + GridTopology,
{
    fn extract(&self, env: &E, state: &E::State, action: Direction) -> FeatureVector {
        let mut features = FeatureVector::new();
        features.insert(BIAS.to_string(), 1.0);

        let next = env.successor_position(env.agent_position(state), action);

        let ghosts_near = env
            .other_entity_positions(state)
            .into_iter()
            .filter(|ghost| env.legal_neighbors(*ghost).contains(&next))
            .count();
        features.insert(GHOSTS_ONE_STEP_AWAY.to_string(), ghosts_near as f64);

        if ghosts_near == 0 && env.has_food_at(state, next) {
            features.insert(EATS_FOOD.to_string(), 1.0);
        }

        if let Some(distance) = closest_food(env, state, next) {
            let area = (env.width() * env.height()).max(1) as f64;
            features.insert(CLOSEST_FOOD.to_string(), distance as f64 / area);
        }

        for value in features.values_mut() {
            *value /= 10.0;
        }
        features
    }

    fn name(&self) -> &str {
        "simple"
    }
}

/// Breadth-first maze distance from `start` to the nearest food.
fn closest_food<E>(env: &E, state: &E::State, start: Position) -> Option<usize>
where
    E: Environment + GridTopology,
{
    let limit = (env.width().max(0) * env.height().max(0)) as usize;
    let mut frontier = VecDeque::from([(start, 0usize)]);
    let mut expanded = HashSet::new();

    while let Some((position, distance)) = frontier.pop_front() {
        if !expanded.insert(position) {
            continue;
        }
        if env.has_food_at(state, position) {
            return Some(distance);
        }
        if expanded.len() > limit {
            break;
        }
        for neighbor in env.legal_neighbors(position) {
            frontier.push_back((neighbor, distance + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gridworld::{GridWorld, Layout},
        ports::Simulator,
    };

    fn world(text: &str) -> GridWorld {
        GridWorld::new(Layout::parse(text).unwrap())
    }

    #[test]
    fn test_identity_single_indicator() {
        let game = world("%%%%\n%P.%\n%%%%");
        let state = game.initial_state();
        let features = IdentityExtractor.extract(&game, &state, Direction::East);
        assert_eq!(features.len(), 1);
        assert_eq!(features.get("(1, 1):East"), Some(&1.0));
    }

    #[test]
    fn test_simple_eats_food_without_ghosts() {
        let game = world("%%%%%%\n%P. .%\n%%%%%%");
        let state = game.initial_state();
        let features = SimpleExtractor.extract(&game, &state, Direction::East);

        assert_eq!(features.get(BIAS), Some(&0.1));
        assert_eq!(features.get(GHOSTS_ONE_STEP_AWAY), Some(&0.0));
        assert_eq!(features.get(EATS_FOOD), Some(&0.1));
        // Food on the destination square: distance 0.
        assert_eq!(features.get(CLOSEST_FOOD), Some(&0.0));
    }

    #[test]
    fn test_simple_ghost_blocks_eats_food() {
        let game = world("%%%%%%\n%P.G.%\n%%%%%%");
        let state = game.initial_state();
        let features = SimpleExtractor.extract(&game, &state, Direction::East);

        assert_eq!(features.get(GHOSTS_ONE_STEP_AWAY), Some(&0.1));
        assert!(!features.contains_key(EATS_FOOD));
    }

    #[test]
    fn test_closest_food_distance_is_normalized() {
        let game = world("%%%%%%\n%P  .%\n%%%%%%");
        let state = game.initial_state();
        let features = SimpleExtractor.extract(&game, &state, Direction::Stop);

        // 3 steps away on an 18-cell grid, then divided by 10.
        let expected = 3.0 / 18.0 / 10.0;
        assert!((features[CLOSEST_FOOD] - expected).abs() < 1e-12);
    }
}
