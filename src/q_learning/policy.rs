//! ε-threshold action selection over any [`ValueSource`].
//!
//! A uniform draw `r` in [0, 1) is compared against ε. When `r > ε` the
//! agent picks a uniformly random legal action; otherwise it acts greedily.
//! ε is therefore the probability of *exploiting*: ε = 1 is fully greedy
//! and ε = 0 is (almost surely) fully random.

use rand::{Rng, seq::IndexedRandom};

use crate::{
    ports::{Environment, ValueSource},
    types::Direction,
};

/// Draw `r` from `rng` and select an action. `None` at terminal states.
pub fn choose_action<E, V, R>(
    source: &V,
    env: &E,
    state: &E::State,
    epsilon: f64,
    rng: &mut R,
) -> Option<Direction>
where
    E: Environment,
    V: ValueSource<E> + ?Sized,
    R: Rng + ?Sized,
{
    let draw: f64 = rng.random();
    choose_action_with_draw(source, env, state, epsilon, draw, rng)
}

/// Select an action for a given draw. `rng` is only used for the random branch.
pub fn choose_action_with_draw<E, V, R>(
    source: &V,
    env: &E,
    state: &E::State,
    epsilon: f64,
    draw: f64,
    rng: &mut R,
) -> Option<Direction>
where
    E: Environment,
    V: ValueSource<E> + ?Sized,
    R: Rng + ?Sized,
{
    let legal_actions = env.legal_actions(state);
    if legal_actions.is_empty() {
        return None;
    }

    if draw > epsilon {
        legal_actions.choose(rng).copied()
    } else {
        source.best_action(env, state)
    }
}
