//! Value source port - the shared capability of every Q-value representation.
//!
//! Both the exact tabular store and the linear feature estimator answer the
//! same four questions. The greedy scans are provided here so the two
//! representations share one tie-break policy.

use crate::{ports::Environment, types::Direction};

/// One completed environment transition, handed to [`ValueSource::observe`]
/// exactly once and never retained.
#[derive(Debug)]
pub struct Transition<'a, S> {
    pub state: &'a S,
    pub action: Direction,
    pub next_state: &'a S,
    pub reward: f64,
}

impl<'a, S> Transition<'a, S> {
    pub fn new(state: &'a S, action: Direction, next_state: &'a S, reward: f64) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }
}

// Manual impls: derive would demand `S: Clone`.
impl<S> Clone for Transition<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Transition<'_, S> {}

/// Q-value capability shared by the tabular and linear representations.
pub trait ValueSource<E: Environment> {
    /// Q(state, action). Never fails; unseen entries are 0.0.
    fn value(&self, env: &E, state: &E::State, action: Direction) -> f64;

    /// Apply one TD update for a completed transition.
    fn observe(&mut self, env: &E, transition: Transition<'_, E::State>);

    /// Maximum Q over the legal actions of `state`, or 0.0 when there are none.
    fn best_value(&self, env: &E, state: &E::State) -> f64 {
        scan_best(self, env, state).map_or(0.0, |(_, value)| value)
    }

    /// First legal action (in enumeration order) attaining the maximum Q,
    /// or `None` when there are no legal actions.
    fn best_action(&self, env: &E, state: &E::State) -> Option<Direction> {
        scan_best(self, env, state).map(|(action, _)| action)
    }
}

/// Greedy scan over legal actions. Only a strictly greater value replaces
/// the incumbent, so ties go to the earliest action.
fn scan_best<E, V>(source: &V, env: &E, state: &E::State) -> Option<(Direction, f64)>
where
    E: Environment,
    V: ValueSource<E> + ?Sized,
{
    let mut best: Option<(Direction, f64)> = None;
    for action in env.legal_actions(state) {
        let value = source.value(env, state, action);
        match best {
            Some((_, incumbent)) if value <= incumbent => {}
            _ => best = Some((action, value)),
        }
    }
    best
}
