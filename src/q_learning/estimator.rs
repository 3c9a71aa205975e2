//! Representation chosen at construction: exact table or linear features.

use std::collections::BTreeMap;

use crate::{
    ports::{Environment, Transition, ValueSource},
    q_learning::{linear::LinearEstimator, q_table::QTable},
    types::Direction,
};

#[derive(Debug)]
pub enum Estimator<E: Environment> {
    Tabular(QTable),
    Linear(LinearEstimator<E>),
}

impl<E: Environment> Estimator<E> {
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::Tabular(_) => "tabular",
            Estimator::Linear(_) => "linear",
        }
    }

    /// Number of learned parameters (table entries or weights).
    pub fn size(&self) -> usize {
        match self {
            Estimator::Tabular(table) => table.size(),
            Estimator::Linear(linear) => linear.weights().len(),
        }
    }

    /// Weight vector ordered by feature name; `None` for the table.
    pub fn sorted_weights(&self) -> Option<BTreeMap<String, f64>> {
        match self {
            Estimator::Tabular(_) => None,
            Estimator::Linear(linear) => Some(linear.sorted_weights()),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Estimator::Tabular(table) => table.reset(),
            Estimator::Linear(linear) => linear.reset(),
        }
    }
}

impl<E: Environment> ValueSource<E> for Estimator<E> {
    fn value(&self, env: &E, state: &E::State, action: Direction) -> f64 {
        match self {
            Estimator::Tabular(table) => table.value(env, state, action),
            Estimator::Linear(linear) => linear.value(env, state, action),
        }
    }

    fn observe(&mut self, env: &E, transition: Transition<'_, E::State>) {
        match self {
            Estimator::Tabular(table) => table.observe(env, transition),
            Estimator::Linear(linear) => linear.observe(env, transition),
        }
    }
}
