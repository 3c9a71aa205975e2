//! Tabular and linear-approximation Q-learning for grid-world games
//!
//! This crate provides:
//! - Ports describing what the agent needs from an environment
//! - A tabular Q-store and a linear feature-weight estimator behind one
//!   `ValueSource` capability
//! - ε-threshold action selection, TD updates, and a shaped reward
//! - A small reference grid world, a training pipeline, and a CLI

pub mod app;
pub mod cli;
pub mod error;
pub mod features;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use types::{Direction, Position};
