//! CLI infrastructure for training grid-world Q-learning agents

pub mod commands;
pub mod output;
