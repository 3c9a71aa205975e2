//! Application layer: validated configuration and agent construction.

pub mod config;

pub use config::{AgentConfig, Representation};
