//! Ports (trait boundaries) for external dependencies.
//!
//! The learning core owns these traits. Environments, feature extractors,
//! and training observers are adapters that implement them.

pub mod environment;
pub mod features;
pub mod observer;
pub mod value_source;

pub use environment::{Environment, GridTopology, Simulator};
pub use features::{FeatureExtractor, FeatureVector};
pub use observer::{EpisodeOutcome, EpisodeReport, Observer};
pub use value_source::{Transition, ValueSource};
