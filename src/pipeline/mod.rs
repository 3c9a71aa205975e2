//! Training pipeline abstractions
//!
//! This module provides:
//! - The episode loop that drives an agent through a simulator
//! - Observers recording progress, metrics, and JSONL logs

pub mod observers;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
