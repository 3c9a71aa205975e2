//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Result, types::Direction};

/// How an episode finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    Win,
    Loss,
    /// Step limit reached before a terminal state.
    Truncated,
}

/// Summary of a finished episode, passed to [`Observer::on_episode_end`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Episode index (0-based)
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    /// Number of actions taken
    pub steps: usize,
    /// Sum of environment rewards observed during the episode
    pub total_reward: f64,
    /// Final game score
    pub score: f64,
    /// Whether the agent was still learning during this episode
    pub training: bool,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each action taken
///    - `on_episode_end(report)`
/// 3. `on_training_complete(weights)` - When the agent finishes its training
///    episodes (linear agents only)
/// 4. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use gridq::ports::{EpisodeReport, Observer};
///
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl Observer for WinCounter {
///     fn on_episode_end(&mut self, report: &EpisodeReport) -> gridq::Result<()> {
///         if report.outcome == gridq::ports::EpisodeOutcome::Win {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// Does nothing by default.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    ///
    /// Does nothing by default.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each transition has been applied and observed.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Step number within the episode (0-based)
    /// * `action` - Action the agent took
    /// * `reward` - Environment reward for the transition
    fn on_step(
        &mut self,
        _episode: usize,
        _step: usize,
        _action: Direction,
        _reward: f64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called once when the agent completes its last training episode.
    ///
    /// Linear agents pass their final weight vector, sorted by feature name.
    fn on_training_complete(&mut self, _weights: &BTreeMap<String, f64>) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
