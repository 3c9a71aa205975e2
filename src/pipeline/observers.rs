//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the episode loop to specific output formats.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeOutcome, EpisodeReport, Observer},
    types::Direction,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("W:{} L:{}", self.wins, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        match report.outcome {
            EpisodeOutcome::Win => self.wins += 1,
            EpisodeOutcome::Loss => self.losses += 1,
            EpisodeOutcome::Truncated => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_complete(&mut self, weights: &BTreeMap<String, f64>) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.println(format!("Training complete, {} weights learned", weights.len()));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    wins: usize,
    losses: usize,
    truncated: usize,
    steps: Vec<usize>,
    rewards: Vec<f64>,
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub losses: usize,
    pub truncated: usize,
    pub win_rate: f64,
    pub avg_episode_length: f64,
    pub avg_reward: f64,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    /// Mean total reward over the last `window` episodes
    pub fn recent_reward(&self, window: usize) -> f64 {
        let start = self.rewards.len().saturating_sub(window);
        let recent = &self.rewards[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let avg_episode_length = if self.steps.is_empty() {
            0.0
        } else {
            self.steps.iter().sum::<usize>() as f64 / self.steps.len() as f64
        };
        MetricsSummary {
            episodes: self.episodes,
            wins: self.wins,
            losses: self.losses,
            truncated: self.truncated,
            win_rate: self.win_rate(),
            avg_episode_length,
            avg_reward: self.recent_reward(self.rewards.len()),
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.episodes += 1;
        match report.outcome {
            EpisodeOutcome::Win => self.wins += 1,
            EpisodeOutcome::Loss => self.losses += 1,
            EpisodeOutcome::Truncated => self.truncated += 1,
        }
        self.steps.push(report.steps);
        self.rewards.push(report.total_reward);
        Ok(())
    }
}

fn lock<O>(shared: &Mutex<O>) -> MutexGuard<'_, O> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A shared observer forwards every event to the inner one, so the caller
/// can keep a handle and read it back after the pipeline is done.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        lock(self).on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        lock(self).on_episode_start(episode)
    }

    fn on_step(
        &mut self,
        episode: usize,
        step: usize,
        action: Direction,
        reward: f64,
    ) -> Result<()> {
        lock(self).on_step(episode, step, action, reward)
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        lock(self).on_episode_end(report)
    }

    fn on_training_complete(&mut self, weights: &BTreeMap<String, f64>) -> Result<()> {
        lock(self).on_training_complete(weights)
    }

    fn on_training_end(&mut self) -> Result<()> {
        lock(self).on_training_end()
    }
}

#[derive(Serialize)]
struct WeightsRecord<'a> {
    final_weights: &'a BTreeMap<String, f64>,
}

/// JSONL observer - one JSON object per finished episode
///
/// When a linear agent completes training, an extra `{"final_weights": ...}`
/// line is written before that episode's record.
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observations file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn write_line<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(&mut self.writer).map_err(|source| Error::Io {
            operation: "write observation record".to_string(),
            source,
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.write_line(report)
    }

    fn on_training_complete(&mut self, weights: &BTreeMap<String, f64>) -> Result<()> {
        self.write_line(&WeightsRecord {
            final_weights: weights,
        })
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Io {
            operation: "flush observations file".to_string(),
            source,
        })
    }
}
