//! Train command - Train a tabular or approximate Q-learning agent

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    app::{AgentConfig, Representation},
    cli::output::{print_kv, print_section},
    features::ExtractorKind,
    gridworld::{GridWorld, Layout},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, TrainingConfig,
        TrainingPipeline, TrainingResult,
    },
    q_learning::{Bootstrap, Estimator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LearnerType {
    /// Exact (position, next position) Q-table
    Tabular,
    /// Linear weights over extracted features
    Approximate,
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Type of learner to train
    #[arg(value_enum)]
    pub learner: LearnerType,

    /// Built-in layout (tiny, small, medium)
    #[arg(long, short = 'l', default_value = "small")]
    pub layout: String,

    /// Layout file; overrides --layout
    #[arg(long)]
    pub layout_file: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'x', default_value_t = 100)]
    pub training: usize,

    /// Number of greedy test episodes after training
    #[arg(long, short = 't', default_value_t = 10)]
    pub test: usize,

    /// Step limit per episode
    #[arg(long, default_value_t = 500)]
    pub max_steps: usize,

    /// JSON agent configuration; flags below override it
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Exploitation threshold (random action when draw > epsilon)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Feature extractor for the approximate learner (identity or simple)
    #[arg(long)]
    pub extractor: Option<String>,

    /// Tabular bootstrap state (current or successor)
    #[arg(long)]
    pub bootstrap: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional file for JSONL episode records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for writing the final weight vector as JSON
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    learner: &'static str,
    layout: String,
    config: &'a AgentConfig,
    result: &'a TrainingResult,
    metrics: &'a MetricsSummary,
}

pub(crate) fn parse_extractor(value: &str) -> Result<ExtractorKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "identity" | "id" => Ok(ExtractorKind::Identity),
        "simple" => Ok(ExtractorKind::Simple),
        other => Err(anyhow!(
            "Invalid extractor '{other}' (expected 'identity' or 'simple')"
        )),
    }
}

pub(crate) fn parse_bootstrap(value: &str) -> Result<Bootstrap> {
    match value.trim().to_ascii_lowercase().as_str() {
        "current" => Ok(Bootstrap::Current),
        "successor" | "next" => Ok(Bootstrap::Successor),
        other => Err(anyhow!(
            "Invalid bootstrap '{other}' (expected 'current' or 'successor')"
        )),
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn build_config(args: &TrainArgs) -> Result<AgentConfig> {
    let mut config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AgentConfig::default(),
    };

    config.representation = match (args.learner, &args.extractor) {
        (LearnerType::Tabular, _) => Representation::Tabular,
        (LearnerType::Approximate, Some(name)) => Representation::Linear {
            extractor: parse_extractor(name)?,
        },
        (LearnerType::Approximate, None) => match config.representation {
            linear @ Representation::Linear { .. } => linear,
            Representation::Tabular => Representation::Linear {
                extractor: ExtractorKind::default(),
            },
        },
    };

    if let Some(epsilon) = args.epsilon {
        config = config.with_epsilon(epsilon);
    }
    if let Some(alpha) = args.alpha {
        config = config.with_alpha(alpha);
    }
    if let Some(gamma) = args.gamma {
        config = config.with_gamma(gamma);
    }
    if let Some(ref bootstrap) = args.bootstrap {
        config = config.with_bootstrap(parse_bootstrap(bootstrap)?);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config = config.with_num_training(args.training);

    config.validate()?;
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = build_config(&args)?;

    let (layout, layout_name) = match &args.layout_file {
        Some(path) => (Layout::load(path)?, path.display().to_string()),
        None => (Layout::builtin(&args.layout)?, args.layout.clone()),
    };
    let world = GridWorld::new(layout);
    let mut agent = config.build_agent::<GridWorld>()?;

    let summary_path = args.summary.as_deref().map(sanitize_summary_path);

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        num_episodes: args.training + args.test,
        max_steps: args.max_steps,
        seed: config.seed,
    });
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    pipeline = pipeline.with_observer(Box::new(Arc::clone(&metrics)));
    if let Some(ref path) = args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    if args.verbose {
        eprintln!(
            "Training {} agent on '{layout_name}' for {} episodes (+{} test), epsilon {}",
            agent.estimator().name(),
            agent.num_training(),
            args.test,
            agent.epsilon()
        );
    }

    let result = pipeline.run(&mut agent, &world)?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();

    print_section("Training Complete");
    print_kv("Learner", agent.estimator().name());
    if let Estimator::Linear(linear) = agent.estimator() {
        print_kv("Features", linear.extractor_name());
    }
    print_kv("Layout", &layout_name);
    print_kv("Episodes", &metrics.episodes.to_string());
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", metrics.wins, metrics.win_rate * 100.0),
    );
    print_kv("Losses", &metrics.losses.to_string());
    print_kv("Truncated", &metrics.truncated.to_string());
    print_kv(
        "Avg length",
        &format!("{:.1} steps", metrics.avg_episode_length),
    );
    print_kv("Avg reward", &format!("{:.2}", metrics.avg_reward));
    print_kv(
        "Avg train reward",
        &format!("{:.2}", result.average_training_reward),
    );
    print_kv(
        "Avg test reward",
        &format!("{:.2}", result.average_test_reward),
    );
    print_kv(
        "Test wins",
        &format!("{} ({:.1}%)", result.test_wins, result.test_win_rate * 100.0),
    );
    print_kv("Parameters", &result.parameters.to_string());

    if let (true, Some(weights)) = (args.verbose, &result.final_weights) {
        print_section("Final Weights");
        for (feature, weight) in weights {
            print_kv(feature, &format!("{weight:.4}"));
        }
    }

    if let Some(ref path) = args.weights {
        match result.final_weights {
            Some(ref weights) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                serde_json::to_writer_pretty(file, weights)?;
            }
            None => eprintln!(
                "Warning: no weight vector to write (tabular learner or training never completed)"
            ),
        }
    }

    if let Some(path) = summary_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            learner: agent.estimator().name(),
            layout: layout_name,
            config: &config,
            result: &result,
            metrics: &metrics,
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        if args.verbose {
            eprintln!("Summary written to {}", path.display());
        }
    }

    Ok(())
}
