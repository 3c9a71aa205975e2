//! gridq CLI - Train Q-learning agents on grid-world layouts
//!
//! Learners:
//! - `tabular`: exact (position, next position) Q-table
//! - `approximate`: linear weights over extracted features

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gridq")]
#[command(version, about = "Q-learning agents for grid-world games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a learner, then play greedy test episodes
    Train(Box<gridq::cli::commands::train::TrainArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => gridq::cli::commands::train::execute(*args),
    }
}
