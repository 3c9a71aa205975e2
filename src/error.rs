//! Error types for the gridq crate

use thiserror::Error;

use crate::types::{Direction, Position};

/// Main error type for the gridq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action {action} is not legal at position {position}")]
    IllegalAction {
        action: Direction,
        position: Position,
    },

    #[error("game already over")]
    GameOver,

    #[error("layout is empty")]
    EmptyLayout,

    #[error("layout row {row} has width {got}, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at row {row}, column {column} in layout")]
    InvalidLayoutCharacter {
        character: char,
        row: usize,
        column: usize,
    },

    #[error("layout has no agent start position ('P')")]
    MissingAgentStart,

    #[error("layout has {count} agent start positions, expected exactly one")]
    MultipleAgentStarts { count: usize },

    #[error("unknown layout '{name}'. Expected one of: {expected}")]
    UnknownLayout { name: String, expected: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
