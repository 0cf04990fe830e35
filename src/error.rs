use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the evaluation harness
#[derive(Error, Debug)]
pub enum EvalError {
    // Checkpoint selection errors
    #[error("no usable checkpoint: training log {path} has no metric lines")]
    NoValidCheckpoint { path: PathBuf },

    #[error("malformed metric line {line_no} in {path}: {content:?}")]
    MalformedLogLine {
        path: PathBuf,
        line_no: usize,
        content: String,
    },

    // Checkpoint loading errors
    #[error("checkpoint not found: {path}")]
    CheckpointNotFound { path: PathBuf },

    #[error("failed to load checkpoint {path}: {reason}")]
    CheckpointLoad { path: PathBuf, reason: String },

    // Timing errors
    #[error("monotonic clock produced a negative solve time for graph {graph_index}")]
    MeasurementFault { graph_index: usize },

    // Input corpus errors
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    // Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no solver capability in this build: enable the `onnx` feature or embed the library with your own solver")]
    NoSolverCapability,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for EvalError
pub type Result<T> = std::result::Result<T, EvalError>;

/// Per-graph failure kinds. Absorbed at the batch-evaluator boundary:
/// the offending graph is recorded as unsuccessful and the run continues.
#[derive(Error, Debug, Clone)]
pub enum GraphFailure {
    #[error("insert failed: {0}")]
    Insert(String),

    #[error("solve failed: {0}")]
    Solve(String),

    #[error("solve timed out after {limit:?}")]
    Timeout { limit: Duration },
}

/// Errors from the graph corpus loader
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus {path} is not a valid graph collection: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corpus record {index}: {reason}")]
    Record { index: usize, reason: String },
}
