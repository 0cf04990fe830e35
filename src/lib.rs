pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod metric_log;
pub mod ml;
pub mod report;
pub mod solver;

pub use checkpoint::CheckpointRef;
pub use crate::config::{EvalConfig, LoggingConfig};
pub use domain::{Graph, ObjectiveDirection, RunSummary, SolutionRecord, TaskKind};
pub use error::{CorpusError, EvalError, GraphFailure, Result};
pub use evaluator::{run_evaluation, BatchEvaluator};
pub use metric_log::{select_best_iteration, training_log_path, BestIteration};
pub use report::ReportWriter;
pub use solver::{
    RawSolution, SolverCapability, SolverClient, SolverFault, SolverResult, TimedSolution,
};
