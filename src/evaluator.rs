//! Batch evaluation loop.
//!
//! Drives the solver over a sequence of graphs, measures per-graph solve
//! time, accumulates running totals, and streams records to the report
//! writer. Per-graph failures are absorbed here; only startup-class
//! problems and clock faults abort a run.

use std::time::Duration;

use tracing::{info, warn};

use crate::checkpoint::CheckpointRef;
use crate::config::EvalConfig;
use crate::corpus;
use crate::domain::{Graph, RunSummary, SolutionRecord};
use crate::error::{EvalError, Result};
use crate::metric_log::{select_best_iteration, training_log_path};
use crate::report::ReportWriter;
use crate::solver::{SolverCapability, SolverClient};

/// Drives one evaluation run. Graphs are consumed strictly in arrival
/// order; the index handed to the solver client is the same index used in
/// the report and the result file. The loop is not restartable: each index
/// is consumed exactly once against the live solver state.
pub struct BatchEvaluator<S: SolverCapability> {
    client: SolverClient<S>,
    solve_timeout: Option<Duration>,
}

impl<S: SolverCapability> BatchEvaluator<S> {
    pub fn new(client: SolverClient<S>, solve_timeout: Option<Duration>) -> Self {
        Self {
            client,
            solve_timeout,
        }
    }

    /// Evaluate every graph in `graphs`, appending per-graph records to
    /// `report` as they are produced.
    pub async fn run<I>(&mut self, graphs: I, report: &mut ReportWriter) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Graph>,
    {
        let mut summary = RunSummary::default();

        for (index, graph) in graphs.into_iter().enumerate() {
            info!(
                graph = index + 1,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "processing graph"
            );

            if let Err(failure) = self.client.insert(&graph, index).await {
                warn!(graph = index + 1, %failure, "graph skipped");
                summary.record_failure();
                report.append_failure(index, &graph, &failure)?;
                continue;
            }

            let solved = match self
                .client
                .solve(index, graph.node_count(), self.solve_timeout)
                .await
            {
                Ok(solved) => solved,
                Err(failure) => {
                    warn!(graph = index + 1, %failure, "graph skipped");
                    summary.record_failure();
                    report.append_failure(index, &graph, &failure)?;
                    continue;
                }
            };

            // A monotonic clock cannot run backwards; if the delta is
            // unordered the measurement layer is broken and every timing in
            // the run is suspect.
            let elapsed = solved
                .finished
                .checked_duration_since(solved.started)
                .ok_or(EvalError::MeasurementFault { graph_index: index })?;

            let record = SolutionRecord {
                graph_index: index,
                objective_value: solved.objective,
                selected_nodes: solved.selected_nodes,
                solve_time: elapsed.as_secs_f64(),
            };

            info!(
                graph = index + 1,
                objective = record.objective_value,
                selected = record.selected_nodes.len(),
                solve_time = record.solve_time,
                "graph solved"
            );

            summary.record_success(record.objective_value, record.solve_time);
            report.append_success(&graph, &record)?;
        }

        report.append_summary(&summary)?;
        info!(
            total = summary.total_graphs,
            successful = summary.successful_count,
            average_objective = summary.average_objective(),
            average_time = summary.average_time(),
            "evaluation complete"
        );
        Ok(summary)
    }
}

/// Full pipeline: pick the best checkpoint from the training log, load it
/// into `capability`, evaluate the configured corpus, and write the report
/// and result files into the output directory.
pub async fn run_evaluation<S: SolverCapability>(
    cfg: &EvalConfig,
    capability: S,
) -> Result<RunSummary> {
    if let Err(problems) = cfg.validate() {
        return Err(EvalError::InvalidConfig(problems.join("; ")));
    }

    let log_path = training_log_path(&cfg.save_dir, cfg.min_size, cfg.max_size);
    let best = select_best_iteration(&log_path, cfg.task.direction())?;
    info!(
        iteration = best.iteration,
        metric = best.metric,
        "using best-validated checkpoint"
    );

    let checkpoint =
        CheckpointRef::new(&cfg.save_dir, cfg.min_size, cfg.max_size, best.iteration).resolve();

    let mut client = SolverClient::new(capability);
    client.load(&checkpoint).await?;

    let mut graphs = corpus::load_graphs(&cfg.data, cfg.task)?;
    if let Some(cap) = cfg.max_graphs {
        graphs.truncate(cap);
    }

    let dataset = cfg
        .data
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("corpus")
        .to_string();
    std::fs::create_dir_all(cfg.output_dir())?;
    let (report_path, result_path) = ReportWriter::default_paths(cfg.task, &dataset, cfg.output_dir());
    let mut report = ReportWriter::create(cfg.task, &dataset, &report_path, &result_path)?;
    info!(
        report = %report_path.display(),
        results = %result_path.display(),
        "writing run artifacts"
    );

    let timeout = cfg.solve_timeout_secs.map(Duration::from_secs);
    let mut evaluator = BatchEvaluator::new(client, timeout);
    evaluator.run(graphs, &mut report).await
}
