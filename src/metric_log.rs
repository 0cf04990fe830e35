//! Training-log scanning and best-iteration selection.
//!
//! Training emits one validation line per evaluation pass; this module
//! scans those lines and picks the iteration whose metric is extremal
//! for the task at hand.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::ObjectiveDirection;
use crate::error::{EvalError, Result};

/// Marker distinguishing validation-metric lines from other log output
const METRIC_MARKER: &str = "average";

/// Winning entry of a log scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestIteration {
    pub iteration: u64,
    pub metric: f64,
}

/// Training log location for a size range: `<base>/log-<min>-<max>.txt`
pub fn training_log_path(base_dir: &Path, min_size: u32, max_size: u32) -> PathBuf {
    base_dir.join(format!("log-{}-{}.txt", min_size, max_size))
}

/// Scan `log_path` and return the iteration with the best validation metric.
///
/// Metric lines contain the marker token; the second whitespace-separated
/// field is the iteration and the last field is the metric. Only a strictly
/// better metric replaces the incumbent, so ties keep the earliest iteration
/// seen. A later re-log of the same iteration replaces it only when strictly
/// better.
pub fn select_best_iteration(
    log_path: &Path,
    direction: ObjectiveDirection,
) -> Result<BestIteration> {
    let file = File::open(log_path)?;
    let reader = BufReader::new(file);

    let mut best: Option<BestIteration> = None;
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if !line.contains(METRIC_MARKER) {
            continue;
        }

        let (iteration, metric) =
            parse_metric_line(&line).ok_or_else(|| EvalError::MalformedLogLine {
                path: log_path.to_path_buf(),
                line_no: idx + 1,
                content: line.clone(),
            })?;

        let replace = match best {
            Some(incumbent) => direction.improves(metric, incumbent.metric),
            None => true,
        };
        if replace {
            best = Some(BestIteration { iteration, metric });
        }
    }

    let best = best.ok_or_else(|| EvalError::NoValidCheckpoint {
        path: log_path.to_path_buf(),
    })?;
    debug!(
        iteration = best.iteration,
        metric = best.metric,
        "selected best training iteration"
    );
    Ok(best)
}

fn parse_metric_line(line: &str) -> Option<(u64, f64)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let iteration = fields.get(1)?.parse().ok()?;
    let metric = fields.last()?.parse().ok()?;
    Some((iteration, metric))
}
