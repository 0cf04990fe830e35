//! Solver client: the seam between the harness and the external solver.
//!
//! The solver capability (model, embeddings, decoding) lives outside this
//! crate; everything it must provide is the three operations on
//! [`SolverCapability`]. The client adapts that surface to the batch loop:
//! it owns the graph registry, translates the wire encoding of selections,
//! and applies the optional bounded wait per solve.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task;
use tracing::info;

use crate::domain::Graph;
use crate::error::{EvalError, GraphFailure, Result};

/// Result type for capability operations
pub type SolverResult<T> = std::result::Result<T, SolverFault>;

/// Operation-level failure reported by a solver capability
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct SolverFault(pub String);

/// Raw output of the external decoding procedure.
///
/// `selection` uses the capability's count-prefixed encoding: the first
/// element is the number of selected nodes, followed by that many node ids.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub objective: f64,
    pub selection: Vec<u32>,
}

/// The externally supplied solver: load a checkpoint, register graphs,
/// decode solutions. Implementations are driven strictly sequentially;
/// none of the operations is required to be thread-safe.
#[cfg_attr(test, mockall::automock)]
pub trait SolverCapability: Send + 'static {
    fn load_model(&mut self, checkpoint: &Path) -> SolverResult<()>;

    fn insert_graph(&mut self, graph: &Graph, is_evaluation: bool) -> SolverResult<()>;

    fn solve(&mut self, graph_index: usize, node_count: usize) -> SolverResult<RawSolution>;
}

/// A decoded solution plus the monotonic timestamps bracketing the call
#[derive(Debug, Clone)]
pub struct TimedSolution {
    pub objective: f64,
    pub selected_nodes: Vec<u32>,
    pub started: Instant,
    pub finished: Instant,
}

/// Thin adapter over a [`SolverCapability`].
///
/// The capability sits behind a mutex and its calls run on the blocking
/// pool, so a bounded wait can be applied per solve without stalling the
/// harness. The client owns the graph registry: callers hand in an explicit
/// arrival-order index and the client maps it to the capability's own slot
/// numbering (a failed insert consumes no slot).
pub struct SolverClient<S: SolverCapability> {
    capability: Arc<Mutex<S>>,
    slots: HashMap<usize, usize>,
    next_slot: usize,
    loaded: bool,
}

impl<S: SolverCapability> SolverClient<S> {
    pub fn new(capability: S) -> Self {
        Self {
            capability: Arc::new(Mutex::new(capability)),
            slots: HashMap::new(),
            next_slot: 0,
            loaded: false,
        }
    }

    /// One-time checkpoint load. Must complete before any insert or solve;
    /// failures here are fatal to the whole run.
    pub async fn load(&mut self, checkpoint: &Path) -> Result<()> {
        if !checkpoint.exists() {
            return Err(EvalError::CheckpointNotFound {
                path: checkpoint.to_path_buf(),
            });
        }

        let capability = Arc::clone(&self.capability);
        let path = checkpoint.to_path_buf();
        let outcome = task::spawn_blocking(move || {
            let mut solver = capability.blocking_lock();
            solver.load_model(&path)
        })
        .await
        .map_err(|e| EvalError::CheckpointLoad {
            path: checkpoint.to_path_buf(),
            reason: format!("solver panicked: {e}"),
        })?;

        outcome.map_err(|fault| EvalError::CheckpointLoad {
            path: checkpoint.to_path_buf(),
            reason: fault.to_string(),
        })?;

        self.loaded = true;
        info!(checkpoint = %checkpoint.display(), "solver checkpoint loaded");
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Register `graph` under the explicit arrival-order `index`
    pub async fn insert(
        &mut self,
        graph: &Graph,
        index: usize,
    ) -> std::result::Result<(), GraphFailure> {
        if !self.loaded {
            return Err(GraphFailure::Insert(
                "no checkpoint loaded".to_string(),
            ));
        }
        if self.slots.contains_key(&index) {
            return Err(GraphFailure::Insert(format!(
                "graph {index} is already registered"
            )));
        }

        let capability = Arc::clone(&self.capability);
        let graph = graph.clone();
        let outcome = task::spawn_blocking(move || {
            let mut solver = capability.blocking_lock();
            solver.insert_graph(&graph, true)
        })
        .await
        .map_err(|e| GraphFailure::Insert(format!("solver panicked: {e}")))?;

        outcome.map_err(|fault| GraphFailure::Insert(fault.to_string()))?;

        self.slots.insert(index, self.next_slot);
        self.next_slot += 1;
        Ok(())
    }

    /// Invoke the decoding procedure for a registered graph.
    ///
    /// The count-prefixed selection coming back from the capability is
    /// translated into a plain ordered node sequence here. `timeout` bounds
    /// the wait; on overrun the stalled call finishes (and releases the
    /// solver) in the background while the caller gets
    /// [`GraphFailure::Timeout`].
    pub async fn solve(
        &self,
        graph_index: usize,
        node_count: usize,
        timeout: Option<Duration>,
    ) -> std::result::Result<TimedSolution, GraphFailure> {
        let slot = *self.slots.get(&graph_index).ok_or_else(|| {
            GraphFailure::Solve(format!("graph {graph_index} was never registered"))
        })?;

        let capability = Arc::clone(&self.capability);
        let call = task::spawn_blocking(move || {
            let mut solver = capability.blocking_lock();
            let started = Instant::now();
            let outcome = solver.solve(slot, node_count);
            let finished = Instant::now();
            (outcome, started, finished)
        });

        let joined = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(joined) => joined,
                Err(_) => return Err(GraphFailure::Timeout { limit }),
            },
            None => call.await,
        };

        let (outcome, started, finished) =
            joined.map_err(|e| GraphFailure::Solve(format!("solver panicked: {e}")))?;
        let raw = outcome.map_err(|fault| GraphFailure::Solve(fault.to_string()))?;
        let selected_nodes = decode_selection(&raw.selection)?;

        Ok(TimedSolution {
            objective: raw.objective,
            selected_nodes,
            started,
            finished,
        })
    }
}

/// Translate the capability's count-prefixed node encoding into an ordered
/// sequence, validating the prefix against what was actually returned.
fn decode_selection(selection: &[u32]) -> std::result::Result<Vec<u32>, GraphFailure> {
    let Some((&count, rest)) = selection.split_first() else {
        return Err(GraphFailure::Solve("empty selection returned".to_string()));
    };
    let count = count as usize;
    if rest.len() < count {
        return Err(GraphFailure::Solve(format!(
            "selection announces {count} nodes but carries {}",
            rest.len()
        )));
    }
    Ok(rest[..count].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_unweighted_edges(&[(0, 1), (0, 2), (1, 2)])
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"weights").unwrap();
    }

    #[test]
    fn test_decode_selection() {
        assert_eq!(decode_selection(&[2, 0, 1]).unwrap(), vec![0, 1]);
        assert_eq!(decode_selection(&[0]).unwrap(), Vec::<u32>::new());
        // Trailing entries beyond the announced count are ignored
        assert_eq!(decode_selection(&[1, 5, 9]).unwrap(), vec![5]);
        assert!(decode_selection(&[]).is_err());
        assert!(decode_selection(&[3, 0, 1]).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_checkpoint() {
        let mut client = SolverClient::new(MockSolverCapability::new());
        let err = client
            .load(Path::new("/nonexistent/nrange_1_2_iter_3.model"))
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::CheckpointNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = dir.path().join("nrange_1_2_iter_3.model");
        touch(&ckpt);

        let mut mock = MockSolverCapability::new();
        mock.expect_load_model()
            .returning(|_| Err(SolverFault("incompatible format".to_string())));

        let mut client = SolverClient::new(mock);
        let err = client.load(&ckpt).await.unwrap_err();
        assert!(matches!(err, EvalError::CheckpointLoad { .. }));
        assert!(!client.is_loaded());
    }

    #[tokio::test]
    async fn test_insert_then_solve_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = dir.path().join("nrange_1_2_iter_3.model");
        touch(&ckpt);

        let mut mock = MockSolverCapability::new();
        mock.expect_load_model().returning(|_| Ok(()));
        mock.expect_insert_graph().returning(|_, _| Ok(()));
        mock.expect_solve().returning(|_, _| {
            Ok(RawSolution {
                objective: 2.0,
                selection: vec![2, 0, 1],
            })
        });

        let mut client = SolverClient::new(mock);
        client.load(&ckpt).await.unwrap();
        client.insert(&triangle(), 0).await.unwrap();

        let solved = client.solve(0, 3, None).await.unwrap();
        assert_eq!(solved.objective, 2.0);
        assert_eq!(solved.selected_nodes, vec![0, 1]);
        assert!(solved.finished >= solved.started);
    }

    #[tokio::test]
    async fn test_failed_insert_consumes_no_slot() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = dir.path().join("nrange_1_2_iter_3.model");
        touch(&ckpt);

        let mut mock = MockSolverCapability::new();
        mock.expect_load_model().returning(|_| Ok(()));
        let mut calls = 0;
        mock.expect_insert_graph().returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(SolverFault("registry rejected the graph".to_string()))
            } else {
                Ok(())
            }
        });
        mock.expect_solve().withf(|slot, _| *slot == 0).returning(|_, _| {
            Ok(RawSolution {
                objective: 1.0,
                selection: vec![0],
            })
        });

        let mut client = SolverClient::new(mock);
        client.load(&ckpt).await.unwrap();

        assert!(client.insert(&triangle(), 0).await.is_err());
        client.insert(&triangle(), 1).await.unwrap();

        // Graph 1 landed in the capability's slot 0
        let solved = client.solve(1, 3, None).await.unwrap();
        assert_eq!(solved.objective, 1.0);

        // Graph 0 was never registered
        assert!(matches!(
            client.solve(0, 3, None).await,
            Err(GraphFailure::Solve(_))
        ));
    }

    #[tokio::test]
    async fn test_solve_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = dir.path().join("nrange_1_2_iter_3.model");
        touch(&ckpt);

        let mut mock = MockSolverCapability::new();
        mock.expect_load_model().returning(|_| Ok(()));
        mock.expect_insert_graph().returning(|_, _| Ok(()));
        mock.expect_solve().returning(|_, _| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(RawSolution {
                objective: 0.0,
                selection: vec![0],
            })
        });

        let mut client = SolverClient::new(mock);
        client.load(&ckpt).await.unwrap();
        client.insert(&triangle(), 0).await.unwrap();

        let outcome = client
            .solve(0, 3, Some(Duration::from_millis(20)))
            .await;
        assert!(matches!(outcome, Err(GraphFailure::Timeout { .. })));
    }
}
