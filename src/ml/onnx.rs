//! ONNX-backed solver capability (pure Rust via `tract-onnx`).
//!
//! Lets the stock binary evaluate checkpoints exported to ONNX without a
//! Python runtime. The exported graph consumes the flattened weighted
//! adjacency matrix `[1, n * n]` produced by
//! [`crate::ml::adjacency_features`] and yields `n + 1` values: the
//! objective followed by one membership score per node (score > 0.5
//! selects the node).

use std::path::Path;

use tract_onnx::prelude::*;

use crate::domain::Graph;
use crate::ml::adjacency_features;
use crate::solver::{RawSolution, SolverCapability, SolverFault, SolverResult};

#[derive(Default)]
pub struct OnnxSolver {
    model: Option<InferenceModel>,
    registry: Vec<RegisteredGraph>,
}

struct RegisteredGraph {
    nodes: Vec<u32>,
    features: Vec<f32>,
}

impl OnnxSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolverCapability for OnnxSolver {
    fn load_model(&mut self, checkpoint: &Path) -> SolverResult<()> {
        let model = tract_onnx::onnx()
            .model_for_path(checkpoint)
            .map_err(|e| SolverFault(format!("onnx load failed: {e}")))?;
        self.model = Some(model);
        Ok(())
    }

    fn insert_graph(&mut self, graph: &Graph, _is_evaluation: bool) -> SolverResult<()> {
        self.registry.push(RegisteredGraph {
            nodes: graph.nodes().to_vec(),
            features: adjacency_features(graph),
        });
        Ok(())
    }

    fn solve(&mut self, graph_index: usize, node_count: usize) -> SolverResult<RawSolution> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| SolverFault("no checkpoint loaded".to_string()))?;
        let registered = self
            .registry
            .get(graph_index)
            .ok_or_else(|| SolverFault(format!("graph {graph_index} was never inserted")))?;

        let n = registered.nodes.len();
        if n != node_count {
            return Err(SolverFault(format!(
                "node count mismatch: registry has {n}, caller passed {node_count}"
            )));
        }

        // The input dimension depends on the graph, so the model is
        // specialized per solve.
        let plan = model
            .clone()
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, n * n)))
            .map_err(|e| SolverFault(format!("onnx input fact failed: {e}")))?
            .into_optimized()
            .map_err(|e| SolverFault(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| SolverFault(format!("onnx runnable failed: {e}")))?;

        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&[1, n * n]),
            registered.features.clone(),
        )
        .map_err(|e| SolverFault(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = plan
            .run(tvec!(tensor))
            .map_err(|e| SolverFault(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(SolverFault("onnx produced no outputs".to_string()));
        }

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| SolverFault(format!("onnx output decode failed: {e}")))?;
        let values: Vec<f32> = view.iter().copied().collect();
        if values.len() != n + 1 {
            return Err(SolverFault(format!(
                "expected {} outputs, got {}",
                n + 1,
                values.len()
            )));
        }

        let objective = f64::from(values[0]);
        let mut selection = vec![0u32];
        for (rank, score) in values[1..].iter().enumerate() {
            if *score > 0.5 {
                selection.push(registered.nodes[rank]);
            }
        }
        selection[0] = (selection.len() - 1) as u32;

        Ok(RawSolution {
            objective,
            selection,
        })
    }
}
