use serde::{Deserialize, Serialize};

/// Task variant the solver under evaluation was trained for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Maximum Cut: a larger objective is better
    Maxcut,
    /// Minimum Vertex Cover: a smaller objective is better
    Mvc,
}

impl TaskKind {
    /// Comparison direction used when scanning the training log
    pub fn direction(&self) -> ObjectiveDirection {
        match self {
            TaskKind::Maxcut => ObjectiveDirection::Maximize,
            TaskKind::Mvc => ObjectiveDirection::Minimize,
        }
    }

    pub fn report_title(&self) -> &'static str {
        match self {
            TaskKind::Maxcut => "Maximum Cut Analysis Report",
            TaskKind::Mvc => "Minimum Vertex Cover Analysis Report",
        }
    }

    pub fn objective_label(&self) -> &'static str {
        match self {
            TaskKind::Maxcut => "Maximum cut size",
            TaskKind::Mvc => "Minimum vertex cover size",
        }
    }

    pub fn average_objective_label(&self) -> &'static str {
        match self {
            TaskKind::Maxcut => "Average maximum cut size",
            TaskKind::Mvc => "Average minimum vertex cover size",
        }
    }

    pub fn file_prefix(&self) -> &'static str {
        match self {
            TaskKind::Maxcut => "maxcut",
            TaskKind::Mvc => "mvc",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_prefix())
    }
}

/// Direction of the validation-metric comparison during checkpoint selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveDirection {
    Maximize,
    Minimize,
}

impl ObjectiveDirection {
    /// Strict comparison: an equal metric never counts as an improvement,
    /// so the earliest entry wins ties.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            ObjectiveDirection::Maximize => candidate > incumbent,
            ObjectiveDirection::Minimize => candidate < incumbent,
        }
    }
}

/// An input graph, immutable once constructed.
///
/// Nodes are kept sorted and deduplicated and always include every edge
/// endpoint. Edges carry a weight; unweighted corpora materialize 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<u32>,
    edges: Vec<(u32, u32, f64)>,
}

impl Graph {
    pub fn new(mut nodes: Vec<u32>, edges: Vec<(u32, u32, f64)>) -> Self {
        nodes.extend(edges.iter().flat_map(|&(u, v, _)| [u, v]));
        nodes.sort_unstable();
        nodes.dedup();
        Self { nodes, edges }
    }

    /// Build a graph whose node set is implied by its edge endpoints
    pub fn from_unweighted_edges(edges: &[(u32, u32)]) -> Self {
        Self::new(
            Vec::new(),
            edges.iter().map(|&(u, v)| (u, v, 1.0)).collect(),
        )
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[u32] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(u32, u32, f64)] {
        &self.edges
    }
}

/// Outcome of one successful solve call; read-only once created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionRecord {
    /// Arrival-order index of the graph within the run
    pub graph_index: usize,
    /// Cut size or cover size reported by the solver
    pub objective_value: f64,
    /// Nodes comprising the solution, in the order the solver returned them
    pub selected_nodes: Vec<u32>,
    /// Wall-clock seconds spent inside the solve call
    pub solve_time: f64,
}

/// Running totals for one evaluation batch.
///
/// Accumulated monotonically while the loop runs and never mutated after
/// it ends; averages are derived, not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total_graphs: usize,
    pub successful_count: usize,
    pub total_objective: f64,
    pub total_time: f64,
}

impl RunSummary {
    pub fn record_success(&mut self, objective: f64, solve_time: f64) {
        self.total_graphs += 1;
        self.successful_count += 1;
        self.total_objective += objective;
        self.total_time += solve_time;
    }

    /// A failed graph counts toward the total but contributes nothing else
    pub fn record_failure(&mut self) {
        self.total_graphs += 1;
    }

    pub fn average_objective(&self) -> f64 {
        if self.successful_count == 0 {
            return 0.0;
        }
        self.total_objective / self.successful_count as f64
    }

    pub fn average_time(&self) -> f64 {
        if self.successful_count == 0 {
            return 0.0;
        }
        self.total_time / self.successful_count as f64
    }
}
