//! Report and result-file emission.
//!
//! Both files are written record-by-record and flushed after every write,
//! so an interrupted run keeps everything produced up to that point.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{Graph, RunSummary, SolutionRecord, TaskKind};
use crate::error::{GraphFailure, Result};

const RULE_HEAVY: &str =
    "================================================================================";
const RULE_LIGHT: &str = "----------------------------------------";

/// Streaming writer for the human-readable report and the compact
/// per-graph result lines.
pub struct ReportWriter {
    task: TaskKind,
    dataset: String,
    report: File,
    results: File,
}

impl ReportWriter {
    /// Conventional output locations for a run:
    /// `<out>/<task>_<dataset>_<stamp>.log` and `<out>/test-custom-graphs.csv`
    pub fn default_paths(task: TaskKind, dataset: &str, output_dir: &Path) -> (PathBuf, PathBuf) {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        (
            output_dir.join(format!("{}_{}_{}.log", task.file_prefix(), dataset, stamp)),
            output_dir.join("test-custom-graphs.csv"),
        )
    }

    /// Create both output files and write the report header
    pub fn create(
        task: TaskKind,
        dataset: &str,
        report_path: &Path,
        result_path: &Path,
    ) -> Result<Self> {
        let report = File::create(report_path)?;
        let results = File::create(result_path)?;
        let mut writer = Self {
            task,
            dataset: dataset.to_string(),
            report,
            results,
        };
        writer.write_report(&format!(
            "{}\nGenerated at: {}\n{}\n\n",
            task.report_title(),
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            RULE_HEAVY
        ))?;
        Ok(writer)
    }

    /// Append the report block and result line for a solved graph
    pub fn append_success(&mut self, graph: &Graph, record: &SolutionRecord) -> Result<()> {
        let block = format!(
            "\nGraph #{}\n{}\nNumber of nodes: {}\nNumber of edges: {}\n\n\
             Solution Status: Successful\n\
             {}: {:.1}\n\
             Selected vertices: {:?}\n\
             Solve time: {:.4} seconds\n\n{}\n",
            record.graph_index + 1,
            RULE_LIGHT,
            graph.node_count(),
            graph.edge_count(),
            self.task.objective_label(),
            record.objective_value,
            record.selected_nodes,
            record.solve_time,
            RULE_HEAVY
        );
        self.write_report(&block)?;
        self.write_result(record)
    }

    /// Append a report block for a graph whose evaluation failed.
    /// Failed graphs get no result line.
    pub fn append_failure(
        &mut self,
        graph_index: usize,
        graph: &Graph,
        failure: &GraphFailure,
    ) -> Result<()> {
        let block = format!(
            "\nGraph #{}\n{}\nNumber of nodes: {}\nNumber of edges: {}\n\n\
             Solution Status: Failed ({})\n\n{}\n",
            graph_index + 1,
            RULE_LIGHT,
            graph.node_count(),
            graph.edge_count(),
            failure,
            RULE_HEAVY
        );
        self.write_report(&block)
    }

    /// Append the closing summary block
    pub fn append_summary(&mut self, summary: &RunSummary) -> Result<()> {
        let block = format!(
            "\n\nSummary Statistics\n{}\n\
             File processed: {}\n\
             Total graphs processed: {}\n\
             Successful solutions: {}\n\
             {}: {:.2}\n\
             Average solve time: {:.4} seconds\n{}\n",
            RULE_LIGHT,
            self.dataset,
            summary.total_graphs,
            summary.successful_count,
            self.task.average_objective_label(),
            summary.average_objective(),
            summary.average_time(),
            RULE_HEAVY
        );
        self.write_report(&block)
    }

    fn write_result(&mut self, record: &SolutionRecord) -> Result<()> {
        let mut selection = record.selected_nodes.len().to_string();
        for node in &record.selected_nodes {
            selection.push(' ');
            selection.push_str(&node.to_string());
        }
        writeln!(
            self.results,
            "{:.8},{},{:.6}",
            record.objective_value, selection, record.solve_time
        )?;
        self.results.flush()?;
        Ok(())
    }

    fn write_report(&mut self, block: &str) -> Result<()> {
        self.report.write_all(block.as_bytes())?;
        self.report.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::from_unweighted_edges(&[(0, 1), (0, 2), (1, 2)])
    }

    fn new_writer(task: TaskKind) -> (tempfile::TempDir, ReportWriter, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("report.log");
        let result_path = dir.path().join("results.csv");
        let writer = ReportWriter::create(task, "sample_graphs", &report_path, &result_path).unwrap();
        (dir, writer, report_path, result_path)
    }

    #[test]
    fn test_result_line_layout() {
        let (_dir, mut writer, _report_path, result_path) = new_writer(TaskKind::Maxcut);
        writer
            .append_success(
                &triangle(),
                &SolutionRecord {
                    graph_index: 0,
                    objective_value: 2.0,
                    selected_nodes: vec![0, 1],
                    solve_time: 0.012345,
                },
            )
            .unwrap();

        let line = std::fs::read_to_string(&result_path).unwrap();
        assert_eq!(line, "2.00000000,2 0 1,0.012345\n");
    }

    #[test]
    fn test_result_line_with_empty_selection() {
        let (_dir, mut writer, _report_path, result_path) = new_writer(TaskKind::Mvc);
        writer
            .append_success(
                &triangle(),
                &SolutionRecord {
                    graph_index: 0,
                    objective_value: 0.0,
                    selected_nodes: vec![],
                    solve_time: 0.5,
                },
            )
            .unwrap();

        let line = std::fs::read_to_string(&result_path).unwrap();
        assert_eq!(line, "0.00000000,0,0.500000\n");
    }

    #[test]
    fn test_report_blocks() {
        let (_dir, mut writer, report_path, _result_path) = new_writer(TaskKind::Maxcut);
        writer
            .append_success(
                &triangle(),
                &SolutionRecord {
                    graph_index: 0,
                    objective_value: 2.0,
                    selected_nodes: vec![0, 1],
                    solve_time: 0.0123,
                },
            )
            .unwrap();
        writer
            .append_failure(
                1,
                &triangle(),
                &GraphFailure::Solve("decoder exploded".to_string()),
            )
            .unwrap();

        let mut summary = RunSummary::default();
        summary.record_success(2.0, 0.0123);
        summary.record_failure();
        writer.append_summary(&summary).unwrap();

        let report = std::fs::read_to_string(&report_path).unwrap();
        assert!(report.starts_with("Maximum Cut Analysis Report\nGenerated at: "));
        assert!(report.contains("Graph #1"));
        assert!(report.contains("Number of nodes: 3"));
        assert!(report.contains("Solution Status: Successful"));
        assert!(report.contains("Maximum cut size: 2.0"));
        assert!(report.contains("Selected vertices: [0, 1]"));
        assert!(report.contains("Solve time: 0.0123 seconds"));
        assert!(report.contains("Solution Status: Failed (solve failed: decoder exploded)"));
        assert!(report.contains("Total graphs processed: 2"));
        assert!(report.contains("Successful solutions: 1"));
        assert!(report.contains("Average maximum cut size: 2.00"));
    }

    #[test]
    fn test_summary_with_no_successes_reports_zero_averages() {
        let (_dir, mut writer, report_path, _result_path) = new_writer(TaskKind::Mvc);
        let mut summary = RunSummary::default();
        summary.record_failure();
        writer.append_summary(&summary).unwrap();

        let report = std::fs::read_to_string(&report_path).unwrap();
        assert!(report.contains("Average minimum vertex cover size: 0.00"));
        assert!(report.contains("Average solve time: 0.0000 seconds"));
    }

    #[test]
    fn test_default_paths_layout() {
        let (report_path, result_path) =
            ReportWriter::default_paths(TaskKind::Mvc, "sample_n300", Path::new("/out"));
        let name = report_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("mvc_sample_n300_"));
        assert!(name.ends_with(".log"));
        assert_eq!(result_path, PathBuf::from("/out/test-custom-graphs.csv"));
    }
}
