//! Graph corpus loading.
//!
//! A corpus is a JSON array of per-graph records. Max-cut records carry a
//! `nodes` list and a `weighted_edges` list of `(u, v, w)` triples; vertex
//! cover records carry an `edges` list of `(u, v)` pairs. Corpora written
//! by older tooling encode these lists as Python-literal strings; those are
//! accepted too, decoded through a validating JSON round-trip rather than
//! evaluated.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::domain::{Graph, TaskKind};
use crate::error::CorpusError;

#[derive(Debug, Deserialize)]
struct MaxcutRecord {
    nodes: FlexibleField<Vec<u32>>,
    weighted_edges: FlexibleField<Vec<(u32, u32, f64)>>,
}

#[derive(Debug, Deserialize)]
struct MvcRecord {
    edges: FlexibleField<Vec<(u32, u32)>>,
}

/// A field holding either a native JSON value or a string-encoded list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlexibleField<T> {
    Native(T),
    Encoded(String),
}

impl<T: DeserializeOwned> FlexibleField<T> {
    fn decode(self, index: usize, field: &str) -> Result<T, CorpusError> {
        match self {
            FlexibleField::Native(value) => Ok(value),
            FlexibleField::Encoded(raw) => {
                // Tuple parentheses are the only non-JSON construct these
                // strings use.
                let as_json = raw.replace('(', "[").replace(')', "]");
                serde_json::from_str(&as_json).map_err(|e| CorpusError::Record {
                    index,
                    reason: format!("field `{field}` is not a parsable list: {e}"),
                })
            }
        }
    }
}

/// Load every graph in the corpus at `path`, in file order
pub fn load_graphs(path: &Path, task: TaskKind) -> Result<Vec<Graph>, CorpusError> {
    let raw = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let graphs = match task {
        TaskKind::Maxcut => {
            let records: Vec<MaxcutRecord> =
                serde_json::from_str(&raw).map_err(|source| CorpusError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            records
                .into_iter()
                .enumerate()
                .map(|(index, record)| {
                    Ok(Graph::new(
                        record.nodes.decode(index, "nodes")?,
                        record.weighted_edges.decode(index, "weighted_edges")?,
                    ))
                })
                .collect::<Result<Vec<_>, CorpusError>>()?
        }
        TaskKind::Mvc => {
            let records: Vec<MvcRecord> =
                serde_json::from_str(&raw).map_err(|source| CorpusError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            records
                .into_iter()
                .enumerate()
                .map(|(index, record)| {
                    Ok(Graph::from_unweighted_edges(
                        &record.edges.decode(index, "edges")?,
                    ))
                })
                .collect::<Result<Vec<_>, CorpusError>>()?
        }
    };

    info!(
        count = graphs.len(),
        corpus = %path.display(),
        "loaded graph corpus"
    );
    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_corpus(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graphs.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_maxcut_native_records() {
        let (_dir, path) = write_corpus(
            r#"[{"nodes": [0, 1, 2], "weighted_edges": [[0, 1, 5.0], [1, 2, 3.0]]}]"#,
        );
        let graphs = load_graphs(&path, TaskKind::Maxcut).unwrap();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].node_count(), 3);
        assert_eq!(graphs[0].edges()[0], (0, 1, 5.0));
    }

    #[test]
    fn test_maxcut_string_encoded_records() {
        let (_dir, path) = write_corpus(
            r#"[{"nodes": "[0, 1, 2]", "weighted_edges": "[(0, 1, 5.0), (1, 2, 3)]"}]"#,
        );
        let graphs = load_graphs(&path, TaskKind::Maxcut).unwrap();
        assert_eq!(graphs[0].edge_count(), 2);
        assert_eq!(graphs[0].edges()[1], (1, 2, 3.0));
    }

    #[test]
    fn test_mvc_records_imply_nodes() {
        let (_dir, path) = write_corpus(r#"[{"edges": "[(0, 1), (1, 2), (0, 2)]"}]"#);
        let graphs = load_graphs(&path, TaskKind::Mvc).unwrap();
        assert_eq!(graphs[0].nodes(), &[0, 1, 2]);
        assert!(graphs[0].edges().iter().all(|&(_, _, w)| w == 1.0));
    }

    #[test]
    fn test_unparsable_encoded_field_is_rejected() {
        let (_dir, path) =
            write_corpus(r#"[{"nodes": "[0]", "weighted_edges": "os.system('rm -rf /')"}]"#);
        let err = load_graphs(&path, TaskKind::Maxcut).unwrap_err();
        assert!(matches!(err, CorpusError::Record { index: 0, .. }));
    }

    #[test]
    fn test_non_array_corpus_is_rejected() {
        let (_dir, path) = write_corpus(r#"{"nodes": []}"#);
        assert!(matches!(
            load_graphs(&path, TaskKind::Maxcut),
            Err(CorpusError::Json { .. })
        ));
    }
}
