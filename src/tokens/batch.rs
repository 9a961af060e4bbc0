use ndarray::Array3;
use rayon::prelude::*;

use crate::config::TokenizerConfig;
use crate::error::{Result, TokenizerError};
use crate::graph::GraphRecord;
use crate::tokens::assemble::{assemble, TokenizedGraph};

/// Aggregated counters across a tokenized batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub graphs: usize,
    pub total_edges: usize,
    pub dropped_edges: usize,
}

/// A batch of graphs stacked into one fixed-shape tensor.
#[derive(Debug, Clone)]
pub struct TokenizedBatch {
    /// `B x (N + max_edges) x (F + 2*dp + 4)`, cast to f32 exactly once at
    /// this boundary.
    pub tokens: Array3<f32>,
    pub stats: BatchStats,
}

/// Tokenize a collection of graphs and stack the results.
///
/// Every record must share the node count and feature width of the first
/// one; the first offender fails fast with
/// [`TokenizerError::ShapeMismatch`] rather than silently reshaping.
/// Per-graph work fans out over rayon, and the ordered collect keeps batch
/// position aligned with input position.
pub fn tokenize_batch(
    records: &[GraphRecord],
    config: &TokenizerConfig,
) -> Result<TokenizedBatch> {
    let Some(first) = records.first() else {
        return Err(TokenizerError::invalid("batch contains no graphs"));
    };
    let expected_nodes = first.node_count();
    let expected_features = first.feature_width();

    for (index, record) in records.iter().enumerate() {
        if record.node_count() != expected_nodes || record.feature_width() != expected_features {
            return Err(TokenizerError::ShapeMismatch {
                index,
                expected_nodes,
                expected_features,
                actual_nodes: record.node_count(),
                actual_features: record.feature_width(),
            });
        }
    }

    let tokenized = records
        .par_iter()
        .map(|record| assemble(&record.adjacency, &record.features, config))
        .collect::<Result<Vec<TokenizedGraph>>>()?;

    let rows = expected_nodes + config.max_edges;
    let width = config.row_width(expected_features);
    let mut tokens = Array3::<f32>::zeros((records.len(), rows, width));
    let mut stats = BatchStats {
        graphs: records.len(),
        ..Default::default()
    };

    for (b, graph) in tokenized.iter().enumerate() {
        for i in 0..rows {
            for j in 0..width {
                tokens[[b, i, j]] = graph.tokens[(i, j)] as f32;
            }
        }
        stats.total_edges += graph.stats.edge_count;
        stats.dropped_edges += graph.stats.dropped_edges;
    }

    Ok(TokenizedBatch { tokens, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn record(n: usize, feature: f64) -> GraphRecord {
        let mut adjacency = DMatrix::zeros(n, n);
        for i in 0..n {
            let next = (i + 1) % n;
            adjacency[(i, next)] = 1.0;
            adjacency[(next, i)] = 1.0;
        }
        let features = DMatrix::from_element(n, 1, feature);
        GraphRecord::from_matrices(adjacency, features).expect("record")
    }

    fn config(dp: usize, max_edges: usize) -> TokenizerConfig {
        TokenizerConfig {
            spectral_dim: dp,
            max_edges,
        }
    }

    #[test]
    fn batch_tensor_has_uniform_shape() {
        let records = vec![record(4, 1.0), record(4, 2.0), record(4, 3.0)];
        let batch = tokenize_batch(&records, &config(3, 16)).expect("batch");
        assert_eq!(batch.tokens.shape(), &[3, 4 + 16, 1 + 6 + 4]);
        assert_eq!(batch.stats.graphs, 3);
        // 4-cycle stores each undirected edge twice
        assert_eq!(batch.stats.total_edges, 24);
        assert_eq!(batch.stats.dropped_edges, 0);
    }

    #[test]
    fn batch_order_matches_input_order() {
        let records = vec![record(3, 10.0), record(3, 20.0)];
        let batch = tokenize_batch(&records, &config(2, 8)).expect("batch");
        assert_eq!(batch.tokens[[0, 0, 0]], 10.0);
        assert_eq!(batch.tokens[[1, 0, 0]], 20.0);
    }

    #[test]
    fn mismatched_node_counts_fail_fast() {
        let records = vec![record(4, 1.0), record(5, 1.0)];
        let err = tokenize_batch(&records, &config(3, 8)).unwrap_err();
        match err {
            TokenizerError::ShapeMismatch {
                index,
                expected_nodes,
                actual_nodes,
                ..
            } => {
                assert_eq!(index, 1);
                assert_eq!(expected_nodes, 4);
                assert_eq!(actual_nodes, 5);
            }
            other => panic!("expected ShapeMismatch, got {other}"),
        }
    }

    #[test]
    fn mismatched_feature_widths_fail_fast() {
        let wide = {
            let base = record(4, 1.0);
            let features = DMatrix::from_element(4, 2, 1.0);
            GraphRecord::from_matrices(base.adjacency, features).expect("record")
        };
        let records = vec![record(4, 1.0), wide];
        assert!(matches!(
            tokenize_batch(&records, &config(3, 8)),
            Err(TokenizerError::ShapeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn empty_batch_is_invalid() {
        assert!(matches!(
            tokenize_batch(&[], &config(3, 8)),
            Err(TokenizerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn dropped_edges_accumulate_across_the_batch() {
        let records = vec![record(4, 1.0), record(4, 1.0)];
        // each 4-cycle has 8 directed entries; capacity 5 drops 3 per graph
        let batch = tokenize_batch(&records, &config(3, 5)).expect("batch");
        assert_eq!(batch.stats.dropped_edges, 6);
    }
}
