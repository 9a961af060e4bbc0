use nalgebra::DMatrix;

use crate::config::TokenizerConfig;
use crate::error::{Result, TokenizerError};
use crate::spectral::spectral_embedding;

/// Marker pair written into the type-tag columns of a node row.
const NODE_TAG: [f64; 2] = [1.0, 0.0];
/// Marker pair written into the type-tag columns of an edge row.
const EDGE_TAG: [f64; 2] = [0.0, 1.0];
/// Placeholder index pair for node rows, which have no endpoints.
const NODE_INDEX_PLACEHOLDER: f64 = -1.0;

/// Per-graph counters emitted alongside the token matrix.
///
/// `dropped_edges` is the observability hook for the silent truncation
/// policy: edges found beyond `max_edges` are not an error, but callers can
/// see how many were lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub node_count: usize,
    /// Total edges found by the scan, before truncation.
    pub edge_count: usize,
    pub dropped_edges: usize,
}

/// A single graph flattened into a fixed-height token matrix.
#[derive(Debug, Clone)]
pub struct TokenizedGraph {
    /// `(N + max_edges) x (F + 2*dp + 4)` token matrix.
    pub tokens: DMatrix<f64>,
    pub stats: AssemblyStats,
}

/// Flatten one graph into its token-sequence matrix.
///
/// Rows are laid out nodes-first, then edges in row-major scan order of the
/// adjacency matrix, then zero padding up to `node_count + max_edges` rows.
/// A node row is `[Xv[i] | P[i] | P[i] | 1, 0 | -1, -1]`; an edge row for
/// `(u, v)` is `[A[u,v], 0.. | P[u] | P[v] | 0, 1 | u, v]` with the scalar
/// weight in the first feature slot. The embedding duplication in node rows
/// keeps both row kinds at one width.
///
/// When the scan finds more than `max_edges` edges, only the first
/// `max_edges` survive; the rest are silently dropped and counted in
/// [`AssemblyStats::dropped_edges`]. Callers are expected to configure the
/// capacity large enough that truncation stays rare.
pub fn assemble(
    adjacency: &DMatrix<f64>,
    features: &DMatrix<f64>,
    config: &TokenizerConfig,
) -> Result<TokenizedGraph> {
    if adjacency.nrows() != adjacency.ncols() {
        return Err(TokenizerError::invalid(format!(
            "adjacency matrix must be square, got {} x {}",
            adjacency.nrows(),
            adjacency.ncols()
        )));
    }
    if features.nrows() != adjacency.nrows() {
        return Err(TokenizerError::invalid(format!(
            "feature matrix has {} rows but adjacency has {} nodes",
            features.nrows(),
            adjacency.nrows()
        )));
    }
    // Edge rows store the scalar weight in the first feature slot, so the
    // row layout needs at least one.
    if features.ncols() == 0 {
        return Err(TokenizerError::invalid(
            "feature matrix must have at least one column",
        ));
    }

    let n = adjacency.nrows();
    let dp = config.spectral_dim;
    let feature_width = features.ncols();

    // Self-loops on the diagonal flow through unfiltered.
    let mut edges = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if adjacency[(i, j)] != 0.0 {
                edges.push((i, j));
            }
        }
    }

    let embedding = spectral_embedding(adjacency, dp)?;

    let width = config.row_width(feature_width);
    let tag_offset = feature_width + 2 * dp;
    let mut tokens = DMatrix::zeros(n + config.max_edges, width);

    for i in 0..n {
        for col in 0..feature_width {
            tokens[(i, col)] = features[(i, col)];
        }
        for col in 0..dp {
            tokens[(i, feature_width + col)] = embedding[(i, col)];
            tokens[(i, feature_width + dp + col)] = embedding[(i, col)];
        }
        tokens[(i, tag_offset)] = NODE_TAG[0];
        tokens[(i, tag_offset + 1)] = NODE_TAG[1];
        tokens[(i, tag_offset + 2)] = NODE_INDEX_PLACEHOLDER;
        tokens[(i, tag_offset + 3)] = NODE_INDEX_PLACEHOLDER;
    }

    let kept = edges.len().min(config.max_edges);
    for (k, &(u, v)) in edges.iter().take(kept).enumerate() {
        let row = n + k;
        tokens[(row, 0)] = adjacency[(u, v)];
        for col in 0..dp {
            tokens[(row, feature_width + col)] = embedding[(u, col)];
            tokens[(row, feature_width + dp + col)] = embedding[(v, col)];
        }
        tokens[(row, tag_offset)] = EDGE_TAG[0];
        tokens[(row, tag_offset + 1)] = EDGE_TAG[1];
        tokens[(row, tag_offset + 2)] = u as f64;
        tokens[(row, tag_offset + 3)] = v as f64;
    }

    let stats = AssemblyStats {
        node_count: n,
        edge_count: edges.len(),
        dropped_edges: edges.len() - kept,
    };

    Ok(TokenizedGraph { tokens, stats })
}
