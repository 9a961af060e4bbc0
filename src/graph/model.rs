use nalgebra::DMatrix;
use petgraph::graph::Graph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, TokenizerError};

pub type RecordId = String;

/// Raw feature vector attached to a node in the petgraph representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFeatures {
    pub values: Vec<f64>,
}

/// Scalar weight attached to an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeWeight {
    pub value: f64,
}

/// Directed petgraph with feature payloads. Undirected records are mirrored
/// into both directions when loaded, so every stored edge is one adjacency
/// entry.
pub type FeatureGraph = Graph<NodeFeatures, EdgeWeight>;

/// On-disk JSON schema for a single graph record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: RecordId,
    #[serde(default)]
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: RecordId,
    pub target: RecordId,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Dense input pair consumed by the tokenization pipeline: a square N x N
/// adjacency matrix and an N x F node-feature matrix.
#[derive(Debug, Clone)]
pub struct GraphRecord {
    pub adjacency: DMatrix<f64>,
    pub features: DMatrix<f64>,
}

impl GraphRecord {
    /// Validate and wrap a dense matrix pair.
    pub fn from_matrices(adjacency: DMatrix<f64>, features: DMatrix<f64>) -> Result<Self> {
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
        if features.ncols() == 0 {
            return Err(TokenizerError::invalid(
                "feature matrix must have at least one column",
            ));
        }
        Ok(Self {
            adjacency,
            features,
        })
    }

    /// Flatten a petgraph into dense matrices. Node order follows petgraph
    /// node-index order; every node must carry the same feature width.
    pub fn from_graph(graph: &FeatureGraph) -> Result<Self> {
        let node_count = graph.node_count();

        let mut index_map = HashMap::new();
        for (row, node_idx) in graph.node_indices().enumerate() {
            index_map.insert(node_idx, row);
        }

        let feature_width = graph
            .node_weights()
            .next()
            .map(|attrs| attrs.values.len())
            .unwrap_or(0);
        for (row, attrs) in graph.node_weights().enumerate() {
            if attrs.values.len() != feature_width {
                return Err(TokenizerError::invalid(format!(
                    "node {} has {} features but the record uses width {}",
                    row,
                    attrs.values.len(),
                    feature_width
                )));
            }
        }

        let mut adjacency = DMatrix::zeros(node_count, node_count);
        for edge in graph.edge_references() {
            let source = index_map[&edge.source()];
            let target = index_map[&edge.target()];
            adjacency[(source, target)] += edge.weight().value;
        }

        let mut features = DMatrix::zeros(node_count, feature_width);
        for (row, attrs) in graph.node_weights().enumerate() {
            for (col, value) in attrs.values.iter().enumerate() {
                features[(row, col)] = *value;
            }
        }

        Self::from_matrices(adjacency, features)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.nrows()
    }

    pub fn feature_width(&self) -> usize {
        self.features.ncols()
    }
}
