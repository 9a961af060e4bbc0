pub mod config;
pub mod datasets;
pub mod error;
pub mod graph;
pub mod spectral;
pub mod tokens;

pub use config::TokenizerConfig;
pub use datasets::DatasetLoader;
pub use error::{Result, TokenizerError};
pub use graph::{GraphRecord, RecordLoader};
pub use spectral::{normalized_laplacian, spectral_embedding};
pub use tokens::{
    assemble, tokenize_batch, AssemblyStats, BatchStats, TokenizedBatch, TokenizedGraph,
};
