pub mod assemble;
pub mod batch;

pub use assemble::{assemble, AssemblyStats, TokenizedGraph};
pub use batch::{tokenize_batch, BatchStats, TokenizedBatch};
