pub mod embedding;
pub mod laplacian;

pub use embedding::spectral_embedding;
pub use laplacian::normalized_laplacian;
