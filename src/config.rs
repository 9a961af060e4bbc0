/// Knobs for the tokenization pipeline.
///
/// `max_edges` fixes the padded sequence length: every tokenized graph comes
/// out with `node_count + max_edges` rows regardless of how many edges the
/// scan finds. Edges beyond the capacity are dropped (see
/// [`crate::tokens::assemble`]).
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Width of the spectral node embedding (dp). Controls positional
    /// resolution and the token row width `F + 2*dp + 4`.
    pub spectral_dim: usize,
    /// Number of edge-row slots reserved in the padded output.
    pub max_edges: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            spectral_dim: 3,
            max_edges: 3000,
        }
    }
}

impl TokenizerConfig {
    /// Token row width for a given raw feature width.
    pub fn row_width(&self, feature_width: usize) -> usize {
        feature_width + 2 * self.spectral_dim + 4
    }
}
