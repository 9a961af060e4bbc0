use nalgebra::DMatrix;

use crate::error::{Result, TokenizerError};

/// Build the symmetric-normalized Laplacian \( L = I - D^{-1/2} A D^{-1/2} \).
///
/// `D^{-1/2}` uses the pseudo-inverse of the degree matrix: a degree of zero
/// maps to zero instead of dividing by zero, so isolated nodes contribute
/// empty rows/columns to the normalized adjacency and never produce NaN/Inf.
/// The diagonal stays at exactly 1 for every node, isolated ones included.
pub fn normalized_laplacian(adjacency: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if adjacency.nrows() != adjacency.ncols() {
        return Err(TokenizerError::invalid(format!(
            "adjacency matrix must be square, got {} x {}",
            adjacency.nrows(),
            adjacency.ncols()
        )));
    }

    let n = adjacency.nrows();

    let mut inv_sqrt_degrees = vec![0.0f64; n];
    for i in 0..n {
        let degree: f64 = adjacency.row(i).iter().copied().sum();
        if degree > 0.0 {
            inv_sqrt_degrees[i] = 1.0 / degree.sqrt();
        }
    }

    let mut laplacian = DMatrix::identity(n, n);
    for i in 0..n {
        for j in 0..n {
            let scaled = inv_sqrt_degrees[i] * adjacency[(i, j)] * inv_sqrt_degrees[j];
            laplacian[(i, j)] -= scaled;
        }
    }

    Ok(laplacian)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_edge_laplacian_matches_closed_form() {
        let adjacency = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let lap = normalized_laplacian(&adjacency).expect("laplacian");
        assert_relative_eq!(lap[(0, 0)], 1.0);
        assert_relative_eq!(lap[(1, 1)], 1.0);
        assert_relative_eq!(lap[(0, 1)], -1.0);
        assert_relative_eq!(lap[(1, 0)], -1.0);
    }

    #[test]
    fn isolated_node_keeps_unit_diagonal_and_zero_coupling() {
        // node 2 has degree zero
        let adjacency =
            DMatrix::from_row_slice(3, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let lap = normalized_laplacian(&adjacency).expect("laplacian");
        assert_relative_eq!(lap[(2, 2)], 1.0);
        assert_relative_eq!(lap[(2, 0)], 0.0);
        assert_relative_eq!(lap[(0, 2)], 0.0);
        assert!(lap.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn non_square_adjacency_is_invalid() {
        let adjacency = DMatrix::from_row_slice(2, 3, &[0.0; 6]);
        assert!(matches!(
            normalized_laplacian(&adjacency),
            Err(crate::TokenizerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn empty_graph_yields_empty_laplacian() {
        let adjacency = DMatrix::<f64>::zeros(0, 0);
        let lap = normalized_laplacian(&adjacency).expect("laplacian");
        assert_eq!(lap.nrows(), 0);
        assert_eq!(lap.ncols(), 0);
    }
}
