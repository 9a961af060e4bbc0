use nalgebra::{DMatrix, SymmetricEigen};

use crate::error::{Result, TokenizerError};
use crate::spectral::laplacian::normalized_laplacian;

const EIGEN_EPSILON: f64 = 1.0e-12;

fn eigen_iteration_budget(n: usize) -> usize {
    (n * 30).max(1000)
}

/// Compute the N x dp spectral node embedding from the adjacency matrix.
///
/// Eigenpairs of the normalized Laplacian are sorted by eigenvalue ascending
/// and the eigenvectors ranked 1..=dp form the embedding columns; the lowest
/// eigenvector is near-constant for connected graphs and carries no
/// discriminative structure, so it is always skipped when N > dp. For N <= dp
/// all N sorted eigenvectors fill the leading columns and the rest stay zero.
///
/// Isolated (degree-0) nodes get all-zero embedding rows, consistent with the
/// pseudo-inverse degree handling in [`normalized_laplacian`].
pub fn spectral_embedding(adjacency: &DMatrix<f64>, spectral_dim: usize) -> Result<DMatrix<f64>> {
    if spectral_dim == 0 {
        return Err(TokenizerError::invalid("embedding width must be at least 1"));
    }

    let laplacian = normalized_laplacian(adjacency)?;
    let n = laplacian.nrows();
    if n == 0 {
        return Ok(DMatrix::zeros(0, spectral_dim));
    }

    // L is symmetric up to floating-point noise; folding the noise away keeps
    // the decomposition real, so there is no imaginary component left for
    // downstream callers to discard.
    let symmetric = 0.5 * (&laplacian + laplacian.transpose());
    let max_iterations = eigen_iteration_budget(n);
    let eigen = SymmetricEigen::try_new(symmetric, EIGEN_EPSILON, max_iterations)
        .ok_or(TokenizerError::NumericalDegenerate { max_iterations })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut embedding = DMatrix::zeros(n, spectral_dim);
    if n > spectral_dim {
        for col in 0..spectral_dim {
            embedding.set_column(col, &eigen.eigenvectors.column(order[col + 1]));
        }
    } else {
        for col in 0..n {
            embedding.set_column(col, &eigen.eigenvectors.column(order[col]));
        }
    }

    for i in 0..n {
        let degree: f64 = adjacency.row(i).iter().copied().sum();
        if degree <= 0.0 {
            embedding.row_mut(i).fill(0.0);
        }
    }

    Ok(embedding)
}
