//! Input validation for graphs and run parameters.
//!
//! All validation functions run eagerly before any sampling begins, so a run
//! either fails up front with a clear diagnostic or proceeds on inputs that
//! satisfy every invariant the sampler and estimator rely on.
//!
//! # Limits
//!
//! | Resource      | Limit        | Constant      |
//! |---------------|--------------|---------------|
//! | Nodes         | 10,000,000   | [`MAX_NODES`] |
//! | Edges         | 100,000,000  | [`MAX_EDGES`] |

use crate::error::{InfluenceError, ValidationError};
use crate::types::{CsrMatrix, InfluenceConfig};

// ---------------------------------------------------------------------------
// Resource limits
// ---------------------------------------------------------------------------

/// Maximum number of nodes.
pub const MAX_NODES: usize = 10_000_000;

/// Maximum number of directed edges.
pub const MAX_EDGES: usize = 100_000_000;

// ---------------------------------------------------------------------------
// Graph validation
// ---------------------------------------------------------------------------

#[inline]
fn check_size(nodes: usize, edges: usize) -> Result<(), ValidationError> {
    if nodes > MAX_NODES || edges > MAX_EDGES {
        return Err(ValidationError::GraphTooLarge {
            nodes,
            edges,
            max_nodes: MAX_NODES,
            max_edges: MAX_EDGES,
        });
    }
    Ok(())
}

#[inline]
fn check_probability(edge: usize, p: f32) -> Result<(), ValidationError> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(ValidationError::ProbabilityOutOfRange { edge, value: p });
    }
    Ok(())
}

/// Validate a list of `(source, destination, probability)` triples.
///
/// # Errors
///
/// Returns the first violation found, in edge order: out-of-range endpoint
/// ([`ValidationError::NodeOutOfRange`]) or bad probability
/// ([`ValidationError::ProbabilityOutOfRange`]).
pub fn validate_edges(
    num_nodes: usize,
    edges: &[(usize, usize, f32)],
) -> Result<(), ValidationError> {
    check_size(num_nodes, edges.len())?;

    for (edge, &(src, dst, p)) in edges.iter().enumerate() {
        for node in [src, dst] {
            if node >= num_nodes {
                return Err(ValidationError::NodeOutOfRange {
                    edge,
                    node,
                    nodes: num_nodes,
                });
            }
        }
        check_probability(edge, p)?;
    }

    Ok(())
}

/// Validate the structural integrity of a CSR adjacency.
///
/// Performs the following checks in order:
///
/// 1. The matrix is square and within [`MAX_NODES`] / [`MAX_EDGES`].
/// 2. `row_ptr` length equals `rows + 1`.
/// 3. `row_ptr` is monotonically non-decreasing.
/// 4. `row_ptr[0] == 0` and `row_ptr[rows] == nnz`.
/// 5. `col_indices` length equals `values` length.
/// 6. All column indices are less than `cols`.
/// 7. Every probability is finite and in `[0, 1]`.
///
/// # Errors
///
/// Returns [`ValidationError`] describing the first violation found.
///
/// # Examples
///
/// ```
/// use ruvector_influence::types::CsrMatrix;
/// use ruvector_influence::validation::validate_csr_graph;
///
/// let m = CsrMatrix::<f32>::from_coo(2, 2, vec![(0, 1, 0.5)]).unwrap();
/// assert!(validate_csr_graph(&m).is_ok());
/// ```
pub fn validate_csr_graph(matrix: &CsrMatrix<f32>) -> Result<(), ValidationError> {
    if matrix.rows != matrix.cols {
        return Err(ValidationError::DimensionMismatch(format!(
            "adjacency must be square, got {}x{}",
            matrix.rows, matrix.cols,
        )));
    }

    let nnz = matrix.values.len();
    check_size(matrix.rows, nnz)?;

    if matrix.row_ptr.len() != matrix.rows + 1 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr length {} does not equal rows + 1 = {}",
            matrix.row_ptr.len(),
            matrix.rows + 1,
        )));
    }

    for i in 1..matrix.row_ptr.len() {
        if matrix.row_ptr[i] < matrix.row_ptr[i - 1] {
            return Err(ValidationError::NonMonotonicRowPtrs { position: i });
        }
    }

    if matrix.row_ptr[0] != 0 {
        return Err(ValidationError::DimensionMismatch(format!(
            "row_ptr[0] = {} (expected 0)",
            matrix.row_ptr[0],
        )));
    }
    if matrix.row_ptr[matrix.rows] != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "values length {} does not match row_ptr[rows] = {}",
            nnz, matrix.row_ptr[matrix.rows],
        )));
    }

    if matrix.col_indices.len() != nnz {
        return Err(ValidationError::DimensionMismatch(format!(
            "col_indices length {} does not match values length {}",
            matrix.col_indices.len(),
            nnz,
        )));
    }

    for row in 0..matrix.rows {
        for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
            let col = matrix.col_indices[idx];
            if col >= matrix.cols {
                return Err(ValidationError::NodeOutOfRange {
                    edge: idx,
                    node: col,
                    nodes: matrix.cols,
                });
            }
            check_probability(idx, matrix.values[idx])?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Validate a run configuration.
///
/// # Rules
///
/// - `epsilon` finite, in `(0, 1)`.
/// - `ell` finite, `> 0`.
/// - `max_doublings >= 1`, `batch_size >= 1`, `memory_limit_bytes >= 1`.
/// - `kpt_sample_constant` finite, `> 0`.
///
/// # Errors
///
/// Returns [`InfluenceError::Configuration`] naming the first bad field.
pub fn validate_config(config: &InfluenceConfig) -> Result<(), InfluenceError> {
    if !config.epsilon.is_finite() || config.epsilon <= 0.0 || config.epsilon >= 1.0 {
        return Err(InfluenceError::configuration(
            "epsilon",
            config.epsilon,
            "(0.0, 1.0) exclusive",
        ));
    }
    if !config.ell.is_finite() || config.ell <= 0.0 {
        return Err(InfluenceError::configuration("ell", config.ell, "> 0.0"));
    }
    if config.max_doublings == 0 {
        return Err(InfluenceError::configuration("max_doublings", 0, ">= 1"));
    }
    if !config.kpt_sample_constant.is_finite() || config.kpt_sample_constant <= 0.0 {
        return Err(InfluenceError::configuration(
            "kpt_sample_constant",
            config.kpt_sample_constant,
            "> 0.0",
        ));
    }
    if config.batch_size == 0 {
        return Err(InfluenceError::configuration("batch_size", 0, ">= 1"));
    }
    if config.memory_limit_bytes == 0 {
        return Err(InfluenceError::configuration("memory_limit_bytes", 0, ">= 1"));
    }
    Ok(())
}

/// Validate the requested seed count against the node count.
///
/// # Errors
///
/// [`InfluenceError::Configuration`] if `k == 0` or `k > n`.
pub fn validate_seed_count(k: usize, num_nodes: usize) -> Result<(), InfluenceError> {
    if k == 0 {
        return Err(InfluenceError::configuration("k", 0, ">= 1"));
    }
    if k > num_nodes {
        return Err(InfluenceError::configuration(
            "k",
            k,
            format!("<= node count {num_nodes}"),
        ));
    }
    Ok(())
}

/// Validate a strategy tuning parameter (the RR-set count for RIS).
///
/// # Errors
///
/// [`InfluenceError::Configuration`] if `theta` is NaN, infinite or negative.
pub fn validate_theta(theta: f64) -> Result<(), InfluenceError> {
    if !theta.is_finite() || theta < 0.0 {
        return Err(InfluenceError::configuration(
            "theta",
            theta,
            "finite, >= 0.0",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_valid_edges() {
        let edges = vec![(0, 1, 0.5f32), (1, 2, 1.0), (2, 0, 0.0)];
        assert!(validate_edges(3, &edges).is_ok());
    }

    #[test]
    fn rejects_destination_out_of_range() {
        let edges = vec![(0, 1, 0.5f32), (1, 3, 0.5)];
        match validate_edges(3, &edges) {
            Err(ValidationError::NodeOutOfRange { edge, node, nodes }) => {
                assert_eq!((edge, node, nodes), (1, 3, 3));
            }
            other => panic!("expected NodeOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_probabilities() {
        for p in [-0.1f32, 1.01, f32::NAN, f32::INFINITY] {
            let err = validate_edges(2, &[(0, 1, p)]).unwrap_err();
            assert!(matches!(err, ValidationError::ProbabilityOutOfRange { edge: 0, .. }));
        }
    }

    #[test]
    fn rejects_non_monotonic_row_ptr() {
        let m = CsrMatrix {
            row_ptr: vec![0, 2, 1, 2],
            col_indices: vec![1, 2],
            values: vec![0.5f32, 0.5],
            rows: 3,
            cols: 3,
        };
        assert!(matches!(
            validate_csr_graph(&m),
            Err(ValidationError::NonMonotonicRowPtrs { position: 2 })
        ));
    }

    #[test]
    fn rejects_non_square_adjacency() {
        let m = CsrMatrix::<f32>::from_coo(2, 3, vec![(0, 2, 0.5)]).unwrap();
        assert!(matches!(
            validate_csr_graph(&m),
            Err(ValidationError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn rejects_row_ptr_tail_mismatch() {
        let m = CsrMatrix {
            row_ptr: vec![0, 1, 3],
            col_indices: vec![1],
            values: vec![0.5f32],
            rows: 2,
            cols: 2,
        };
        assert!(validate_csr_graph(&m).is_err());
    }

    #[test]
    fn config_defaults_are_valid() {
        assert!(validate_config(&InfluenceConfig::default()).is_ok());
    }

    #[test]
    fn config_rejects_epsilon_bounds() {
        for epsilon in [0.0, 1.0, -0.5, f64::NAN] {
            let config = InfluenceConfig {
                epsilon,
                ..Default::default()
            };
            let err = validate_config(&config).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn config_rejects_non_positive_ell() {
        let config = InfluenceConfig {
            ell: 0.0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn config_rejects_zero_batch() {
        let config = InfluenceConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn seed_count_bounds() {
        assert!(validate_seed_count(1, 1).is_ok());
        assert!(validate_seed_count(0, 5).is_err());
        let err = validate_seed_count(6, 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn theta_must_be_finite() {
        assert!(validate_theta(12.5).is_ok());
        assert!(validate_theta(f64::INFINITY).is_err());
        assert!(validate_theta(-1.0).is_err());
    }
}
