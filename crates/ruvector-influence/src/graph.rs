//! Sparse probabilistic graph store.
//!
//! [`ProbGraph`] holds a directed graph whose edges carry independent
//! activation probabilities. It keeps two CSR views built once at
//! construction:
//!
//! - `forward`: row `u` lists the out-edges `u -> v` (used by forward cascade
//!   simulation and degree heuristics);
//! - `reverse`: row `v` lists the in-edges `u -> v` (used by reverse-reachable
//!   sampling).
//!
//! Both views answer neighbour queries in O(degree). The graph is immutable
//! after construction.

use tracing::debug;

use crate::error::{InfluenceError, ValidationError};
use crate::types::CsrMatrix;
use crate::validation::{validate_csr_graph, validate_edges};

/// Directed graph with per-edge activation probabilities.
///
/// # Example
///
/// ```rust
/// use ruvector_influence::graph::ProbGraph;
///
/// let graph = ProbGraph::from_edges(3, vec![(0, 1, 0.5), (1, 2, 1.0)]).unwrap();
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.in_neighbors(2).collect::<Vec<_>>(), vec![(1, 1.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbGraph {
    forward: CsrMatrix<f32>,
    reverse: CsrMatrix<f32>,
}

impl ProbGraph {
    /// Build from `(source, destination, probability)` triples.
    ///
    /// Node ids must lie in `[0, num_nodes)` and probabilities in `[0, 1]`.
    /// Duplicate edges are kept and act as independent activation trials.
    ///
    /// # Errors
    ///
    /// Returns [`InfluenceError::InvalidGraph`] on the first structural
    /// violation.
    pub fn from_edges(
        num_nodes: usize,
        edges: impl IntoIterator<Item = (usize, usize, f32)>,
    ) -> Result<Self, InfluenceError> {
        let edges: Vec<_> = edges.into_iter().collect();
        validate_edges(num_nodes, &edges)?;

        let forward = CsrMatrix::from_coo(num_nodes, num_nodes, edges).ok_or_else(|| {
            ValidationError::DimensionMismatch("edge endpoint escaped validation".into())
        })?;
        Ok(Self::from_validated(forward))
    }

    /// Adopt pre-built CSR arrays after full structural validation.
    ///
    /// # Errors
    ///
    /// Returns [`InfluenceError::InvalidGraph`] if the CSR structure is
    /// malformed or any probability is outside `[0, 1]`.
    pub fn from_csr(forward: CsrMatrix<f32>) -> Result<Self, InfluenceError> {
        validate_csr_graph(&forward)?;
        Ok(Self::from_validated(forward))
    }

    fn from_validated(forward: CsrMatrix<f32>) -> Self {
        let reverse = forward.transpose();
        debug!(
            target: "ruvector_influence::graph",
            nodes = forward.rows,
            edges = forward.nnz(),
            "built probabilistic graph",
        );
        Self { forward, reverse }
    }

    /// Number of nodes `n`.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.forward.rows
    }

    /// Number of directed edges `m`.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.forward.nnz()
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: usize) -> usize {
        self.forward.row_degree(node)
    }

    /// In-degree of `node`.
    #[inline]
    pub fn in_degree(&self, node: usize) -> usize {
        self.reverse.row_degree(node)
    }

    /// `(destination, probability)` for each out-edge of `node`.
    #[inline]
    pub fn out_neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.forward.row_entries(node).map(|(v, &p)| (v, p))
    }

    /// `(source, probability)` for each in-edge of `node`.
    #[inline]
    pub fn in_neighbors(&self, node: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.reverse.row_entries(node).map(|(u, &p)| (u, p))
    }

    /// Forward CSR view (row = source).
    #[inline]
    pub fn forward(&self) -> &CsrMatrix<f32> {
        &self.forward
    }

    /// Reverse CSR view (row = destination).
    #[inline]
    pub fn reverse(&self) -> &CsrMatrix<f32> {
        &self.reverse
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
