//! Error types for the influence maximization crate.
//!
//! Provides structured error variants for malformed graphs, invalid
//! configuration, and pool memory exhaustion. All errors implement
//! `std::error::Error` via `thiserror`.
//!
//! Statistical non-convergence of the KPT estimator is deliberately absent:
//! it is reported through [`KptEstimate::converged`](crate::estimator::KptEstimate)
//! and never aborts a run.

use std::path::PathBuf;

/// Primary error type for influence maximization operations.
#[derive(Debug, thiserror::Error)]
pub enum InfluenceError {
    /// The input graph violates a structural invariant.
    #[error("invalid graph: {0}")]
    InvalidGraph(#[from] ValidationError),

    /// An algorithm parameter is outside its valid range.
    #[error("invalid configuration: {name} = {value} (expected {expected})")]
    Configuration {
        /// Name of the parameter.
        name: String,
        /// The offending value, rendered as a string.
        value: String,
        /// Human-readable description of the valid range.
        expected: String,
    },

    /// Growing the RR-set pool would exceed the configured memory ceiling.
    #[error("resource exhausted: {reason} ({requested_bytes} bytes requested, limit {limit_bytes})")]
    ResourceExhausted {
        /// Which allocation hit the ceiling.
        reason: String,
        /// Bytes the pool would hold after the allocation.
        requested_bytes: usize,
        /// Configured ceiling.
        limit_bytes: usize,
    },

    /// The edge-list file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A row of the edge list could not be parsed.
    #[error("malformed edge on line {line}: {detail}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the row.
        detail: String,
    },
}

/// Coarse classification of an [`InfluenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed graph, unreadable or unparseable input.
    Structural,
    /// Invalid `k`, `epsilon`, `ell` or tuning parameter.
    Configuration,
    /// Pool growth beyond the memory ceiling.
    ResourceExhausted,
}

impl InfluenceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InfluenceError::InvalidGraph(_)
            | InfluenceError::Io { .. }
            | InfluenceError::Parse { .. } => ErrorKind::Structural,
            InfluenceError::Configuration { .. } => ErrorKind::Configuration,
            InfluenceError::ResourceExhausted { .. } => ErrorKind::ResourceExhausted,
        }
    }

    pub(crate) fn configuration(
        name: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        InfluenceError::Configuration {
            name: name.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

/// Structural validation errors for graph inputs.
///
/// These are raised eagerly while the graph is built so that sampling never
/// runs on a malformed adjacency.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Array lengths are inconsistent (e.g. `row_ptr` length vs node count).
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// An edge endpoint is outside `[0, n)`.
    #[error("edge {edge} references node {node} outside [0, {nodes})")]
    NodeOutOfRange {
        /// Index of the offending edge in input order.
        edge: usize,
        /// Offending node id.
        node: usize,
        /// Declared node count.
        nodes: usize,
    },

    /// An activation probability is NaN, infinite, or outside `[0, 1]`.
    #[error("edge {edge} has activation probability {value} outside [0, 1]")]
    ProbabilityOutOfRange {
        /// Index of the offending edge.
        edge: usize,
        /// Offending probability.
        value: f32,
    },

    /// The `row_ptr` array is not monotonically non-decreasing.
    #[error("row_ptr is not monotonically non-decreasing at position {position}")]
    NonMonotonicRowPtrs {
        /// Position in `row_ptr` where the violation was detected.
        position: usize,
    },

    /// Graph size exceeds the implementation limit.
    #[error("graph with {nodes} nodes and {edges} edges exceeds limits ({max_nodes} nodes, {max_edges} edges)")]
    GraphTooLarge {
        /// Number of nodes.
        nodes: usize,
        /// Number of edges.
        edges: usize,
        /// Maximum supported node count.
        max_nodes: usize,
        /// Maximum supported edge count.
        max_edges: usize,
    },
}
