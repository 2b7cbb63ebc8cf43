//! Core types for influence maximization.
//!
//! Provides [`CsrMatrix`] for compressed sparse row storage, the
//! [`InfluenceConfig`] parameter block, seed-set and result types, and the
//! [`Strategy`] identifier used by the selection registry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::estimator::KptEstimate;
use crate::events::InfluenceEvent;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default confidence exponent: the guarantee holds with probability `1 - 1/n^l`.
pub const L_CONSTANT: f64 = 1.0;

/// Default accuracy: seeds are within `1 - 1/e - epsilon` of optimal.
pub const EPSILON_CONSTANT: f64 = 0.2;

/// Default upper bound on KPT doubling rounds.
pub const NUM_TRIALS: usize = 100;

/// Default number of RR sets appended to the pool per batch.
pub const NUM_ROWS_PER_BATCH: usize = 100_000;

/// Default ceiling on memory held by the RR pool and coverage index (2 GiB).
pub const DEFAULT_MEMORY_LIMIT: usize = 2 * 1024 * 1024 * 1024;

// ---------------------------------------------------------------------------
// CsrMatrix<T>
// ---------------------------------------------------------------------------

/// Compressed Sparse Row (CSR) matrix.
///
/// # Layout
///
/// For a matrix with `m` rows and `nnz` non-zeros:
/// - `row_ptr` has length `m + 1`
/// - `col_indices` and `values` each have length `nnz`
/// - Row `i` spans indices `row_ptr[i]..row_ptr[i+1]`
///
/// As an adjacency structure, row `i` holds the out-edges of node `i` and
/// `values` the per-edge activation probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    /// Row pointers: `row_ptr[i]` is the start index in `col_indices`/`values`
    /// for row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices for each non-zero entry.
    pub col_indices: Vec<usize>,
    /// Values for each non-zero entry.
    pub values: Vec<T>,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl<T> CsrMatrix<T> {
    /// Number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of non-zeros in a specific row (the out-degree for an
    /// adjacency matrix).
    #[inline]
    pub fn row_degree(&self, row: usize) -> usize {
        self.row_ptr[row + 1] - self.row_ptr[row]
    }

    /// Iterate over `(col_index, &value)` pairs for the given row.
    #[inline]
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, &T)> {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter())
    }
}

impl<T: Copy + Default> CsrMatrix<T> {
    /// Transpose: produces `A^T` in CSR form.
    ///
    /// Uses a two-pass counting sort in O(nnz + rows + cols) time and
    /// O(nnz) extra memory. Row `v` of the transpose lists the in-edges of
    /// `v`, which is what reverse sampling walks.
    pub fn transpose(&self) -> CsrMatrix<T> {
        let nnz = self.nnz();
        let t_rows = self.cols;
        let t_cols = self.rows;

        // Pass 1: count entries per new row (= old column).
        let mut row_ptr = vec![0usize; t_rows + 1];
        for &c in &self.col_indices {
            row_ptr[c + 1] += 1;
        }
        for i in 1..=t_rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        // Pass 2: scatter entries into the transposed arrays.
        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::default(); nnz];
        let mut cursor = row_ptr.clone();

        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let c = self.col_indices[idx];
                let dest = cursor[c];
                col_indices[dest] = row;
                values[dest] = self.values[idx];
                cursor[c] += 1;
            }
        }

        CsrMatrix {
            row_ptr,
            col_indices,
            values,
            rows: t_rows,
            cols: t_cols,
        }
    }

    /// Build a CSR matrix from COO (coordinate) triplets.
    ///
    /// Entries are ordered by `(row, col)`; duplicates at the same position
    /// are kept as separate entries in input order. Returns `None` if any
    /// coordinate is out of bounds; callers that need a diagnostic run
    /// [`validation`](crate::validation) first.
    pub fn from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Option<Self> {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_by_key(|(r, c, _)| (*r, *c));

        let nnz = sorted.len();
        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        for &(r, c, _) in &sorted {
            if r >= rows || c >= cols {
                return None;
            }
            row_ptr[r + 1] += 1;
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        for (_, c, v) in sorted {
            col_indices.push(c);
            values.push(v);
        }

        Some(Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        })
    }
}

// ---------------------------------------------------------------------------
// Strategy identifiers
// ---------------------------------------------------------------------------

/// Seed-selection strategy identifier.
///
/// Each variant corresponds to a [`NodeSelection`](crate::strategy::NodeSelection)
/// implementation registered in [`selection_for`](crate::strategy::selection_for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Reverse influence sampling with greedy max-coverage.
    ///
    /// Carries the `(1 - 1/e - epsilon)` guarantee; the reference strategy.
    Ris,
    /// Highest probability-weighted out-degree first.
    Degree,
    /// Uniformly random distinct nodes.
    Random,
}

impl Strategy {
    /// All registered strategies, in registry order.
    pub const ALL: [Strategy; 3] = [Strategy::Ris, Strategy::Degree, Strategy::Random];
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Ris => write!(f, "ris"),
            Strategy::Degree => write!(f, "degree"),
            Strategy::Random => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ris" | "tim" => Ok(Strategy::Ris),
            "degree" | "max-degree" => Ok(Strategy::Degree),
            "random" => Ok(Strategy::Random),
            other => Err(format!(
                "unknown strategy '{other}' (expected one of: ris, degree, random)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Seed set
// ---------------------------------------------------------------------------

/// Ordered sequence of distinct seed nodes.
///
/// Order is selection order, so greedy tie-breaks are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    nodes: Vec<usize>,
}

impl SeedSet {
    /// Wrap an already-deduplicated selection.
    pub(crate) fn from_ordered(nodes: Vec<usize>) -> Self {
        debug_assert!(
            {
                let mut sorted = nodes.clone();
                sorted.sort_unstable();
                sorted.windows(2).all(|w| w[0] != w[1])
            },
            "seed set contains duplicates: {nodes:?}",
        );
        Self { nodes }
    }

    /// Seeds in selection order.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.nodes
    }

    /// Number of seeds.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if no seed was selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Membership test.
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Iterate seeds in selection order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().copied()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<usize> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a SeedSet {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable parameters for a seed-selection run.
///
/// All fields have defaults matching the published TIM bounds; override them
/// with struct update syntax.
///
/// # Example
///
/// ```rust
/// use ruvector_influence::types::InfluenceConfig;
///
/// let config = InfluenceConfig {
///     epsilon: 0.1,
///     seed: 42,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceConfig {
    /// Accuracy `epsilon` in `(0, 1)`.
    ///
    /// Default: `0.2`.
    pub epsilon: f64,

    /// Confidence exponent `l > 0`.
    ///
    /// Default: `1.0`.
    pub ell: f64,

    /// Random seed; `0` seeds from the OS entropy source.
    ///
    /// Default: `0`.
    pub seed: u64,

    /// Upper bound on KPT doubling rounds (the loop also stops at
    /// `log2(n) - 1`).
    ///
    /// Default: `100`.
    pub max_doublings: usize,

    /// Constant in the per-round sample count
    /// `c_i = (c * l * ln n + c * ln log2 n) * 2^i`.
    ///
    /// Default: `6.0`.
    pub kpt_sample_constant: f64,

    /// Tighten the KPT estimate with the greedy coverage of the stopping
    /// round's pool.
    ///
    /// Default: `true`.
    pub kpt_refinement: bool,

    /// RR sets appended to the pool per batch.
    ///
    /// Default: `100_000`.
    pub batch_size: usize,

    /// Ceiling on bytes held by the RR pool plus coverage index.
    ///
    /// Default: 2 GiB.
    pub memory_limit_bytes: usize,
}

impl Default for InfluenceConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON_CONSTANT,
            ell: L_CONSTANT,
            seed: 0,
            max_doublings: NUM_TRIALS,
            kpt_sample_constant: 6.0,
            kpt_refinement: true,
            batch_size: NUM_ROWS_PER_BATCH,
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl InfluenceConfig {
    /// Validate every field; see [`validate_config`](crate::validation::validate_config).
    pub fn validate(&self) -> Result<(), crate::error::InfluenceError> {
        crate::validation::validate_config(self)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Result of a full [`InfluenceMaximizer`](crate::pipeline::InfluenceMaximizer) run.
#[derive(Debug, Clone)]
pub struct InfluenceResult {
    /// Selected seeds, in selection order.
    pub seeds: SeedSet,
    /// Strategy that produced the seeds.
    pub strategy: Strategy,
    /// Required sample bound before dividing by KPT.
    pub lambda: f64,
    /// Lower-bound spread estimate.
    pub kpt: KptEstimate,
    /// RR-set count handed to the strategy (`ceil(lambda / kpt)`).
    pub theta: usize,
    /// Wall-clock time of the whole run.
    pub wall_time: Duration,
    /// Pipeline events in emission order.
    pub events: Vec<InfluenceEvent>,
}
