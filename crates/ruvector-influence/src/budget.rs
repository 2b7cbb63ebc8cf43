//! Memory budget enforcement for RR-set pools.
//!
//! [`PoolBudget`] tracks the bytes held by an RR pool and its coverage index
//! against a ceiling. Growth beyond the ceiling is a fatal
//! [`InfluenceError::ResourceExhausted`]: an undersized pool silently voids
//! the approximation guarantee, so the sample count is never truncated.
//!
//! Callers run [`check_projected`](PoolBudget::check_projected) once before
//! sampling starts, then [`charge`](PoolBudget::charge) after each batch with
//! the bytes actually added.

use std::time::Instant;

use crate::error::InfluenceError;

/// Approximate bytes one RR-set membership costs across pool and index:
/// the node id in the set plus the set id in the node's coverage list.
pub const BYTES_PER_MEMBERSHIP: usize = 2 * std::mem::size_of::<usize>();

/// Fixed per-set overhead (the `Vec` header of the set and its covered flag).
pub const BYTES_PER_SET: usize = std::mem::size_of::<Vec<usize>>() + 1;

/// Tracks pool memory against a ceiling.
///
/// Not `Clone`: each selection run owns exactly one.
///
/// # Example
///
/// ```
/// use ruvector_influence::budget::PoolBudget;
///
/// let mut budget = PoolBudget::new(1 << 20);
/// budget.charge(4096).unwrap();
/// assert_eq!(budget.used(), 4096);
/// assert!(budget.charge(1 << 20).is_err());
/// ```
pub struct PoolBudget {
    start_time: Instant,
    used: usize,
    limit: usize,
}

impl PoolBudget {
    /// Create a budget with the given ceiling in bytes.
    pub fn new(limit: usize) -> Self {
        Self {
            start_time: Instant::now(),
            used: 0,
            limit,
        }
    }

    /// Estimated bytes for `sets` RR sets of mean size `mean_set_len`.
    pub fn estimate_bytes(sets: usize, mean_set_len: f64) -> usize {
        let memberships = (sets as f64 * mean_set_len.max(1.0)).ceil();
        let bytes = memberships * BYTES_PER_MEMBERSHIP as f64 + sets as f64 * BYTES_PER_SET as f64;
        if bytes >= usize::MAX as f64 {
            usize::MAX
        } else {
            bytes as usize
        }
    }

    /// Reject a planned pool of `sets` RR sets before any of it is sampled.
    ///
    /// # Errors
    ///
    /// [`InfluenceError::ResourceExhausted`] if the projection exceeds the
    /// ceiling.
    pub fn check_projected(&self, sets: usize, mean_set_len: f64) -> Result<(), InfluenceError> {
        let projected = self.used.saturating_add(Self::estimate_bytes(sets, mean_set_len));
        if projected > self.limit {
            return Err(InfluenceError::ResourceExhausted {
                reason: format!(
                    "projected pool of {sets} RR sets (mean size {mean_set_len:.2}) does not fit",
                ),
                requested_bytes: projected,
                limit_bytes: self.limit,
            });
        }
        Ok(())
    }

    /// Record `additional` bytes of pool growth.
    ///
    /// On failure the internal counter is left unchanged.
    ///
    /// # Errors
    ///
    /// [`InfluenceError::ResourceExhausted`] if the total would exceed the
    /// ceiling.
    pub fn charge(&mut self, additional: usize) -> Result<(), InfluenceError> {
        let new_total = self.used.saturating_add(additional);
        if new_total > self.limit {
            return Err(InfluenceError::ResourceExhausted {
                reason: format!(
                    "RR pool growth after {:.2?} ({} + {} bytes)",
                    self.start_time.elapsed(),
                    self.used,
                    additional,
                ),
                requested_bytes: new_total,
                limit_bytes: self.limit,
            });
        }
        self.used = new_total;
        Ok(())
    }

    /// Bytes recorded so far.
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Configured ceiling.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
