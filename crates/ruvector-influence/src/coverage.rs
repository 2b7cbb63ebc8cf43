//! RR-set pool and inverted coverage index.
//!
//! [`RrPool`] is an append-only sequence of RR sets; a set's position is its
//! stable identifier. [`CoverageIndex`] maps every node to the ascending list
//! of pool positions whose set contains it. The index is a derived cache: it
//! can always be rebuilt from the pool, and
//! [`is_consistent_with`](CoverageIndex::is_consistent_with) checks the two
//! agree.
//!
//! # Batched indexing
//!
//! New sets are indexed in one reduction per batch rather than with
//! fine-grained locking:
//!
//! 1. per-node membership counts over the new sets (a rayon fold/reduce under
//!    the `parallel` feature);
//! 2. each touched node's list reserves its count;
//! 3. set positions are scattered in ascending order, so every list stays
//!    sorted without a final sort.

use std::collections::HashMap;

use crate::error::{InfluenceError, ValidationError};
use crate::sampler::RrSet;

// ---------------------------------------------------------------------------
// RrPool
// ---------------------------------------------------------------------------

/// Append-only collection of RR sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RrPool {
    sets: Vec<RrSet>,
    heap_bytes: usize,
}

impl RrPool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch; returns the heap bytes it added.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = RrSet>) -> usize {
        let before = self.heap_bytes;
        for set in batch {
            self.heap_bytes += set.heap_bytes() + std::mem::size_of::<RrSet>();
            self.sets.push(set);
        }
        self.heap_bytes - before
    }

    /// Append one set; returns its position.
    pub fn push(&mut self, set: RrSet) -> usize {
        self.extend(std::iter::once(set));
        self.sets.len() - 1
    }

    /// Number of sets.
    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// `true` if the pool holds no sets.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Set at position `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<&RrSet> {
        self.sets.get(idx)
    }

    /// All sets in insertion order.
    #[inline]
    pub fn sets(&self) -> &[RrSet] {
        &self.sets
    }

    /// Approximate heap bytes held by the pool.
    #[inline]
    pub fn heap_bytes(&self) -> usize {
        self.heap_bytes
    }

    /// Mean set size, or `0.0` for an empty pool.
    pub fn mean_set_len(&self) -> f64 {
        if self.sets.is_empty() {
            return 0.0;
        }
        self.sets.iter().map(RrSet::len).sum::<usize>() as f64 / self.sets.len() as f64
    }
}

impl From<Vec<RrSet>> for RrPool {
    fn from(sets: Vec<RrSet>) -> Self {
        let mut pool = RrPool::new();
        pool.extend(sets);
        pool
    }
}

// ---------------------------------------------------------------------------
// CoverageIndex
// ---------------------------------------------------------------------------

/// Inverted index from node id to the pool positions covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageIndex {
    lists: Vec<Vec<usize>>,
    indexed: usize,
}

impl CoverageIndex {
    /// Empty index over `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            lists: vec![Vec::new(); num_nodes],
            indexed: 0,
        }
    }

    /// Index every set of `pool`.
    ///
    /// # Errors
    ///
    /// [`InfluenceError::InvalidGraph`] if a set holds a node outside
    /// `[0, num_nodes)`.
    pub fn build(pool: &RrPool, num_nodes: usize) -> Result<Self, InfluenceError> {
        let mut index = Self::new(num_nodes);
        index.extend(pool)?;
        Ok(index)
    }

    /// Index the sets appended to `pool` since the last call.
    ///
    /// Returns the heap bytes added. The index is left unchanged on error.
    ///
    /// # Errors
    ///
    /// [`InfluenceError::InvalidGraph`] if a new set holds a node outside
    /// `[0, num_nodes)`.
    pub fn extend(&mut self, pool: &RrPool) -> Result<usize, InfluenceError> {
        let start = self.indexed;
        let new_sets = pool.sets().get(start..).unwrap_or(&[]);
        if new_sets.is_empty() {
            return Ok(0);
        }

        let num_nodes = self.lists.len();
        for (offset, set) in new_sets.iter().enumerate() {
            if let Some(&node) = set.nodes().iter().find(|&&v| v >= num_nodes) {
                return Err(ValidationError::NodeOutOfRange {
                    edge: start + offset,
                    node,
                    nodes: num_nodes,
                }
                .into());
            }
        }

        let counts = membership_counts(new_sets);
        let mut added = 0usize;
        for (&node, &count) in &counts {
            let list = &mut self.lists[node];
            let before = list.capacity();
            list.reserve(count);
            added += (list.capacity() - before) * std::mem::size_of::<usize>();
        }

        for (offset, set) in new_sets.iter().enumerate() {
            for &v in set.nodes() {
                self.lists[v].push(start + offset);
            }
        }
        self.indexed = pool.len();
        Ok(added)
    }

    /// Pool positions whose set contains `node`, ascending.
    #[inline]
    pub fn covering(&self, node: usize) -> &[usize] {
        &self.lists[node]
    }

    /// Number of nodes covered by the index.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.lists.len()
    }

    /// Number of pool sets indexed so far.
    #[inline]
    pub fn indexed_sets(&self) -> usize {
        self.indexed
    }

    /// Approximate heap bytes held by the index.
    pub fn heap_bytes(&self) -> usize {
        self.lists
            .iter()
            .map(|l| l.capacity() * std::mem::size_of::<usize>())
            .sum::<usize>()
            + self.lists.len() * std::mem::size_of::<Vec<usize>>()
    }

    /// `true` if this index equals an independent rebuild from `pool`.
    pub fn is_consistent_with(&self, pool: &RrPool) -> bool {
        if self.indexed != pool.len() {
            return false;
        }
        let mut fresh: Vec<Vec<usize>> = vec![Vec::new(); self.lists.len()];
        for (idx, set) in pool.sets().iter().enumerate() {
            for &v in set.nodes() {
                match fresh.get_mut(v) {
                    Some(list) => list.push(idx),
                    None => return false,
                }
            }
        }
        fresh == self.lists
    }
}

/// Per-node membership counts over `sets`.
#[cfg(feature = "parallel")]
fn membership_counts(sets: &[RrSet]) -> HashMap<usize, usize> {
    use rayon::prelude::*;

    sets.par_iter()
        .fold(HashMap::new, |mut acc: HashMap<usize, usize>, set| {
            for &v in set.nodes() {
                *acc.entry(v).or_insert(0) += 1;
            }
            acc
        })
        .reduce(HashMap::new, |mut a, b| {
            for (v, c) in b {
                *a.entry(v).or_insert(0) += c;
            }
            a
        })
}

#[cfg(not(feature = "parallel"))]
fn membership_counts(sets: &[RrSet]) -> HashMap<usize, usize> {
    let mut acc = HashMap::new();
    for set in sets {
        for &v in set.nodes() {
            *acc.entry(v).or_insert(0) += 1;
        }
    }
    acc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
