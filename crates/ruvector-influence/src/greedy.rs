//! Greedy maximum coverage over an RR-set pool.
//!
//! Each round picks the unselected node covering the most still-uncovered
//! sets, marks those sets covered and decrements the counts of every other
//! member. The counts therefore always equal the exact marginal gains, with
//! no full rescan of the pool per round. The classic `(1 - 1/e)` bound for
//! monotone submodular coverage applies.

use tracing::debug;

use crate::coverage::{CoverageIndex, RrPool};
use crate::types::SeedSet;

/// Outcome of [`greedy_max_coverage`].
#[derive(Debug, Clone, PartialEq)]
pub struct GreedySelection {
    /// Seeds in selection order.
    pub seeds: SeedSet,
    /// Newly covered sets per round; non-increasing.
    pub marginal_gains: Vec<usize>,
    /// Sets covered by all seeds together.
    pub covered_sets: usize,
    /// Pool size the selection ran on.
    pub total_sets: usize,
}

impl GreedySelection {
    /// Fraction of pool sets covered, `0.0` for an empty pool.
    pub fn coverage_fraction(&self) -> f64 {
        if self.total_sets == 0 {
            0.0
        } else {
            self.covered_sets as f64 / self.total_sets as f64
        }
    }
}

/// Select `min(k, n)` seeds maximising RR-set coverage.
///
/// Ties go to the smallest node id. Once every set is covered the remaining
/// rounds keep picking the smallest unselected ids at zero gain, so the
/// result always has `min(k, n)` distinct seeds.
///
/// `index` must have been built over all of `pool`.
///
/// # Example
///
/// ```
/// use ruvector_influence::coverage::{CoverageIndex, RrPool};
/// use ruvector_influence::greedy::greedy_max_coverage;
/// use ruvector_influence::sampler::RrSet;
///
/// let pool = RrPool::from(vec![
///     RrSet::new([1, 0]).unwrap(),
///     RrSet::new([2, 0]).unwrap(),
///     RrSet::new([2]).unwrap(),
/// ]);
/// let index = CoverageIndex::build(&pool, 3).unwrap();
/// let greedy = greedy_max_coverage(&pool, &index, 2);
/// assert_eq!(greedy.seeds.as_slice(), &[0, 2]);
/// assert_eq!(greedy.marginal_gains, vec![2, 1]);
/// ```
pub fn greedy_max_coverage(pool: &RrPool, index: &CoverageIndex, k: usize) -> GreedySelection {
    debug_assert_eq!(index.indexed_sets(), pool.len(), "coverage index is stale");

    let n = index.num_nodes();
    let rounds = k.min(n);

    let mut counts: Vec<usize> = (0..n).map(|v| index.covering(v).len()).collect();
    let mut selected = vec![false; n];
    let mut covered = vec![false; pool.len()];
    let mut covered_sets = 0usize;
    let mut seeds = Vec::with_capacity(rounds);
    let mut marginal_gains = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        let Some((best, gain)) = argmax_gain(&counts, &selected) else {
            break;
        };
        selected[best] = true;
        seeds.push(best);
        marginal_gains.push(gain);

        for &set_idx in index.covering(best) {
            if covered[set_idx] {
                continue;
            }
            covered[set_idx] = true;
            covered_sets += 1;
            if let Some(set) = pool.get(set_idx) {
                for &u in set.nodes() {
                    counts[u] -= 1;
                }
            }
        }
    }

    debug!(
        target: "ruvector_influence::greedy",
        k = rounds,
        covered_sets,
        total_sets = pool.len(),
        "greedy max coverage finished",
    );

    GreedySelection {
        seeds: SeedSet::from_ordered(seeds),
        marginal_gains,
        covered_sets,
        total_sets: pool.len(),
    }
}

/// Prefer the larger gain, then the smaller id.
#[inline]
fn better(a: (usize, usize), b: (usize, usize)) -> (usize, usize) {
    let ((va, ga), (vb, gb)) = (a, b);
    if gb > ga || (gb == ga && vb < va) {
        b
    } else {
        a
    }
}

#[cfg(feature = "parallel")]
fn argmax_gain(counts: &[usize], selected: &[bool]) -> Option<(usize, usize)> {
    use rayon::prelude::*;

    counts
        .par_iter()
        .enumerate()
        .filter(|&(v, _)| !selected[v])
        .map(|(v, &c)| (v, c))
        .reduce_with(better)
}

#[cfg(not(feature = "parallel"))]
fn argmax_gain(counts: &[usize], selected: &[bool]) -> Option<(usize, usize)> {
    counts
        .iter()
        .enumerate()
        .filter(|&(v, _)| !selected[v])
        .map(|(v, &c)| (v, c))
        .reduce(better)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
