//! Reverse-reachable (RR) set sampling.
//!
//! An RR set for a target `t` is the set of nodes that reach `t` in one
//! random realisation of the graph, where every edge `u -> v` is live
//! independently with its activation probability. It is sampled by a reverse
//! breadth-first search from `t`: for each in-edge of a frontier node, an
//! independent Bernoulli trial decides whether the source is pulled in.
//!
//! # Randomness
//!
//! Samplers never own a shared generator. Single samples draw from the rng
//! passed by the caller; [`sample_rr_sets`] draws one base seed from it and
//! gives every fixed-size chunk its own [`StdRng`] derived from that base and
//! the chunk index. The output is therefore identical with or without the
//! `parallel` feature and independent of the rayon thread count.
//!
//! # Complexity
//!
//! A sample costs O(edges examined). The visited marks live in a scratch
//! buffer owned by the [`RrSampler`] and are cleared only for touched nodes,
//! so repeated sampling never pays O(n) per set.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{InfluenceError, ValidationError};
use crate::graph::ProbGraph;

/// RR sets generated per independently seeded chunk.
pub const SAMPLES_PER_CHUNK: usize = 1024;

/// Stride between per-chunk seeds.
const CHUNK_SEED_STRIDE: u64 = 1_000_003;

/// Generator for a configured seed: `0` draws from OS entropy, anything else
/// is deterministic.
pub fn rng_for_seed(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

/// Generator for chunk `chunk_idx` of a batch seeded with `base_seed`.
pub(crate) fn chunk_rng(base_seed: u64, chunk_idx: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add((chunk_idx as u64).wrapping_mul(CHUNK_SEED_STRIDE)))
}

/// Seed for an independent stream derived from `seed`. Entropy stays entropy.
pub(crate) fn stream_seed(seed: u64, stream: u64) -> u64 {
    if seed == 0 {
        return 0;
    }
    match seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)) {
        0 => 1,
        derived => derived,
    }
}

// ---------------------------------------------------------------------------
// RrSet
// ---------------------------------------------------------------------------

/// One reverse-reachable set: distinct node ids, sampled target first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrSet {
    nodes: Vec<usize>,
}

impl RrSet {
    /// Build from node ids; the first id is the target. Later duplicates are
    /// dropped. Returns `None` for an empty list.
    pub fn new(nodes: impl IntoIterator<Item = usize>) -> Option<Self> {
        let mut out: Vec<usize> = Vec::new();
        for v in nodes {
            if !out.contains(&v) {
                out.push(v);
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(Self { nodes: out })
        }
    }

    /// The node the reverse search started from.
    #[inline]
    pub fn target(&self) -> usize {
        self.nodes[0]
    }

    /// Members in discovery order.
    #[inline]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Number of members (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Linear membership test; RR sets are usually small.
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// Heap bytes held by this set, for pool budgeting.
    #[inline]
    pub fn heap_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<usize>()
    }
}

// ---------------------------------------------------------------------------
// RrSampler
// ---------------------------------------------------------------------------

/// Reverse BFS sampler bound to one graph.
///
/// Holds reusable scratch space; create one per worker.
///
/// # Example
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use ruvector_influence::graph::ProbGraph;
/// use ruvector_influence::sampler::RrSampler;
///
/// let graph = ProbGraph::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
/// let mut sampler = RrSampler::new(&graph).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let rr = sampler.sample_from(2, &mut rng);
/// assert_eq!(rr.nodes(), &[2, 1, 0]);
/// ```
pub struct RrSampler<'g> {
    graph: &'g ProbGraph,
    visited: Vec<bool>,
    frontier: VecDeque<usize>,
}

impl<'g> RrSampler<'g> {
    /// Create a sampler for `graph`.
    ///
    /// # Errors
    ///
    /// [`InfluenceError::InvalidGraph`] if the graph has no nodes, since no
    /// target could be drawn.
    pub fn new(graph: &'g ProbGraph) -> Result<Self, InfluenceError> {
        ensure_sampleable(graph)?;
        Ok(Self::with_scratch(graph))
    }

    fn with_scratch(graph: &'g ProbGraph) -> Self {
        Self {
            graph,
            visited: vec![false; graph.num_nodes()],
            frontier: VecDeque::new(),
        }
    }

    /// Sample an RR set for a uniformly random target.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RrSet {
        let target = rng.gen_range(0..self.graph.num_nodes());
        self.sample_from(target, rng)
    }

    /// Sample an RR set for a fixed `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target >= num_nodes`.
    pub fn sample_from<R: Rng + ?Sized>(&mut self, target: usize, rng: &mut R) -> RrSet {
        let n = self.graph.num_nodes();
        let mut nodes = vec![target];
        self.visited[target] = true;
        self.frontier.push_back(target);

        'bfs: while let Some(v) = self.frontier.pop_front() {
            for (u, p) in self.graph.in_neighbors(v) {
                if self.visited[u] {
                    continue;
                }
                if rng.gen::<f32>() < p {
                    self.visited[u] = true;
                    nodes.push(u);
                    if nodes.len() == n {
                        break 'bfs;
                    }
                    self.frontier.push_back(u);
                }
            }
        }

        self.frontier.clear();
        for &u in &nodes {
            self.visited[u] = false;
        }

        RrSet { nodes }
    }
}

fn ensure_sampleable(graph: &ProbGraph) -> Result<(), InfluenceError> {
    if graph.num_nodes() == 0 {
        return Err(ValidationError::DimensionMismatch(
            "cannot sample RR sets from a graph with no nodes".into(),
        )
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Number of edges pointing into `rr_set` (sum of member in-degrees).
///
/// This is the number of edges the reverse search examined, the `w(R)`
/// statistic of KPT estimation.
pub fn width(graph: &ProbGraph, rr_set: &RrSet) -> usize {
    rr_set.nodes().iter().map(|&v| graph.in_degree(v)).sum()
}

// ---------------------------------------------------------------------------
// Batch sampling
// ---------------------------------------------------------------------------

/// Generate `count` independent RR sets with uniformly random targets.
///
/// One `u64` is drawn from `rng`; everything else is derived from it, so a
/// seeded `rng` yields a reproducible batch.
///
/// # Errors
///
/// [`InfluenceError::InvalidGraph`] if the graph has no nodes.
pub fn sample_rr_sets<R: Rng + ?Sized>(
    graph: &ProbGraph,
    count: usize,
    rng: &mut R,
) -> Result<Vec<RrSet>, InfluenceError> {
    ensure_sampleable(graph)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let base_seed: u64 = rng.gen();
    let num_chunks = count.div_ceil(SAMPLES_PER_CHUNK);

    let run_chunk = |chunk_idx: usize| -> Vec<RrSet> {
        let mut chunk_rng = chunk_rng(base_seed, chunk_idx);
        let mut sampler = RrSampler::with_scratch(graph);
        let start = chunk_idx * SAMPLES_PER_CHUNK;
        let len = SAMPLES_PER_CHUNK.min(count - start);
        (0..len).map(|_| sampler.sample(&mut chunk_rng)).collect()
    };

    #[cfg(feature = "parallel")]
    let chunks: Vec<Vec<RrSet>> = {
        use rayon::prelude::*;
        (0..num_chunks).into_par_iter().map(run_chunk).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let chunks: Vec<Vec<RrSet>> = (0..num_chunks).map(run_chunk).collect();

    let mut sets = Vec::with_capacity(count);
    for chunk in chunks {
        sets.extend(chunk);
    }

    debug!(
        target: "ruvector_influence::sampler",
        count,
        chunks = num_chunks,
        mean_size = sets.iter().map(RrSet::len).sum::<usize>() as f64 / count as f64,
        "sampled RR sets",
    );

    Ok(sets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize, p: f32) -> ProbGraph {
        ProbGraph::from_edges(n, (0..n - 1).map(|i| (i, i + 1, p))).unwrap()
    }

    #[test]
    fn certain_chain_reaches_every_ancestor() {
        let graph = chain(5, 1.0);
        let mut sampler = RrSampler::new(&graph).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for t in 0..5 {
            let rr = sampler.sample_from(t, &mut rng);
            let mut nodes = rr.nodes().to_vec();
            nodes.sort_unstable();
            assert_eq!(nodes, (0..=t).collect::<Vec<_>>());
            assert_eq!(rr.target(), t);
        }
    }

    #[test]
    fn zero_probability_edges_never_fire() {
        let graph = chain(4, 0.0);
        let mut sampler = RrSampler::new(&graph).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let rr = sampler.sample(&mut rng);
            assert_eq!(rr.len(), 1);
        }
    }

    #[test]
    fn cycle_visits_each_node_once() {
        let graph =
            ProbGraph::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (1, 1, 1.0)])
                .unwrap();
        let mut sampler = RrSampler::new(&graph).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let rr = sampler.sample_from(0, &mut rng);
        let mut nodes = rr.nodes().to_vec();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![0, 1, 2]);
    }

    #[test]
    fn scratch_is_reset_between_samples() {
        let graph = chain(3, 1.0);
        let mut sampler = RrSampler::new(&graph).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let first = sampler.sample_from(2, &mut rng);
        let second = sampler.sample_from(2, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn width_counts_in_edges() {
        let graph = ProbGraph::from_edges(3, vec![(0, 2, 1.0), (1, 2, 1.0), (0, 1, 1.0)]).unwrap();
        let rr = RrSet::new([2, 1]).unwrap();
        assert_eq!(width(&graph, &rr), 3);
    }

    #[test]
    fn rr_set_new_dedups_and_rejects_empty() {
        let rr = RrSet::new([3, 1, 3, 2, 1]).unwrap();
        assert_eq!(rr.nodes(), &[3, 1, 2]);
        assert_eq!(rr.target(), 3);
        assert!(RrSet::new(Vec::new()).is_none());
    }

    #[test]
    fn batch_is_reproducible_for_a_seed() {
        let graph = chain(50, 0.5);
        let a = sample_rr_sets(&graph, 3000, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = sample_rr_sets(&graph, 3000, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a.len(), 3000);
        assert_eq!(a, b);
    }

    #[test]
    fn configured_seed_is_deterministic() {
        let a: u64 = rng_for_seed(17).gen();
        let b: u64 = rng_for_seed(17).gen();
        assert_eq!(a, b);
        assert_ne!(stream_seed(17, 1), 17);
        assert_eq!(stream_seed(0, 1), 0);
    }

    #[test]
    fn empty_graph_is_rejected() {
        let graph = ProbGraph::from_edges(0, Vec::new()).unwrap();
        assert!(RrSampler::new(&graph).is_err());
        assert!(sample_rr_sets(&graph, 1, &mut StdRng::seed_from_u64(1)).is_err());
    }
}
