//! Shared test helpers for the ruvector-influence integration test suite.
//!
//! Provides a deterministic generator and small graph families with known
//! influence structure.

#![allow(dead_code)]

use ruvector_influence::graph::ProbGraph;
use ruvector_influence::types::InfluenceConfig;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform index in [0, n).
    pub fn next_index(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

// ---------------------------------------------------------------------------
// Graph generators
// ---------------------------------------------------------------------------

/// `0 -> 1 -> ... -> n-1`, every edge with probability `p`.
pub fn chain(n: usize, p: f32) -> ProbGraph {
    ProbGraph::from_edges(n, (0..n.saturating_sub(1)).map(|i| (i, i + 1, p))).unwrap()
}

/// Hub `0` pointing at every other node with probability `p`.
pub fn star(n: usize, p: f32) -> ProbGraph {
    ProbGraph::from_edges(n, (1..n).map(|v| (0, v, p))).unwrap()
}

/// `n` nodes, no edges.
pub fn isolated(n: usize) -> ProbGraph {
    ProbGraph::from_edges(n, Vec::new()).unwrap()
}

/// Several disjoint stars; hub `i * size` owns `size - 1` leaves.
pub fn disjoint_stars(count: usize, size: usize, p: f32) -> ProbGraph {
    let edges = (0..count).flat_map(|s| {
        let hub = s * size;
        (1..size).map(move |leaf| (hub, hub + leaf, p))
    });
    ProbGraph::from_edges(count * size, edges).unwrap()
}

/// Erdos-Renyi style digraph: each ordered pair is an edge with probability
/// `density`, activation probability uniform in `[0, max_p)`.
pub fn random_graph(n: usize, density: f64, max_p: f32, seed: u64) -> ProbGraph {
    let mut rng = Lcg::new(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in 0..n {
            if u != v && rng.next_f64() < density {
                edges.push((u, v, (rng.next_f64() as f32) * max_p));
            }
        }
    }
    ProbGraph::from_edges(n, edges).unwrap()
}

/// Default configuration with a fixed seed.
pub fn seeded_config(seed: u64) -> InfluenceConfig {
    InfluenceConfig {
        seed,
        ..Default::default()
    }
}
