//! Event sourcing for seed-selection runs.
//!
//! Every pipeline stage emits [`InfluenceEvent`]s into the run's event log,
//! so callers can see what was requested, how the KPT estimate evolved,
//! how large the RR pool grew and which seeds the strategy picked.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Strategy;

/// Events emitted during a seed-selection run.
///
/// Events are tagged with `#[serde(tag = "type")]` so they serialise as
/// `{ "type": "SelectionRequested", ... }` for easy ingestion into event
/// stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InfluenceEvent {
    /// A run was requested and its inputs validated.
    SelectionRequested {
        /// Strategy that will pick the seeds.
        strategy: Strategy,
        /// Node count `n`.
        nodes: usize,
        /// Edge count `m`.
        edges: usize,
        /// Requested seed count.
        k: usize,
    },

    /// One KPT doubling round completed.
    KptRound {
        /// Round index `i` (1-based).
        round: usize,
        /// RR sets sampled this round.
        samples: usize,
        /// `sum(kappa) / c_i` for the round.
        mean_kappa: f64,
        /// Whether the stopping test passed.
        stopped: bool,
    },

    /// The doubling loop ran out of rounds without passing its stopping
    /// test; the fallback lower bound was used.
    KptExhausted {
        /// Rounds attempted.
        rounds: usize,
        /// Fallback value adopted for KPT.
        fallback: f64,
    },

    /// The sample size for the final pool was fixed.
    SampleSizeComputed {
        /// `lambda` from the union bound.
        lambda: f64,
        /// Final KPT estimate.
        kpt: f64,
        /// `ceil(lambda / kpt)`.
        theta: usize,
    },

    /// A batch of RR sets was appended to the pool.
    PoolGrown {
        /// Total RR sets in the pool after the batch.
        total_sets: usize,
        /// Bytes charged to the pool budget so far.
        bytes_used: usize,
    },

    /// Seed selection finished.
    SeedsSelected {
        /// Strategy that produced the seeds.
        strategy: Strategy,
        /// Seeds in selection order.
        seeds: Vec<usize>,
        /// Fraction of pool RR sets covered, where a pool was used.
        coverage: Option<f64>,
        /// Total wall time.
        wall_time: Duration,
    },
}

impl InfluenceEvent {
    /// Short variant name, matching the serialised `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            InfluenceEvent::SelectionRequested { .. } => "SelectionRequested",
            InfluenceEvent::KptRound { .. } => "KptRound",
            InfluenceEvent::KptExhausted { .. } => "KptExhausted",
            InfluenceEvent::SampleSizeComputed { .. } => "SampleSizeComputed",
            InfluenceEvent::PoolGrown { .. } => "PoolGrown",
            InfluenceEvent::SeedsSelected { .. } => "SeedsSelected",
        }
    }
}
