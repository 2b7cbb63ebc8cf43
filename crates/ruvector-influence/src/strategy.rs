//! Seed-selection strategies.
//!
//! Every strategy implements [`NodeSelection`]. The pipeline holds one as a
//! `Box<dyn NodeSelection>`, so strategies can be swapped per run and new
//! ones plugged in without touching the estimator.
//!
//! | Strategy | Type | Guarantee |
//! |----------|------|-----------|
//! | [`Strategy::Ris`] | [`RisSelection`] | `(1 - 1/e - epsilon)` w.p. `1 - 1/n^l` |
//! | [`Strategy::Degree`] | [`DegreeSelection`] | none (baseline) |
//! | [`Strategy::Random`] | [`RandomSelection`] | none (baseline) |

use tracing::{debug, info};

use crate::budget::PoolBudget;
use crate::coverage::{CoverageIndex, RrPool};
use crate::error::InfluenceError;
use crate::events::InfluenceEvent;
use crate::graph::ProbGraph;
use crate::greedy::greedy_max_coverage;
use crate::sampler::{rng_for_seed, sample_rr_sets};
use crate::types::{InfluenceConfig, SeedSet, Strategy};
use crate::validation::{validate_seed_count, validate_theta};

/// What a strategy produced, beyond the seeds themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionReport {
    /// Seeds in selection order.
    pub seeds: SeedSet,
    /// Fraction of the strategy's RR pool covered by the seeds, if it built
    /// one.
    pub coverage: Option<f64>,
    /// RR sets sampled by the strategy.
    pub pool_size: usize,
    /// Events emitted while selecting.
    pub events: Vec<InfluenceEvent>,
}

impl SelectionReport {
    fn seeds_only(seeds: SeedSet) -> Self {
        Self {
            seeds,
            coverage: None,
            pool_size: 0,
            events: Vec::new(),
        }
    }
}

/// Pluggable seed-selection algorithm.
///
/// `theta` is a strategy-specific tuning parameter; for RIS it is the
/// number of RR sets to sample. Strategies that need no tuning validate and
/// ignore it.
pub trait NodeSelection: Send + Sync {
    /// Select `k` seeds and report how.
    ///
    /// # Errors
    ///
    /// - [`InfluenceError::Configuration`] if `k == 0`, `k > n` or `theta`
    ///   is not a finite non-negative number.
    /// - [`InfluenceError::ResourceExhausted`] if the strategy's working
    ///   memory exceeds its budget.
    fn select_with_report(
        &self,
        graph: &ProbGraph,
        k: usize,
        theta: f64,
    ) -> Result<SelectionReport, InfluenceError>;

    /// Select `k` seeds.
    ///
    /// # Errors
    ///
    /// See [`select_with_report`](NodeSelection::select_with_report).
    fn select(&self, graph: &ProbGraph, k: usize, theta: f64) -> Result<SeedSet, InfluenceError> {
        self.select_with_report(graph, k, theta).map(|r| r.seeds)
    }

    /// Identifier of this strategy.
    fn strategy(&self) -> Strategy;
}

/// Build the registered implementation of `strategy`.
///
/// ```
/// use ruvector_influence::strategy::selection_for;
/// use ruvector_influence::types::{InfluenceConfig, Strategy};
///
/// let selection = selection_for(Strategy::Degree, &InfluenceConfig::default());
/// assert_eq!(selection.strategy(), Strategy::Degree);
/// ```
pub fn selection_for(strategy: Strategy, config: &InfluenceConfig) -> Box<dyn NodeSelection> {
    match strategy {
        Strategy::Ris => Box::new(RisSelection::new(config.clone())),
        Strategy::Degree => Box::new(DegreeSelection),
        Strategy::Random => Box::new(RandomSelection::new(config.seed)),
    }
}

fn validate_request(graph: &ProbGraph, k: usize, theta: f64) -> Result<(), InfluenceError> {
    validate_seed_count(k, graph.num_nodes())?;
    validate_theta(theta)
}

// ---------------------------------------------------------------------------
// RIS
// ---------------------------------------------------------------------------

/// Reverse influence sampling: sample `ceil(theta)` RR sets in batches,
/// index them and run greedy max coverage.
#[derive(Debug, Clone, Default)]
pub struct RisSelection {
    config: InfluenceConfig,
}

impl RisSelection {
    /// Create with the given configuration (seed, batch size, memory limit).
    pub fn new(config: InfluenceConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &InfluenceConfig {
        &self.config
    }
}

impl NodeSelection for RisSelection {
    fn select_with_report(
        &self,
        graph: &ProbGraph,
        k: usize,
        theta: f64,
    ) -> Result<SelectionReport, InfluenceError> {
        validate_request(graph, k, theta)?;
        self.config.validate()?;

        let target = (theta.ceil() as usize).max(1);
        let n = graph.num_nodes();
        let mut rng = rng_for_seed(self.config.seed);
        let mut budget = PoolBudget::new(self.config.memory_limit_bytes);
        let mut pool = RrPool::new();
        let mut index = CoverageIndex::new(n);
        let mut events = Vec::new();

        budget.charge(index.heap_bytes())?;
        while pool.len() < target {
            let batch = self.config.batch_size.min(target - pool.len());
            let sets = sample_rr_sets(graph, batch, &mut rng)?;
            let mut added = pool.extend(sets);
            added += index.extend(&pool)?;
            budget.charge(added)?;

            debug!(
                target: "ruvector_influence::strategy",
                total_sets = pool.len(),
                bytes_used = budget.used(),
                "RR pool grown",
            );
            events.push(InfluenceEvent::PoolGrown {
                total_sets: pool.len(),
                bytes_used: budget.used(),
            });
        }

        let greedy = greedy_max_coverage(&pool, &index, k);
        let coverage = greedy.coverage_fraction();
        info!(
            target: "ruvector_influence::strategy",
            k,
            theta = target,
            coverage,
            "RIS selection finished",
        );

        Ok(SelectionReport {
            seeds: greedy.seeds,
            coverage: Some(coverage),
            pool_size: pool.len(),
            events,
        })
    }

    fn strategy(&self) -> Strategy {
        Strategy::Ris
    }
}

// ---------------------------------------------------------------------------
// Baselines
// ---------------------------------------------------------------------------

/// Highest probability-weighted out-degree first; ties go to the smallest id.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeSelection;

impl DegreeSelection {
    /// `sum(p)` over the out-edges of every node.
    pub fn scores(graph: &ProbGraph) -> Vec<f64> {
        (0..graph.num_nodes())
            .map(|v| graph.out_neighbors(v).map(|(_, p)| f64::from(p)).sum())
            .collect()
    }
}

impl NodeSelection for DegreeSelection {
    fn select_with_report(
        &self,
        graph: &ProbGraph,
        k: usize,
        theta: f64,
    ) -> Result<SelectionReport, InfluenceError> {
        validate_request(graph, k, theta)?;

        let scores = Self::scores(graph);
        let mut order: Vec<usize> = (0..graph.num_nodes()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
        order.truncate(k);

        Ok(SelectionReport::seeds_only(SeedSet::from_ordered(order)))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Degree
    }
}

/// `k` distinct nodes drawn uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection {
    seed: u64,
}

impl RandomSelection {
    /// `seed == 0` draws from OS entropy.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl NodeSelection for RandomSelection {
    fn select_with_report(
        &self,
        graph: &ProbGraph,
        k: usize,
        theta: f64,
    ) -> Result<SelectionReport, InfluenceError> {
        validate_request(graph, k, theta)?;
        let mut rng = rng_for_seed(self.seed);
        let seeds = rand::seq::index::sample(&mut rng, graph.num_nodes(), k).into_vec();
        Ok(SelectionReport::seeds_only(SeedSet::from_ordered(seeds)))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Random
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
