//! End-to-end seed selection.
//!
//! [`InfluenceMaximizer`] wires the stages together for one graph and `k`:
//!
//! 1. validate the configuration and `k` (nothing is sampled on failure);
//! 2. estimate KPT with the doubling loop;
//! 3. compute `lambda` and `theta = ceil(lambda / KPT)`;
//! 4. reject a final pool that would not fit the memory budget, projected
//!    from the mean RR-set size seen during estimation;
//! 5. hand `theta` to the configured [`NodeSelection`].
//!
//! Estimation and selection draw from independent random streams derived
//! from `config.seed`, so a non-zero seed reproduces the whole run.

use std::time::Instant;

use tracing::info;

use crate::budget::PoolBudget;
use crate::error::InfluenceError;
use crate::estimator::{calculate_lambda, estimate_kpt, sample_size};
use crate::events::InfluenceEvent;
use crate::graph::ProbGraph;
use crate::sampler::{rng_for_seed, stream_seed};
use crate::strategy::{selection_for, NodeSelection};
use crate::types::{InfluenceConfig, InfluenceResult, Strategy};
use crate::validation::validate_seed_count;

/// Random stream used by KPT estimation; selection uses the configured seed
/// directly.
const ESTIMATION_STREAM: u64 = 1;

/// Seed-selection pipeline bound to a configuration and a strategy.
///
/// # Example
///
/// ```rust
/// use ruvector_influence::graph::ProbGraph;
/// use ruvector_influence::pipeline::InfluenceMaximizer;
/// use ruvector_influence::types::InfluenceConfig;
///
/// let graph = ProbGraph::from_edges(5, (0..4).map(|i| (i, i + 1, 1.0))).unwrap();
/// let config = InfluenceConfig { seed: 7, ..Default::default() };
/// let result = InfluenceMaximizer::new(config).find_k_seeds(&graph, 1).unwrap();
/// assert_eq!(result.seeds.as_slice(), &[0]);
/// ```
pub struct InfluenceMaximizer {
    config: InfluenceConfig,
    selection: Box<dyn NodeSelection>,
}

impl InfluenceMaximizer {
    /// RIS pipeline with the given configuration.
    pub fn new(config: InfluenceConfig) -> Self {
        Self::with_strategy(config, Strategy::Ris)
    }

    /// Pipeline using the registered implementation of `strategy`.
    pub fn with_strategy(config: InfluenceConfig, strategy: Strategy) -> Self {
        let selection = selection_for(strategy, &config);
        Self { config, selection }
    }

    /// Pipeline using a caller-supplied strategy.
    pub fn with_selection(config: InfluenceConfig, selection: Box<dyn NodeSelection>) -> Self {
        Self { config, selection }
    }

    /// Active configuration.
    pub fn config(&self) -> &InfluenceConfig {
        &self.config
    }

    /// Strategy that picks the seeds.
    pub fn strategy(&self) -> Strategy {
        self.selection.strategy()
    }

    /// Select `k` seeds from `graph`.
    ///
    /// # Errors
    ///
    /// - [`InfluenceError::Configuration`] for invalid parameters, `k == 0`
    ///   or `k > n`; raised before any sampling.
    /// - [`InfluenceError::ResourceExhausted`] if the RR pool would exceed
    ///   `memory_limit_bytes`.
    pub fn find_k_seeds(&self, graph: &ProbGraph, k: usize) -> Result<InfluenceResult, InfluenceError> {
        let start = Instant::now();
        self.config.validate()?;
        let n = graph.num_nodes();
        validate_seed_count(k, n)?;

        let strategy = self.selection.strategy();
        let mut events = vec![InfluenceEvent::SelectionRequested {
            strategy,
            nodes: n,
            edges: graph.num_edges(),
            k,
        }];
        info!(%strategy, nodes = n, edges = graph.num_edges(), k, "find_k_seeds: starting");

        let mut rng = rng_for_seed(stream_seed(self.config.seed, ESTIMATION_STREAM));
        let kpt = estimate_kpt(graph, k, &self.config, &mut rng)?;
        events.extend(kpt.rounds.iter().map(|r| InfluenceEvent::KptRound {
            round: r.round,
            samples: r.samples,
            mean_kappa: r.mean_kappa,
            stopped: r.stopped,
        }));
        if !kpt.converged {
            events.push(InfluenceEvent::KptExhausted {
                rounds: kpt.rounds.len(),
                fallback: kpt.value,
            });
        }

        let lambda = calculate_lambda(n, k, self.config.ell, self.config.epsilon);
        let theta = sample_size(lambda, kpt.value)?;
        events.push(InfluenceEvent::SampleSizeComputed {
            lambda,
            kpt: kpt.value,
            theta,
        });
        info!(lambda, kpt = kpt.value, theta, "find_k_seeds: sample size fixed");

        if strategy == Strategy::Ris {
            PoolBudget::new(self.config.memory_limit_bytes)
                .check_projected(theta, kpt.mean_rr_size)?;
        }

        let report = self.selection.select_with_report(graph, k, theta as f64)?;
        events.extend(report.events);

        let wall_time = start.elapsed();
        events.push(InfluenceEvent::SeedsSelected {
            strategy,
            seeds: report.seeds.as_slice().to_vec(),
            coverage: report.coverage,
            wall_time,
        });
        info!(%strategy, seeds = ?report.seeds.as_slice(), ?wall_time, "find_k_seeds: done");

        Ok(InfluenceResult {
            seeds: report.seeds,
            strategy,
            lambda,
            kpt,
            theta,
            wall_time,
            events,
        })
    }
}

impl Default for InfluenceMaximizer {
    fn default() -> Self {
        Self::new(InfluenceConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
