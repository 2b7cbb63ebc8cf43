//! Sample-complexity estimation.
//!
//! The number of RR sets needed for a `(1 - 1/e - epsilon)` guarantee with
//! probability `1 - 1/n^l` is `theta = lambda / OPT`, where `OPT` is the
//! unknown optimal spread. Since `OPT` is unknown, a lower bound `KPT` is
//! estimated instead:
//!
//! - [`calculate_lambda`] is the union-bound numerator, evaluated in log
//!   space via [`ln_n_choose_k`];
//! - [`estimate_kpt`] runs the doubling loop. Round `i` samples
//!   `c_i = (c l ln n + c ln log2 n) 2^i` RR sets and averages
//!   `kappa(R) = 1 - (1 - w(R)/m)^k`, stopping once the mean exceeds
//!   `1/2^i`;
//! - [`sample_size`] combines the two into `ceil(lambda / KPT)`.
//!
//! When refinement is enabled, greedy picks `k` seeds on the stopping
//! round's pool and those seeds are scored on
//! `theta' = lambda' / KPT*` fresh RR sets they were not chosen from. `KPT`
//! is raised to `n F / (1 + epsilon')` if that is larger, where `F` is the
//! fraction of the fresh sets the seeds hit. Scoring on the selection pool
//! itself would overstate `F` and could push `KPT` above `OPT`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::budget::PoolBudget;
use crate::combinatorics::ln_n_choose_k;
use crate::coverage::{CoverageIndex, RrPool};
use crate::error::InfluenceError;
use crate::graph::ProbGraph;
use crate::greedy::greedy_max_coverage;
use crate::sampler::{sample_rr_sets, width};
use crate::types::InfluenceConfig;
use crate::validation::{validate_seed_count, validate_theta};

/// Statistics of one doubling round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KptRound {
    /// Round index `i`, starting at 1.
    pub round: usize,
    /// RR sets sampled, `ceil(c_i)`.
    pub samples: usize,
    /// `sum(kappa) / c_i`.
    pub mean_kappa: f64,
    /// `1 / 2^i`.
    pub threshold: f64,
    /// Whether `mean_kappa > threshold`.
    pub stopped: bool,
}

/// Lower bound on the optimal expected spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KptEstimate {
    /// The estimate used to size the final pool.
    pub value: f64,
    /// `false` if no round passed its stopping test and `value` is the
    /// fallback `k`.
    pub converged: bool,
    /// Every round attempted, in order.
    pub rounds: Vec<KptRound>,
    /// Mean RR-set size over all doubling-round sets, `0.0` if none were
    /// sampled.
    pub mean_rr_size: f64,
    /// Refinement step, if it ran.
    pub refinement: Option<KptRefinement>,
}

/// Out-of-sample tightening of `KPT*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KptRefinement {
    /// Estimate from the stopping round alone.
    pub kpt_star: f64,
    /// `epsilon'`.
    pub epsilon_prime: f64,
    /// Fresh RR sets the greedy seeds were scored on, `theta'`.
    pub samples: usize,
    /// Fraction of the fresh sets hit by the greedy seeds.
    pub coverage: f64,
    /// `n * coverage / (1 + epsilon')`.
    pub kpt_prime: f64,
}

/// `(8 + 2 eps) n (l ln n + ln C(n, k) + ln 2) / eps^2`.
///
/// ```
/// use ruvector_influence::estimator::calculate_lambda;
///
/// let tight = calculate_lambda(1000, 10, 1.0, 0.1);
/// let loose = calculate_lambda(1000, 10, 1.0, 0.2);
/// assert!(tight > loose);
/// ```
pub fn calculate_lambda(n: usize, k: usize, ell: f64, epsilon: f64) -> f64 {
    let nf = n as f64;
    let ln_binom = ln_n_choose_k(n as u64, k as i64);
    (8.0 + 2.0 * epsilon) * nf * (ell * nf.ln() + ln_binom + 2f64.ln()) / (epsilon * epsilon)
}

/// `epsilon' = 5 (l eps^2 / (k + l))^(1/3)`, the accuracy of the refinement
/// step.
pub fn epsilon_prime(ell: f64, epsilon: f64, k: usize) -> f64 {
    5.0 * (ell * epsilon * epsilon / (k as f64 + ell)).cbrt()
}

/// `(2 + eps') l n ln n / eps'^2`, the refinement numerator.
pub fn refinement_lambda(n: usize, ell: f64, epsilon_prime: f64) -> f64 {
    let nf = n as f64;
    (2.0 + epsilon_prime) * ell * nf * nf.ln() / (epsilon_prime * epsilon_prime)
}

/// `ceil(lambda / kpt)`, at least 1.
///
/// # Errors
///
/// [`InfluenceError::Configuration`] if the ratio is NaN, infinite or
/// negative.
pub fn sample_size(lambda: f64, kpt: f64) -> Result<usize, InfluenceError> {
    let theta = lambda / kpt;
    validate_theta(theta)?;
    Ok((theta.ceil() as usize).max(1))
}

/// Number of doubling rounds the loop may run on `n` nodes.
fn round_limit(n: usize, max_doublings: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let log2_floor = (usize::BITS - 1 - n.leading_zeros()) as usize;
    log2_floor.saturating_sub(1).min(max_doublings)
}

/// Estimate KPT by the doubling loop.
///
/// Never fails on statistical grounds: if no round stops, the result has
/// `converged == false` and `value == k`, which any `k` distinct seeds
/// achieve by activating themselves.
///
/// # Errors
///
/// - [`InfluenceError::Configuration`] if `k == 0`, `k > n` or `config` is
///   invalid.
/// - [`InfluenceError::ResourceExhausted`] if a round's pool does not fit
///   within `config.memory_limit_bytes`. An oversized refinement batch is
///   skipped instead.
pub fn estimate_kpt<R: Rng + ?Sized>(
    graph: &ProbGraph,
    k: usize,
    config: &InfluenceConfig,
    rng: &mut R,
) -> Result<KptEstimate, InfluenceError> {
    config.validate()?;
    let n = graph.num_nodes();
    validate_seed_count(k, n)?;

    let m = graph.num_edges();
    let limit = if m == 0 {
        0
    } else {
        round_limit(n, config.max_doublings)
    };

    let nf = n as f64;
    let c = config.kpt_sample_constant;
    let base = c * config.ell * nf.ln() + c * nf.log2().ln();

    let mut rounds = Vec::with_capacity(limit);
    let mut total_sets = 0usize;
    let mut total_members = 0usize;

    for i in 1..=limit {
        let c_i = base * 2f64.powi(i as i32);
        let samples = c_i.ceil() as usize;
        let threshold = 1.0 / 2f64.powi(i as i32);

        let mut budget = PoolBudget::new(config.memory_limit_bytes);
        budget.check_projected(samples, mean_or_one(total_members, total_sets))?;

        let pool = RrPool::from(sample_rr_sets(graph, samples, rng)?);
        budget.charge(pool.heap_bytes())?;
        total_sets += pool.len();
        total_members += pool.sets().iter().map(|s| s.len()).sum::<usize>();

        let kappa_sum: f64 = pool
            .sets()
            .iter()
            .map(|rr| 1.0 - (1.0 - width(graph, rr) as f64 / m as f64).powf(k as f64))
            .sum();
        let mean_kappa = kappa_sum / c_i;

        let stopped = mean_kappa > threshold;
        debug!(
            target: "ruvector_influence::estimator",
            round = i,
            samples,
            mean_kappa,
            threshold,
            stopped,
            "KPT doubling round",
        );
        rounds.push(KptRound {
            round: i,
            samples,
            mean_kappa,
            threshold,
            stopped,
        });

        if stopped {
            let kpt_star = nf * kappa_sum / (2.0 * c_i);
            let mean_rr_size = mean_or_zero(total_members, total_sets);
            let refinement = if config.kpt_refinement {
                let index = CoverageIndex::build(&pool, n)?;
                budget.charge(index.heap_bytes())?;
                let seeds = greedy_max_coverage(&pool, &index, k).seeds;
                drop(index);
                drop(pool);
                refine_kpt(graph, seeds.as_slice(), k, kpt_star, mean_rr_size, config, rng)?
            } else {
                None
            };
            let value = refinement
                .as_ref()
                .map_or(kpt_star, |r| kpt_star.max(r.kpt_prime));
            info!(
                target: "ruvector_influence::estimator",
                round = i,
                kpt_star,
                kpt = value,
                "KPT estimate converged",
            );
            return Ok(KptEstimate {
                value,
                converged: true,
                rounds,
                mean_rr_size,
                refinement,
            });
        }
    }

    warn!(
        target: "ruvector_influence::estimator",
        rounds = rounds.len(),
        nodes = n,
        edges = m,
        fallback = k,
        "KPT doubling loop exhausted without stopping; using k as lower bound",
    );
    Ok(KptEstimate {
        value: k as f64,
        converged: false,
        rounds,
        mean_rr_size: mean_or_zero(total_members, total_sets),
        refinement: None,
    })
}

/// Score greedy `seeds` on `theta' = lambda' / kpt_star` fresh RR sets.
///
/// The fresh sets are streamed in `batch_size` batches and only the hit
/// count is kept. Returns `None` (and `KPT*` stands) when a pool of
/// `theta'` sets would not fit the memory limit.
fn refine_kpt<R: Rng + ?Sized>(
    graph: &ProbGraph,
    seeds: &[usize],
    k: usize,
    kpt_star: f64,
    mean_rr_size: f64,
    config: &InfluenceConfig,
    rng: &mut R,
) -> Result<Option<KptRefinement>, InfluenceError> {
    let n = graph.num_nodes();
    let eps_prime = epsilon_prime(config.ell, config.epsilon, k);
    let samples = sample_size(refinement_lambda(n, config.ell, eps_prime), kpt_star)?;

    if let Err(err) = PoolBudget::new(config.memory_limit_bytes).check_projected(samples, mean_rr_size)
    {
        warn!(
            target: "ruvector_influence::estimator",
            samples,
            error = %err,
            "KPT refinement skipped",
        );
        return Ok(None);
    }

    let mut is_seed = vec![false; n];
    for &s in seeds {
        is_seed[s] = true;
    }

    let mut drawn = 0usize;
    let mut hits = 0usize;
    while drawn < samples {
        let batch = config.batch_size.min(samples - drawn);
        hits += sample_rr_sets(graph, batch, rng)?
            .iter()
            .filter(|rr| rr.nodes().iter().any(|&v| is_seed[v]))
            .count();
        drawn += batch;
    }

    let coverage = hits as f64 / samples as f64;
    let kpt_prime = n as f64 * coverage / (1.0 + eps_prime);
    debug!(
        target: "ruvector_influence::estimator",
        samples,
        coverage,
        kpt_prime,
        "KPT refinement scored on fresh RR sets",
    );
    Ok(Some(KptRefinement {
        kpt_star,
        epsilon_prime: eps_prime,
        samples,
        coverage,
        kpt_prime,
    }))
}

fn mean_or_zero(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

fn mean_or_one(total: usize, count: usize) -> f64 {
    if count == 0 {
        1.0
    } else {
        total as f64 / count as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
