//! Command implementations

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use ruvector_influence::estimator::KptEstimate;
use ruvector_influence::events::InfluenceEvent;
use ruvector_influence::io::{load_edge_list, EdgeListOptions};
use ruvector_influence::sampler::rng_for_seed;
use ruvector_influence::spread::{estimate_spread, SpreadEstimate, SpreadMethod};
use ruvector_influence::{InfluenceConfig, InfluenceMaximizer, ProbGraph, Strategy};
use serde::Serialize;
use tracing::info;

use super::format::{format_bench_table, format_seeds, format_spread};

/// Output of the `seeds` command
#[derive(Debug, Clone, Serialize)]
pub struct SeedsOutput {
    pub input: PathBuf,
    pub nodes: usize,
    pub edges: usize,
    pub k: usize,
    pub strategy: Strategy,
    pub seeds: Vec<usize>,
    pub lambda: f64,
    pub kpt: KptEstimate,
    pub theta: usize,
    pub wall_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<InfluenceEvent>>,
}

/// Output of the `spread` command
#[derive(Debug, Clone, Serialize)]
pub struct SpreadOutput {
    pub input: PathBuf,
    pub seeds: Vec<usize>,
    pub estimate: SpreadEstimate,
}

/// One row of the `bench` report
#[derive(Debug, Clone, Serialize)]
pub struct BenchRow {
    pub input: PathBuf,
    pub nodes: usize,
    pub edges: usize,
    pub strategy: Strategy,
    pub k: usize,
    pub theta: usize,
    pub wall_time_ms: f64,
    pub spread: f64,
}

fn load_graph(path: &Path, options: &EdgeListOptions) -> Result<ProbGraph> {
    load_edge_list(path, options).with_context(|| format!("Failed to load {}", path.display()))
}

fn render<T: Serialize>(value: &T, json: bool, text: impl FnOnce(&T) -> String) -> Result<String> {
    if json {
        serde_json::to_string_pretty(value).context("Failed to serialize output")
    } else {
        Ok(text(value))
    }
}

/// Find `k` seeds in one edge-list file
pub fn run_seeds(
    input: &Path,
    k: usize,
    strategy: Strategy,
    config: &InfluenceConfig,
    loader: &EdgeListOptions,
    with_events: bool,
    json: bool,
) -> Result<String> {
    let graph = load_graph(input, loader)?;
    let result = InfluenceMaximizer::with_strategy(config.clone(), strategy).find_k_seeds(&graph, k)?;

    let output = SeedsOutput {
        input: input.to_path_buf(),
        nodes: graph.num_nodes(),
        edges: graph.num_edges(),
        k,
        strategy: result.strategy,
        seeds: result.seeds.into_vec(),
        lambda: result.lambda,
        kpt: result.kpt,
        theta: result.theta,
        wall_time_ms: result.wall_time.as_secs_f64() * 1e3,
        events: with_events.then_some(result.events),
    };
    render(&output, json, format_seeds)
}

/// Estimate the spread of a given seed list
pub fn run_spread(
    input: &Path,
    seeds: &[usize],
    method: SpreadMethod,
    samples: usize,
    config: &InfluenceConfig,
    loader: &EdgeListOptions,
    json: bool,
) -> Result<String> {
    let graph = load_graph(input, loader)?;
    let mut rng = rng_for_seed(config.seed);
    let estimate = estimate_spread(&graph, seeds, method, samples, &mut rng)?;

    let output = SpreadOutput {
        input: input.to_path_buf(),
        seeds: seeds.to_vec(),
        estimate,
    };
    render(&output, json, format_spread)
}

/// Run every strategy on every input and compare
pub fn run_bench(
    inputs: &[PathBuf],
    k: usize,
    strategies: &[Strategy],
    spread_samples: usize,
    config: &InfluenceConfig,
    loader: &EdgeListOptions,
    json: bool,
) -> Result<String> {
    let mut rows = Vec::with_capacity(inputs.len() * strategies.len());

    for input in inputs {
        let graph = load_graph(input, loader)?;
        for &strategy in strategies {
            let start = Instant::now();
            let result =
                InfluenceMaximizer::with_strategy(config.clone(), strategy).find_k_seeds(&graph, k)?;
            let elapsed = start.elapsed();

            let mut rng = rng_for_seed(config.seed);
            let spread = estimate_spread(
                &graph,
                result.seeds.as_slice(),
                SpreadMethod::ReverseReachable,
                spread_samples,
                &mut rng,
            )?;

            info!(
                input = %input.display(),
                %strategy,
                theta = result.theta,
                spread = spread.value,
                "bench: strategy finished",
            );
            rows.push(BenchRow {
                input: input.clone(),
                nodes: graph.num_nodes(),
                edges: graph.num_edges(),
                strategy,
                k,
                theta: result.theta,
                wall_time_ms: elapsed.as_secs_f64() * 1e3,
                spread: spread.value,
            });
        }
    }

    render(&rows, json, |rows| format_bench_table(rows))
}
