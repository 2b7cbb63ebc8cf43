//! End-to-end tests for `InfluenceMaximizer::find_k_seeds`.

mod helpers;

use ruvector_influence::events::InfluenceEvent;
use ruvector_influence::spread::{estimate_spread, SpreadMethod};
use ruvector_influence::types::{InfluenceConfig, Strategy};
use ruvector_influence::{ErrorKind, InfluenceMaximizer};

use rand::rngs::StdRng;
use rand::SeedableRng;

use helpers::{chain, disjoint_stars, isolated, random_graph, seeded_config};

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_chain_selects_head() {
    let graph = chain(5, 1.0);
    let result = InfluenceMaximizer::new(seeded_config(1))
        .find_k_seeds(&graph, 1)
        .unwrap();
    assert_eq!(result.seeds.as_slice(), &[0]);
    assert_eq!(result.strategy, Strategy::Ris);
    assert!(result.theta >= 1);
}

#[test]
fn test_isolated_pair_selects_both_nodes() {
    let graph = isolated(2);
    let result = InfluenceMaximizer::new(seeded_config(2))
        .find_k_seeds(&graph, 2)
        .unwrap();
    let mut seeds = result.seeds.into_vec();
    seeds.sort_unstable();
    assert_eq!(seeds, vec![0, 1]);
}

#[test]
fn test_k_above_n_is_configuration_error() {
    let graph = chain(3, 1.0);
    let err = InfluenceMaximizer::new(seeded_config(3))
        .find_k_seeds(&graph, 4)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_k_zero_is_configuration_error() {
    let graph = chain(3, 1.0);
    let err = InfluenceMaximizer::new(seeded_config(3))
        .find_k_seeds(&graph, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_seed_count_is_min_k_n() {
    let graph = disjoint_stars(2, 4, 1.0);
    for k in 1..=8 {
        let result = InfluenceMaximizer::new(seeded_config(4))
            .find_k_seeds(&graph, k)
            .unwrap();
        assert_eq!(result.seeds.len(), k);
    }
}

#[test]
fn test_fixed_seed_is_deterministic() {
    let graph = random_graph(120, 0.03, 0.4, 11);
    let maximizer = InfluenceMaximizer::new(seeded_config(99));
    let a = maximizer.find_k_seeds(&graph, 6).unwrap();
    let b = maximizer.find_k_seeds(&graph, 6).unwrap();
    assert_eq!(a.seeds, b.seeds);
    assert_eq!(a.theta, b.theta);
    assert_eq!(a.kpt, b.kpt);
}

#[test]
fn test_ris_beats_random_on_stars() {
    let graph = disjoint_stars(5, 20, 0.8);
    let k = 5;
    let ris = InfluenceMaximizer::new(seeded_config(5))
        .find_k_seeds(&graph, k)
        .unwrap();
    let mut hubs = ris.seeds.as_slice().to_vec();
    hubs.sort_unstable();
    assert_eq!(hubs, vec![0, 20, 40, 60, 80]);

    let random = InfluenceMaximizer::with_strategy(seeded_config(5), Strategy::Random)
        .find_k_seeds(&graph, k)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let ris_spread = estimate_spread(&graph, ris.seeds.as_slice(), SpreadMethod::MonteCarlo, 2_000, &mut rng)
        .unwrap();
    let random_spread =
        estimate_spread(&graph, random.seeds.as_slice(), SpreadMethod::MonteCarlo, 2_000, &mut rng)
            .unwrap();
    assert!(ris_spread.value >= random_spread.value);
}

#[test]
fn test_every_strategy_returns_k_distinct_seeds() {
    let graph = random_graph(60, 0.05, 0.5, 12);
    for strategy in Strategy::ALL {
        let result = InfluenceMaximizer::with_strategy(seeded_config(7), strategy)
            .find_k_seeds(&graph, 7)
            .unwrap();
        let mut seeds = result.seeds.into_vec();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 7, "{strategy}");
        assert_eq!(result.strategy, strategy);
    }
}

#[test]
fn test_result_reports_sample_size_event() {
    let graph = chain(8, 0.9);
    let config = InfluenceConfig {
        epsilon: 0.3,
        ..seeded_config(8)
    };
    let result = InfluenceMaximizer::new(config).find_k_seeds(&graph, 2).unwrap();
    let theta = result
        .events
        .iter()
        .find_map(|e| match e {
            InfluenceEvent::SampleSizeComputed { theta, .. } => Some(*theta),
            _ => None,
        })
        .unwrap();
    assert_eq!(theta, result.theta);
    assert_eq!(theta, (result.lambda / result.kpt.value).ceil() as usize);
}

#[test]
fn test_extreme_accuracy_is_resource_exhausted() {
    // theta saturates at usize::MAX; the projection must reject it cleanly.
    let graph = chain(16, 1.0);
    let config = InfluenceConfig {
        epsilon: 1e-9,
        ..seeded_config(6)
    };
    let err = InfluenceMaximizer::new(config).find_k_seeds(&graph, 8).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
}
