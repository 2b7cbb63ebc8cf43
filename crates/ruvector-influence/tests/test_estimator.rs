//! Integration tests for lambda, KPT estimation and the sample size.

mod helpers;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ruvector_influence::combinatorics::{ln_n_choose_k, n_choose_k};
use ruvector_influence::estimator::{calculate_lambda, epsilon_prime, estimate_kpt, sample_size};
use ruvector_influence::types::InfluenceConfig;
use ruvector_influence::ErrorKind;

use helpers::{disjoint_stars, isolated, random_graph, seeded_config, star};

#[test]
fn test_binomial_reference_values() {
    assert_eq!(n_choose_k(5, 2), 10.0);
    assert_eq!(n_choose_k(9, 0), 1.0);
    assert_eq!(n_choose_k(9, 9), 1.0);
    assert_eq!(n_choose_k(52, 5), 2_598_960.0);
    assert_relative_eq!(ln_n_choose_k(52, 5), 2_598_960f64.ln(), max_relative = 1e-12);
}

#[test]
fn test_lambda_is_monotone() {
    let n = 10_000;
    let k = 50;
    let base = calculate_lambda(n, k, 1.0, 0.2);
    assert!(calculate_lambda(n, k, 1.0, 0.1) > base);
    assert!(calculate_lambda(n, k, 2.0, 0.2) > base);
    assert!(calculate_lambda(n, k + 1, 1.0, 0.2) > base);
}

#[test]
fn test_lambda_finite_for_large_graphs() {
    let lambda = calculate_lambda(5_000_000, 200, 1.0, 0.1);
    assert!(lambda.is_finite() && lambda > 0.0);
}

#[test]
fn test_epsilon_prime_shrinks_with_k() {
    assert!(epsilon_prime(1.0, 0.2, 50) < epsilon_prime(1.0, 0.2, 5));
    assert_relative_eq!(
        epsilon_prime(1.0, 0.2, 1),
        5.0 * (0.04f64 / 2.0).cbrt(),
        max_relative = 1e-12
    );
}

#[test]
fn test_kpt_is_within_bounds_on_random_graph() {
    let graph = random_graph(256, 0.02, 0.3, 5);
    let k = 5;
    let est = estimate_kpt(&graph, k, &seeded_config(1), &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(est.value > 0.0);
    assert!(est.value <= graph.num_nodes() as f64);
    if est.converged {
        assert!(est.rounds.last().unwrap().stopped);
        assert!(est.rounds[..est.rounds.len() - 1].iter().all(|r| !r.stopped));
    } else {
        assert_eq!(est.value, k as f64);
    }
}

#[test]
fn test_kpt_rounds_double_sample_counts() {
    let graph = disjoint_stars(4, 64, 1.0);
    let config = InfluenceConfig {
        kpt_refinement: false,
        ..seeded_config(2)
    };
    let est = estimate_kpt(&graph, 1, &config, &mut StdRng::seed_from_u64(2)).unwrap();
    for pair in est.rounds.windows(2) {
        let ratio = pair[1].samples as f64 / pair[0].samples as f64;
        assert!((ratio - 2.0).abs() < 0.05, "ratio {ratio}");
        assert!((pair[1].threshold * 2.0 - pair[0].threshold).abs() < 1e-12);
    }
}

#[test]
fn test_kpt_respects_max_doublings() {
    let graph = isolated(1024);
    let config = InfluenceConfig {
        max_doublings: 3,
        ..seeded_config(3)
    };
    // No edges: no round can run, fallback applies.
    let est = estimate_kpt(&graph, 2, &config, &mut StdRng::seed_from_u64(3)).unwrap();
    assert!(!est.converged);
    assert!(est.rounds.len() <= 3);

    let graph = star(1024, 0.01);
    let est = estimate_kpt(&graph, 1, &config, &mut StdRng::seed_from_u64(3)).unwrap();
    assert!(est.rounds.len() <= 3);
}

#[test]
fn test_kpt_rejects_k_above_n() {
    let graph = star(8, 1.0);
    let err = estimate_kpt(&graph, 9, &seeded_config(4), &mut StdRng::seed_from_u64(4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_sample_size_from_fallback() {
    let lambda = calculate_lambda(100, 3, 1.0, 0.2);
    let theta = sample_size(lambda, 3.0).unwrap();
    assert_eq!(theta, (lambda / 3.0).ceil() as usize);
}
