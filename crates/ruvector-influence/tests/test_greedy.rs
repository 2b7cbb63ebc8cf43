//! Integration tests for the coverage index and greedy selector on sampled
//! pools.

mod helpers;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ruvector_influence::coverage::{CoverageIndex, RrPool};
use ruvector_influence::greedy::greedy_max_coverage;
use ruvector_influence::sampler::{sample_rr_sets, RrSet};

use helpers::{disjoint_stars, isolated, random_graph};

fn sampled_pool(graph: &ruvector_influence::ProbGraph, count: usize, seed: u64) -> RrPool {
    RrPool::from(sample_rr_sets(graph, count, &mut StdRng::seed_from_u64(seed)).unwrap())
}

#[test]
fn test_batched_index_matches_rebuild() {
    let graph = random_graph(80, 0.05, 0.7, 21);
    let mut rng = StdRng::seed_from_u64(1);
    let mut pool = RrPool::new();
    let mut index = CoverageIndex::new(80);
    for batch in [700, 1, 2_500, 64] {
        pool.extend(sample_rr_sets(&graph, batch, &mut rng).unwrap());
        index.extend(&pool).unwrap();
        assert!(index.is_consistent_with(&pool));
    }
    assert_eq!(index, CoverageIndex::build(&pool, 80).unwrap());
}

#[test]
fn test_every_membership_is_indexed() {
    let graph = random_graph(30, 0.1, 0.5, 4);
    let pool = sampled_pool(&graph, 1_000, 2);
    let index = CoverageIndex::build(&pool, 30).unwrap();
    for (i, rr) in pool.sets().iter().enumerate() {
        for &v in rr.nodes() {
            assert!(index.covering(v).binary_search(&i).is_ok());
        }
    }
    let listed: usize = (0..30).map(|v| index.covering(v).len()).sum();
    let members: usize = pool.sets().iter().map(RrSet::len).sum();
    assert_eq!(listed, members);
}

#[test]
fn test_greedy_picks_each_hub_once() {
    let graph = disjoint_stars(3, 10, 1.0);
    let pool = sampled_pool(&graph, 6_000, 3);
    let index = CoverageIndex::build(&pool, 30).unwrap();
    let greedy = greedy_max_coverage(&pool, &index, 3);
    let mut seeds = greedy.seeds.into_vec();
    seeds.sort_unstable();
    assert_eq!(seeds, vec![0, 10, 20]);
    assert_eq!(greedy.covered_sets, 6_000);
}

#[test]
fn test_greedy_invariants_on_random_pool() {
    let graph = random_graph(50, 0.06, 0.4, 8);
    let pool = sampled_pool(&graph, 3_000, 4);
    let index = CoverageIndex::build(&pool, 50).unwrap();
    let greedy = greedy_max_coverage(&pool, &index, 12);

    assert_eq!(greedy.seeds.len(), 12);
    let mut distinct = greedy.seeds.as_slice().to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    assert_eq!(distinct.len(), 12);

    assert!(greedy.marginal_gains.windows(2).all(|w| w[0] >= w[1]));

    let covered = pool
        .sets()
        .iter()
        .filter(|rr| greedy.seeds.iter().any(|s| rr.contains(s)))
        .count();
    assert_eq!(covered, greedy.covered_sets);
}

#[test]
fn test_isolated_pair_selects_both() {
    let graph = isolated(2);
    let pool = sampled_pool(&graph, 1_000, 5);
    let index = CoverageIndex::build(&pool, 2).unwrap();
    let greedy = greedy_max_coverage(&pool, &index, 2);
    let mut seeds = greedy.seeds.into_vec();
    seeds.sort_unstable();
    assert_eq!(seeds, vec![0, 1]);
}

#[test]
fn test_isolated_pair_balanced_pool_order() {
    let pool = RrPool::from(vec![
        RrSet::new([1]).unwrap(),
        RrSet::new([0]).unwrap(),
        RrSet::new([0]).unwrap(),
        RrSet::new([1]).unwrap(),
    ]);
    let index = CoverageIndex::build(&pool, 2).unwrap();
    let greedy = greedy_max_coverage(&pool, &index, 2);
    assert_eq!(greedy.seeds.as_slice(), &[0, 1]);
    assert_eq!(greedy.marginal_gains, vec![2, 2]);
}
