//! Integration tests for loading edge lists from disk.

use std::io::Write;

use ruvector_influence::io::{load_edge_list, EdgeListOptions, EdgeWeighting};
use ruvector_influence::{ErrorKind, InfluenceError, InfluenceMaximizer, InfluenceConfig};
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_explicit_probabilities() {
    let file = write_temp("# src dst p\n0 1 0.5\n1 2 0.25\n2 3 1.0\n");
    let graph = load_edge_list(file.path(), &EdgeListOptions::default()).unwrap();
    assert_eq!(graph.num_nodes(), 4);
    assert_eq!(graph.num_edges(), 3);
    assert_eq!(graph.in_neighbors(2).collect::<Vec<_>>(), vec![(1, 0.25)]);
}

#[test]
fn test_load_tab_separated_with_weighted_cascade() {
    let file = write_temp("0\t2\n1\t2\n2\t3\n");
    let options = EdgeListOptions {
        delimiter: Some('\t'),
        weighting: EdgeWeighting::WeightedCascade,
        num_nodes: None,
    };
    let graph = load_edge_list(file.path(), &options).unwrap();
    assert!(graph.in_neighbors(2).all(|(_, p)| (p - 0.5).abs() < 1e-6));
    assert_eq!(graph.in_neighbors(3).collect::<Vec<_>>(), vec![(2, 1.0)]);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let file = write_temp("0 1 0.5\n1 2 0.5\n1 two 0.5\n");
    match load_edge_list(file.path(), &EdgeListOptions::default()) {
        Err(InfluenceError::Parse { line, detail }) => {
            assert_eq!(line, 3);
            assert!(detail.contains("two"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_missing_file_is_structural() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_edge_list(dir.path().join("absent.txt"), &EdgeListOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn test_loaded_chain_feeds_pipeline() {
    let file = write_temp("0 1 1\n1 2 1\n2 3 1\n3 4 1\n");
    let graph = load_edge_list(file.path(), &EdgeListOptions::default()).unwrap();
    let config = InfluenceConfig {
        seed: 13,
        ..Default::default()
    };
    let result = InfluenceMaximizer::new(config).find_k_seeds(&graph, 1).unwrap();
    assert_eq!(result.seeds.as_slice(), &[0]);
}
