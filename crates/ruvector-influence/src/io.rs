//! Edge-list loading.
//!
//! The accepted format is one edge per line:
//!
//! ```text
//! # comment
//! % also a comment
//! source destination [probability]
//! ```
//!
//! Fields are separated by whitespace unless a delimiter is configured.
//! Node ids are non-negative integers; the node count is `max id + 1` unless
//! given explicitly. [`EdgeWeighting`] decides where probabilities come from.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::InfluenceError;
use crate::graph::ProbGraph;
use crate::validation::MAX_NODES;

/// Source of per-edge activation probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeWeighting {
    /// Third column of each row; rows without one are rejected.
    Explicit,
    /// The same probability on every edge; any third column is ignored.
    Uniform(f32),
    /// `1 / in-degree(destination)`; any third column is ignored.
    WeightedCascade,
}

/// Loader options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeListOptions {
    /// Field separator; `None` splits on runs of whitespace.
    pub delimiter: Option<char>,
    /// Probability source.
    pub weighting: EdgeWeighting,
    /// Node count; `None` infers `max id + 1`.
    pub num_nodes: Option<usize>,
}

impl Default for EdgeListOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            weighting: EdgeWeighting::Explicit,
            num_nodes: None,
        }
    }
}

/// Load a graph from the edge-list file at `path`.
///
/// # Errors
///
/// - [`InfluenceError::Io`] if the file cannot be opened or read.
/// - [`InfluenceError::Parse`] naming the first malformed line.
/// - [`InfluenceError::Configuration`] for an invalid uniform probability.
pub fn load_edge_list(
    path: impl AsRef<Path>,
    options: &EdgeListOptions,
) -> Result<ProbGraph, InfluenceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| InfluenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_lines(BufReader::new(file), options, path)?;
    info!(
        target: "ruvector_influence::io",
        path = %path.display(),
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "loaded edge list",
    );
    Ok(graph)
}

/// Parse an edge list from any buffered reader.
///
/// # Errors
///
/// As [`load_edge_list`].
///
/// # Example
///
/// ```
/// use ruvector_influence::io::{parse_edge_list, EdgeListOptions};
///
/// let text = "# demo\n0 1 0.5\n1 2 1.0\n";
/// let graph = parse_edge_list(text.as_bytes(), &EdgeListOptions::default()).unwrap();
/// assert_eq!((graph.num_nodes(), graph.num_edges()), (3, 2));
/// ```
pub fn parse_edge_list<R: BufRead>(
    reader: R,
    options: &EdgeListOptions,
) -> Result<ProbGraph, InfluenceError> {
    parse_lines(reader, options, Path::new("<input>"))
}

fn parse_lines<R: BufRead>(
    reader: R,
    options: &EdgeListOptions,
    path: &Path,
) -> Result<ProbGraph, InfluenceError> {
    if let EdgeWeighting::Uniform(p) = options.weighting {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(InfluenceError::configuration("uniform probability", p, "[0.0, 1.0]"));
        }
    }
    if let Some(declared) = options.num_nodes {
        if declared > MAX_NODES {
            return Err(InfluenceError::configuration(
                "num_nodes",
                declared,
                format!("<= {MAX_NODES}"),
            ));
        }
    }

    let mut edges: Vec<(usize, usize, f32)> = Vec::new();
    let mut max_id: Option<usize> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| InfluenceError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        let row = line.trim();
        if row.is_empty() || row.starts_with('#') || row.starts_with('%') {
            continue;
        }

        let fields: Vec<&str> = match options.delimiter {
            Some(d) => row.split(d).map(str::trim).collect(),
            None => row.split_whitespace().collect(),
        };
        let (src, dst, prob) = match fields.as_slice() {
            [s, d] => (*s, *d, None),
            [s, d, p] => (*s, *d, Some(*p)),
            _ => {
                return Err(parse_error(
                    line_no,
                    format!("expected 2 or 3 fields, found {}", fields.len()),
                ))
            }
        };

        let src = parse_node(line_no, "source", src)?;
        let dst = parse_node(line_no, "destination", dst)?;
        if let Some(limit) = options.num_nodes {
            if let Some(&bad) = [src, dst].iter().find(|&&v| v >= limit) {
                return Err(parse_error(
                    line_no,
                    format!("node {bad} outside declared node count {limit}"),
                ));
            }
        }

        let p = match options.weighting {
            EdgeWeighting::Explicit => {
                let raw = prob.ok_or_else(|| parse_error(line_no, "missing probability column"))?;
                let p: f32 = raw
                    .parse()
                    .map_err(|_| parse_error(line_no, format!("invalid probability '{raw}'")))?;
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Err(parse_error(line_no, format!("probability {p} outside [0, 1]")));
                }
                p
            }
            EdgeWeighting::Uniform(p) => p,
            // Filled in once all in-degrees are known.
            EdgeWeighting::WeightedCascade => 0.0,
        };

        max_id = Some(max_id.map_or(src.max(dst), |m| m.max(src).max(dst)));
        edges.push((src, dst, p));
    }

    let num_nodes = options
        .num_nodes
        .unwrap_or_else(|| max_id.map_or(0, |m| m + 1));

    if options.weighting == EdgeWeighting::WeightedCascade {
        let mut in_degree = vec![0u32; num_nodes];
        for &(_, dst, _) in &edges {
            in_degree[dst] += 1;
        }
        for edge in &mut edges {
            edge.2 = 1.0 / in_degree[edge.1] as f32;
        }
    }

    ProbGraph::from_edges(num_nodes, edges)
}

fn parse_node(line: usize, field: &str, raw: &str) -> Result<usize, InfluenceError> {
    let id: usize = raw
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {field} id '{raw}'")))?;
    if id >= MAX_NODES {
        return Err(parse_error(
            line,
            format!("{field} id {id} exceeds the node limit {MAX_NODES}"),
        ));
    }
    Ok(id)
}

fn parse_error(line: usize, detail: impl Into<String>) -> InfluenceError {
    InfluenceError::Parse {
        line,
        detail: detail.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
