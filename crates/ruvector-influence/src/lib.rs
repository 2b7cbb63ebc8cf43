//! Influence maximization by reverse influence sampling.
//!
//! Given a directed graph whose edges carry independent activation
//! probabilities (the Independent Cascade model), this crate selects `k`
//! seed nodes whose expected spread is within `1 - 1/e - epsilon` of optimal
//! with probability at least `1 - 1/n^l`.
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Graph store | [`graph`] | forward + reverse CSR |
//! | KPT / lambda | [`estimator`] | RR-set count `theta` |
//! | RR sampling | [`sampler`] | `theta` RR sets |
//! | Coverage + greedy | [`coverage`], [`greedy`] | `k` seeds |
//!
//! [`pipeline::InfluenceMaximizer`] runs all stages; [`strategy`] lets the
//! final stage be swapped for a baseline or a custom implementation.
//!
//! # Example
//!
//! ```rust
//! use ruvector_influence::graph::ProbGraph;
//! use ruvector_influence::pipeline::InfluenceMaximizer;
//! use ruvector_influence::types::InfluenceConfig;
//!
//! // Two disjoint certain chains: 0 -> 1 -> 2 and 3 -> 4.
//! let graph = ProbGraph::from_edges(
//!     5,
//!     vec![(0, 1, 1.0), (1, 2, 1.0), (3, 4, 1.0)],
//! ).unwrap();
//!
//! let config = InfluenceConfig { seed: 42, ..Default::default() };
//! let result = InfluenceMaximizer::new(config).find_k_seeds(&graph, 2).unwrap();
//!
//! let mut seeds = result.seeds.into_vec();
//! seeds.sort_unstable();
//! assert_eq!(seeds, vec![0, 3]);
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon-parallel RR sampling, coverage indexing and
//!   greedy argmax. Seeded results are identical with or without it.

pub mod budget;
pub mod combinatorics;
pub mod coverage;
pub mod error;
pub mod estimator;
pub mod events;
pub mod graph;
pub mod greedy;
pub mod io;
pub mod pipeline;
pub mod sampler;
pub mod spread;
pub mod strategy;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, InfluenceError, ValidationError};
pub use graph::ProbGraph;
pub use pipeline::InfluenceMaximizer;
pub use strategy::NodeSelection;
pub use types::{InfluenceConfig, InfluenceResult, SeedSet, Strategy};
