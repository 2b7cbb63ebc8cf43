//! CLI module for ruvector-influence

pub mod commands;
pub mod format;

use clap::{Args, ValueEnum};
use ruvector_influence::io::{EdgeListOptions, EdgeWeighting};
use ruvector_influence::InfluenceConfig;

pub use commands::*;
pub use format::*;

/// Probability source for loaded edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightingArg {
    /// Third column of each row
    Explicit,
    /// Same probability on every edge (see --probability)
    Uniform,
    /// 1 / in-degree of the destination
    WeightedCascade,
}

/// Edge-list loader flags
#[derive(Debug, Clone, Default, Args)]
pub struct LoaderArgs {
    /// Field delimiter (default: whitespace)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Probability source
    #[arg(short = 'w', long, value_enum)]
    pub weighting: Option<WeightingArg>,

    /// Edge probability for --weighting uniform
    #[arg(short = 'p', long, default_value_t = 0.1)]
    pub probability: f32,

    /// Node count (default: largest id + 1)
    #[arg(long)]
    pub nodes: Option<usize>,
}

impl LoaderArgs {
    /// Overlay these flags on the configured loader options
    pub fn apply(&self, base: &EdgeListOptions) -> EdgeListOptions {
        let mut options = base.clone();
        if let Some(d) = self.delimiter {
            options.delimiter = Some(d);
        }
        if let Some(w) = self.weighting {
            options.weighting = match w {
                WeightingArg::Explicit => EdgeWeighting::Explicit,
                WeightingArg::Uniform => EdgeWeighting::Uniform(self.probability),
                WeightingArg::WeightedCascade => EdgeWeighting::WeightedCascade,
            };
        }
        if self.nodes.is_some() {
            options.num_nodes = self.nodes;
        }
        options
    }
}

/// Algorithm tuning flags
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// Accuracy epsilon in (0, 1)
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Confidence exponent l > 0
    #[arg(short = 'l', long)]
    pub ell: Option<f64>,

    /// Random seed (0 = entropy)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl TuningArgs {
    /// Overlay these flags on the configured parameters
    pub fn apply(&self, base: &InfluenceConfig) -> InfluenceConfig {
        let mut config = base.clone();
        if let Some(e) = self.epsilon {
            config.epsilon = e;
        }
        if let Some(l) = self.ell {
            config.ell = l;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        config
    }
}
