//! ruvector-influence CLI - seed selection, spread estimation and benchmarks

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use ruvector_influence::spread::SpreadMethod;
use ruvector_influence::Strategy;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use crate::cli::{LoaderArgs, TuningArgs};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "ruvector-influence")]
#[command(about = "Influence maximization over probabilistic graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select k seed nodes from an edge list
    Seeds {
        /// Edge-list file
        input: PathBuf,

        /// Number of seeds
        #[arg(short, long)]
        k: usize,

        /// Selection strategy (ris, degree, random)
        #[arg(short, long, default_value = "ris")]
        strategy: Strategy,

        /// Include the pipeline event log
        #[arg(long)]
        events: bool,

        #[command(flatten)]
        loader: LoaderArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Estimate the expected spread of a seed list
    Spread {
        /// Edge-list file
        input: PathBuf,

        /// Seed node ids (comma-separated)
        #[arg(short = 'S', long, value_delimiter = ',', required = true)]
        seeds: Vec<usize>,

        /// Estimator (rr, monte-carlo)
        #[arg(short, long, default_value = "rr")]
        method: SpreadMethod,

        /// RR sets or cascades to sample
        #[arg(short = 'n', long, default_value_t = 100_000)]
        samples: usize,

        #[command(flatten)]
        loader: LoaderArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Compare strategies across edge-list files
    Bench {
        /// Edge-list files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Number of seeds
        #[arg(short, long, default_value_t = 10)]
        k: usize,

        /// Strategies to run (comma-separated)
        #[arg(short, long, value_delimiter = ',', default_value = "ris,degree,random")]
        strategies: Vec<Strategy>,

        /// RR sets used to score each seed set
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spread_samples: usize,

        #[command(flatten)]
        loader: LoaderArgs,

        #[command(flatten)]
        tuning: TuningArgs,
    },
}

fn init_logging(debug: bool) {
    let default = if debug {
        "ruvector_influence=debug,ruvector_influence_cli=debug"
    } else {
        "ruvector_influence=warn,ruvector_influence_cli=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config)?;

    let result = match cli.command {
        Commands::Seeds {
            input,
            k,
            strategy,
            events,
            loader,
            tuning,
        } => cli::run_seeds(
            &input,
            k,
            strategy,
            &tuning.apply(&config.influence),
            &loader.apply(&config.loader),
            events,
            cli.json,
        ),
        Commands::Spread {
            input,
            seeds,
            method,
            samples,
            loader,
            tuning,
        } => cli::run_spread(
            &input,
            &seeds,
            method,
            samples,
            &tuning.apply(&config.influence),
            &loader.apply(&config.loader),
            cli.json,
        ),
        Commands::Bench {
            inputs,
            k,
            strategies,
            spread_samples,
            loader,
            tuning,
        } => cli::run_bench(
            &inputs,
            k,
            &strategies,
            spread_samples,
            &tuning.apply(&config.influence),
            &loader.apply(&config.loader),
            cli.json,
        ),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", cli::format_error(&format!("{e:#}")));
            if cli.debug {
                eprintln!("\n{:#?}", e);
            } else {
                eprintln!("\n{}", "Run with --debug for more details".dimmed());
            }
            std::process::exit(1);
        }
    }
}
