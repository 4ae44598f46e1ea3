use std::path::PathBuf;

use clap::Parser;

use crate::charts::ChartOptions;
use crate::charts::top_n::{DEFAULT_TOP_N, TopNScope};

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "listing-lens",
    version,
    about = "Interactive dashboard for short-term rental listings"
)]
pub struct Config {
    /// Listings file (.csv or .parquet), loaded once at startup.
    #[arg(long, env = "LISTING_LENS_DATA", default_value = "AB_NYC_2019.csv")]
    pub data: PathBuf,

    /// Number of neighbourhoods in the top-N chart.
    #[arg(long, env = "LISTING_LENS_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Whether the top-N chart counts the whole dataset or the filtered view.
    #[arg(long, env = "LISTING_LENS_TOP_N_SCOPE", value_enum, default_value_t = TopNScope::Dataset)]
    pub top_n_scope: TopNScope,

    /// Write chart specs for the initial selection to this directory and exit.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            top_n: self.top_n,
            top_n_scope: self.top_n_scope,
        }
    }
}

/// Initialise `env_logger`; `RUST_LOG` overrides the default level.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
