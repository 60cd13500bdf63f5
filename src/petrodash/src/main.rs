//! PetroDash — exploratory reports over the French fuel price feed.
//!
//! Every subcommand prints one JSON document on stdout; logs go to stderr.

mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use petrodash_core::config::AppConfig;
use petrodash_core::{Fuel, RewardMode};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "petrodash")]
#[command(about = "Fuel price dashboards, price prediction and bandit simulation")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./petrodash.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Price feed CSV (overrides config)
    #[arg(long, global = true, env = "PETRODASH__DATA__PRICES_PATH")]
    data: Option<String>,

    /// Brand list with station counts (overrides config)
    #[arg(long, global = true, env = "PETRODASH__DATA__BRAND_LIST_PATH")]
    brands_list: Option<String>,

    /// Brand column aligned with the price feed rows (overrides config)
    #[arg(long, global = true, env = "PETRODASH__DATA__BRAND_COLUMN_PATH")]
    brands_column: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Regions, cities and fuels present in the feed
    Lists,

    /// Number of stations per fuel
    StationsPerFuel,

    /// National average price per fuel
    AveragePrice,

    /// Number of stations per fuel per region
    StationsPerRegion,

    /// Average price per fuel per region
    AveragePricePerRegion,

    /// Number of stations per brand
    StationsPerBrand,

    /// Average prices in a city and the evolution of one fuel there
    City {
        #[arg(long)]
        city: String,

        #[arg(long)]
        fuel: Fuel,

        /// First day of the search (default from config)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the search (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Evolution of one fuel in a region
    Region {
        #[arg(long)]
        region: String,

        #[arg(long)]
        fuel: Fuel,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Station map, optionally restricted to a city or a region
    Map {
        #[arg(long, conflicts_with = "region")]
        city: Option<String>,

        #[arg(long)]
        region: Option<String>,

        /// Fuels every shown station must sell (repeatable)
        #[arg(long = "fuel")]
        fuels: Vec<Fuel>,
    },

    /// Predict a fuel price in a city with linear regression
    Predict {
        #[arg(long)]
        fuel: Fuel,

        #[arg(long)]
        city: String,
    },

    /// Cluster stations by position and prices
    Cluster {
        /// Number of clusters (overrides config)
        #[arg(long)]
        k: Option<usize>,
    },

    /// Run the epsilon-greedy sweep over a fuel price column
    Bandit {
        #[arg(long)]
        steps: Option<usize>,

        /// Exploration rates (repeatable, overrides config)
        #[arg(long = "epsilon")]
        epsilons: Vec<f64>,

        #[arg(long)]
        seed: Option<u64>,

        /// step-indexed or arm-indexed
        #[arg(long)]
        reward_mode: Option<RewardMode>,

        #[arg(long)]
        fuel: Option<Fuel>,

        /// Drop stations without a price instead of keeping NaN rewards
        #[arg(long, default_value_t = false)]
        drop_missing: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petrodash=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    };

    if let Some(path) = cli.data {
        config.data.prices_path = path;
    }
    if let Some(path) = cli.brands_list {
        config.data.brand_list_path = path;
    }
    if let Some(path) = cli.brands_column {
        config.data.brand_column_path = path;
    }

    info!(
        prices = %config.data.prices_path,
        command = ?cli.command,
        "Configuration loaded"
    );

    let report = commands::run(cli.command, &mut config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
