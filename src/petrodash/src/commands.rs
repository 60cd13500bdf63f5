//! Subcommand handlers. Each one loads what it needs and returns the JSON
//! document to print.

use crate::Commands;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use petrodash_core::config::AppConfig;
use petrodash_core::Fuel;
use petrodash_dataset::{load_prices, read_brand_column, read_brand_list, StationTable};
use petrodash_ml::{cluster_stations, predict_city_price};
use petrodash_reporting as reporting;
use petrodash_reporting::{Area, MapFilter};
use petrodash_rl_engine::{sweep, RewardSeries, SimulationSettings};
use serde_json::{json, Value};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

pub fn run(command: Commands, config: &mut AppConfig) -> anyhow::Result<Value> {
    let report = match command {
        Commands::Lists => {
            let table = prices(config)?;
            let fuels: Vec<&str> = table.available_fuels().iter().map(|f| f.label()).collect();
            json!({
                "regions": table.regions(),
                "cities": table.cities(),
                "fuels": fuels,
            })
        }
        Commands::StationsPerFuel => serde_json::to_value(reporting::stations_per_fuel(&prices(config)?))?,
        Commands::AveragePrice => {
            serde_json::to_value(reporting::average_price_per_fuel(&prices(config)?))?
        }
        Commands::StationsPerRegion => {
            serde_json::to_value(reporting::stations_per_fuel_per_region(&prices(config)?))?
        }
        Commands::AveragePricePerRegion => {
            serde_json::to_value(reporting::average_price_per_fuel_per_region(&prices(config)?))?
        }
        Commands::StationsPerBrand => {
            let path = &config.data.brand_list_path;
            let file = File::open(path).with_context(|| format!("opening brand list {}", path))?;
            let brands = read_brand_list(file)?;
            info!(brands = brands.len(), "Brand list loaded");
            serde_json::to_value(reporting::stations_per_brand(&brands))?
        }
        Commands::City { city, fuel, from, to } => {
            let table = prices(config)?;
            let averages = reporting::city_average_prices(&table, &city)?;
            let evolution = evolution(&table, config, Area::City(city), fuel, from, to)?;
            json!({ "average_prices": averages, "evolution": evolution })
        }
        Commands::Region { region, fuel, from, to } => {
            let table = prices(config)?;
            let evolution = evolution(&table, config, Area::Region(region), fuel, from, to)?;
            serde_json::to_value(evolution)?
        }
        Commands::Map { city, region, fuels } => {
            let mut table = prices(config)?;
            attach_brands(&mut table, config);
            let filter = MapFilter {
                area: city.map(Area::City).or_else(|| region.map(Area::Region)),
                fuels,
            };
            let map = reporting::station_map(&table, &filter, &config.map, config.data.coordinate_scale)?;
            serde_json::to_value(map)?
        }
        Commands::Predict { fuel, city } => {
            let table = prices(config)?;
            let prediction = predict_city_price(&table, fuel, &city, Utc::now(), &config.ml)?;
            let chart = reporting::prediction_chart(&prediction);
            json!({ "prediction": prediction, "chart": chart })
        }
        Commands::Cluster { k } => {
            if let Some(k) = k {
                config.ml.clusters = k;
            }
            let table = prices(config)?;
            let clusters = cluster_stations(&table, &config.ml)?;
            json!({
                "k": clusters.k,
                "sizes": clusters.sizes,
                "inertia": clusters.inertia,
                "chart": reporting::cluster_chart(&clusters),
            })
        }
        Commands::Bandit {
            steps,
            epsilons,
            seed,
            reward_mode,
            fuel,
            drop_missing,
        } => {
            let bandit = &mut config.bandit;
            if let Some(steps) = steps {
                bandit.steps = steps;
            }
            if !epsilons.is_empty() {
                bandit.epsilons = epsilons;
            }
            if seed.is_some() {
                bandit.seed = seed;
            }
            if let Some(mode) = reward_mode {
                bandit.reward_mode = mode;
            }
            if let Some(fuel) = fuel {
                bandit.reward_fuel = fuel;
            }
            bandit.drop_missing_rewards |= drop_missing;
            run_bandit(config)?
        }
    };
    Ok(report)
}

fn prices(config: &AppConfig) -> anyhow::Result<StationTable> {
    let table = load_prices(&config.data.prices_path, config.data.delimiter)?;
    Ok(table)
}

/// Brands are only decoration on the map; a missing file is not fatal.
fn attach_brands(table: &mut StationTable, config: &AppConfig) {
    let path = Path::new(&config.data.brand_column_path);
    let brands = File::open(path)
        .map_err(anyhow::Error::from)
        .and_then(|file| read_brand_column(file).map_err(anyhow::Error::from));
    match brands {
        Ok(brands) => table.attach_brands(brands),
        Err(e) => warn!(error = %e, path = %path.display(), "Brand column unavailable"),
    }
}

fn evolution(
    table: &StationTable,
    config: &AppConfig,
    area: Area,
    fuel: Fuel,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<reporting::LineChart> {
    let from = from.unwrap_or(config.search.default_start);
    let to = to.unwrap_or_else(|| Utc::now().date_naive());
    Ok(reporting::price_evolution(table, &area, fuel, from, to, &config.search)?)
}

fn run_bandit(config: &AppConfig) -> anyhow::Result<Value> {
    let bandit = &config.bandit;
    let table = prices(config)?;
    let rewards = RewardSeries::from_column(
        table.price_column(bandit.reward_fuel),
        bandit.drop_missing_rewards,
    );
    if rewards.missing() > 0 {
        warn!(
            missing = rewards.missing(),
            fuel = %bandit.reward_fuel,
            "Reward column has missing prices; they propagate as NaN"
        );
    }

    let settings = SimulationSettings {
        steps: bandit.steps,
        reward_mode: bandit.reward_mode,
        seed: bandit.seed,
    };
    let runs = sweep(rewards.as_slice(), &bandit.epsilons, &settings)?;
    let charts = reporting::bandit_charts(&runs);
    Ok(json!({
        "fuel": bandit.reward_fuel,
        "arms": rewards.len(),
        "dropped": rewards.dropped(),
        "runs": runs,
        "charts": charts,
    }))
}
