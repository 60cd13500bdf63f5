use crate::types::{Fuel, RewardMode};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `PETRODASH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub ml: MlConfig,
    #[serde(default)]
    pub bandit: BanditConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_prices_path")]
    pub prices_path: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_brand_list_path")]
    pub brand_list_path: String,
    #[serde(default = "default_brand_column_path")]
    pub brand_column_path: String,
    /// Coordinates are stored in the file as degrees * this factor.
    #[serde(default = "default_coordinate_scale")]
    pub coordinate_scale: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_start")]
    pub default_start: NaiveDate,
    #[serde(default = "default_price_axis_min")]
    pub price_axis_min: f64,
    #[serde(default = "default_price_axis_max")]
    pub price_axis_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_point_radius")]
    pub point_radius: u32,
    #[serde(default = "default_point_color")]
    pub point_color: [u8; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct MlConfig {
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_split_seed")]
    pub split_seed: u64,
    #[serde(default = "default_clusters")]
    pub clusters: usize,
    #[serde(default = "default_kmeans_seed")]
    pub kmeans_seed: u64,
    #[serde(default = "default_kmeans_max_iter")]
    pub kmeans_max_iter: usize,
    #[serde(default = "default_kmeans_n_init")]
    pub kmeans_n_init: usize,
    #[serde(default = "default_kmeans_tolerance")]
    pub kmeans_tolerance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanditConfig {
    #[serde(default = "default_bandit_steps")]
    pub steps: usize,
    #[serde(default = "default_epsilons")]
    pub epsilons: Vec<f64>,
    #[serde(default = "default_reward_fuel")]
    pub reward_fuel: Fuel,
    #[serde(default)]
    pub reward_mode: RewardMode,
    #[serde(default)]
    pub drop_missing_rewards: bool,
    #[serde(default)]
    pub seed: Option<u64>,
}

// Default functions
fn default_prices_path() -> String {
    "data/prix-des-carburants-en-france-flux-instantane-v2.csv".to_string()
}
fn default_delimiter() -> char {
    ';'
}
fn default_brand_list_path() -> String {
    "data/brand.txt".to_string()
}
fn default_brand_column_path() -> String {
    "data/brand.csv".to_string()
}
fn default_coordinate_scale() -> f64 {
    100_000.0
}
fn default_search_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}
fn default_price_axis_min() -> f64 {
    1.0
}
fn default_price_axis_max() -> f64 {
    3.0
}
fn default_center_latitude() -> f64 {
    48.8566
}
fn default_center_longitude() -> f64 {
    2.3522
}
fn default_zoom() -> u8 {
    4
}
fn default_point_radius() -> u32 {
    2500
}
fn default_point_color() -> [u8; 3] {
    [255, 0, 0]
}
fn default_test_size() -> f64 {
    0.2
}
fn default_split_seed() -> u64 {
    42
}
fn default_clusters() -> usize {
    6
}
fn default_kmeans_seed() -> u64 {
    0
}
fn default_kmeans_max_iter() -> usize {
    300
}
fn default_kmeans_n_init() -> usize {
    10
}
fn default_kmeans_tolerance() -> f64 {
    1e-4
}
fn default_bandit_steps() -> usize {
    1000
}
fn default_epsilons() -> Vec<f64> {
    vec![0.1, 0.5, 1.0]
}
fn default_reward_fuel() -> Fuel {
    Fuel::Gazole
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            prices_path: default_prices_path(),
            delimiter: default_delimiter(),
            brand_list_path: default_brand_list_path(),
            brand_column_path: default_brand_column_path(),
            coordinate_scale: default_coordinate_scale(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_start: default_search_start(),
            price_axis_min: default_price_axis_min(),
            price_axis_max: default_price_axis_max(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            zoom: default_zoom(),
            point_radius: default_point_radius(),
            point_color: default_point_color(),
        }
    }
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            split_seed: default_split_seed(),
            clusters: default_clusters(),
            kmeans_seed: default_kmeans_seed(),
            kmeans_max_iter: default_kmeans_max_iter(),
            kmeans_n_init: default_kmeans_n_init(),
            kmeans_tolerance: default_kmeans_tolerance(),
        }
    }
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            steps: default_bandit_steps(),
            epsilons: default_epsilons(),
            reward_fuel: default_reward_fuel(),
            reward_mode: RewardMode::default(),
            drop_missing_rewards: false,
            seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            search: SearchConfig::default(),
            map: MapConfig::default(),
            ml: MlConfig::default(),
            bandit: BanditConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and environment variables.
    ///
    /// With no explicit path, `petrodash.toml` in the working directory is
    /// used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name("petrodash").required(false)),
        };

        let config = builder
            .add_source(
                config::Environment::with_prefix("PETRODASH")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("bandit.epsilons"),
            )
            .build()?;
        config.try_deserialize()
    }
}
