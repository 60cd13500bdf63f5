//! Fuel price reporting — national and regional summaries, city and region
//! search, the station map, and chart descriptions for the ML and bandit
//! pages.

pub mod bandit;
pub mod charts;
pub mod map;
pub mod ml;
pub mod search;
pub mod summary;

pub use bandit::bandit_charts;
pub use charts::{BarChart, GroupedBarChart, LineChart, ScatterPlot};
pub use map::{station_map, MapFilter, StationMap};
pub use ml::{cluster_chart, prediction_chart};
pub use search::{city_average_prices, price_evolution, Area};
pub use summary::{
    average_price_per_fuel, average_price_per_fuel_per_region, stations_per_brand,
    stations_per_fuel, stations_per_fuel_per_region,
};
