//! National and per-region fuel summaries.

use crate::charts::{BarChart, GroupedBarChart};
use petrodash_core::{BrandCount, Fuel};
use petrodash_dataset::{StationFilter, StationTable};
use tracing::debug;

/// Number of stations publishing a price, per fuel in [`Fuel::ALL`] order.
pub fn stations_per_fuel(table: &StationTable) -> BarChart {
    let all = StationFilter::new();
    let mut chart = BarChart::new("Number of stations per fuel", "Carburant", "Number of stations");
    for fuel in Fuel::ALL {
        chart.push(fuel.label(), Some(table.count_with_fuel(fuel, &all) as f64));
    }
    chart
}

/// Mean national price of every fuel the feed lists as available.
pub fn average_price_per_fuel(table: &StationTable) -> BarChart {
    let all = StationFilter::new();
    let mut chart = BarChart::new("Average price per fuel", "Carburant", "Average price");
    for fuel in table.available_fuels() {
        chart.push(fuel.label(), table.mean_price(fuel, &all));
    }
    chart
}

fn per_region(
    table: &StationTable,
    title: &str,
    y_label: &str,
    value: impl Fn(Fuel, &StationFilter) -> Option<f64>,
) -> GroupedBarChart {
    let categories = table.regions();
    let values = categories
        .iter()
        .map(|region| {
            let filter = StationFilter::new().in_region(region.as_str());
            Fuel::ALL.iter().map(|fuel| value(*fuel, &filter)).collect()
        })
        .collect();
    debug!(regions = categories.len(), chart = title, "Per-region summary built");

    GroupedBarChart {
        title: title.to_string(),
        x_label: "Region".to_string(),
        y_label: y_label.to_string(),
        categories,
        series: Fuel::ALL.iter().map(|f| f.label().to_string()).collect(),
        values,
    }
}

pub fn stations_per_fuel_per_region(table: &StationTable) -> GroupedBarChart {
    per_region(
        table,
        "Number of stations per fuel per region",
        "Number stations",
        |fuel, filter| Some(table.count_with_fuel(fuel, filter) as f64),
    )
}

pub fn average_price_per_fuel_per_region(table: &StationTable) -> GroupedBarChart {
    per_region(
        table,
        "Average price per fuel per region",
        "Average price",
        |fuel, filter| table.mean_price(fuel, filter),
    )
}

pub fn stations_per_brand(brands: &[BrandCount]) -> BarChart {
    let mut chart = BarChart::new("Number of stations per brand", "Brand", "Number of stations");
    for brand in brands {
        chart.push(brand.name.as_str(), Some(brand.stations as f64));
    }
    chart
}
