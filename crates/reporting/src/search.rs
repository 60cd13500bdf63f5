//! City and region search: local average prices and price evolution over a
//! date range.

use crate::charts::{BarChart, CategoryPoint, LineChart, LineSeries, SeriesData};
use chrono::{NaiveDate, NaiveDateTime};
use petrodash_core::config::SearchConfig;
use petrodash_core::{Fuel, PetroError, PetroResult};
use petrodash_dataset::{StationFilter, StationTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A city or a region of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Area {
    City(String),
    Region(String),
}

impl Area {
    pub fn name(&self) -> &str {
        match self {
            Area::City(name) | Area::Region(name) => name,
        }
    }

    pub fn filter(&self) -> StationFilter {
        match self {
            Area::City(name) => StationFilter::new().in_city(name.as_str()),
            Area::Region(name) => StationFilter::new().in_region(name.as_str()),
        }
    }

    /// `NotFound` when no station of the table lies in the area.
    pub fn ensure_known(&self, table: &StationTable) -> PetroResult<()> {
        let known = match self {
            Area::City(name) => table.cities().contains(name),
            Area::Region(name) => table.regions().contains(name),
        };
        if known {
            Ok(())
        } else {
            Err(PetroError::NotFound(self.to_string()))
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::City(name) => write!(f, "city '{}'", name),
            Area::Region(name) => write!(f, "region '{}'", name),
        }
    }
}

fn midnight(date: NaiveDate) -> PetroResult<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| PetroError::InvalidInput(format!("no midnight on {}", date)))
}

/// Mean price per available fuel among the stations of `city`.
pub fn city_average_prices(table: &StationTable, city: &str) -> PetroResult<BarChart> {
    let area = Area::City(city.to_string());
    area.ensure_known(table)?;

    let filter = area.filter();
    let mut chart = BarChart::new(
        format!("Average price per fuel in the city of {}", city),
        "Carburant",
        "Average price",
    );
    for fuel in table.available_fuels() {
        chart.push(fuel.label(), table.mean_price(fuel, &filter));
    }
    Ok(chart)
}

/// Prices of `fuel` in `area` updated between `from` and `to` (both at
/// midnight, inclusive), ordered by update time and labelled by month.
///
/// Timestamps are compared in the wall time they were published with.
pub fn price_evolution(
    table: &StationTable,
    area: &Area,
    fuel: Fuel,
    from: NaiveDate,
    to: NaiveDate,
    config: &SearchConfig,
) -> PetroResult<LineChart> {
    area.ensure_known(table)?;
    if from > to {
        return Err(PetroError::InvalidInput(format!(
            "search starts on {} after it ends on {}",
            from, to
        )));
    }

    let lower = midnight(from)?;
    let upper = midnight(to)?;
    let filter = area.filter().with_fuel(fuel);

    let mut samples: Vec<(NaiveDateTime, f64)> = table
        .filter(&filter)
        .filter_map(|s| {
            let quote = s.quote(fuel);
            Some((quote.updated_at?.naive_local(), quote.price?))
        })
        .filter(|(ts, _)| *ts >= lower && *ts <= upper)
        .collect();
    samples.sort_by_key(|(ts, _)| *ts);
    debug!(area = %area, fuel = %fuel, points = samples.len(), "Price evolution selected");

    let points = samples
        .into_iter()
        .map(|(ts, price)| CategoryPoint {
            category: ts.format("%B").to_string(),
            y: price,
        })
        .collect();

    let mut chart = LineChart::new(
        format!(
            "Evolution of the price of {} according to time on {}",
            fuel.label(),
            area.name()
        ),
        "Month",
        "Price",
    )
    .with_y_domain(config.price_axis_min, config.price_axis_max);
    chart.x_categories = MONTHS.iter().map(|m| m.to_string()).collect();
    chart.series.push(LineSeries {
        name: fuel.label().to_string(),
        data: SeriesData::Categorical(points),
    });
    Ok(chart)
}
