//! In-memory station table and the equality/null predicates every report
//! is built from.

use petrodash_core::{Fuel, Station};
use std::collections::BTreeSet;
use tracing::debug;

/// Conjunction of equality and non-null predicates over stations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationFilter {
    city: Option<String>,
    region: Option<String>,
    fuels: Vec<Fuel>,
}

impl StationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Keep only stations that publish a price for `fuel`.
    pub fn with_fuel(mut self, fuel: Fuel) -> Self {
        if !self.fuels.contains(&fuel) {
            self.fuels.push(fuel);
        }
        self
    }

    pub fn with_fuels(self, fuels: impl IntoIterator<Item = Fuel>) -> Self {
        fuels.into_iter().fold(self, |f, fuel| f.with_fuel(fuel))
    }

    pub fn matches(&self, station: &Station) -> bool {
        if let Some(city) = &self.city {
            if station.city.as_deref() != Some(city.as_str()) {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if station.region.as_deref() != Some(region.as_str()) {
                return false;
            }
        }
        self.fuels.iter().all(|fuel| station.has_fuel(*fuel))
    }
}

#[derive(Debug)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Sorted distinct non-empty regions.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|s| s.region.as_deref())
    }

    /// Sorted distinct non-empty cities.
    pub fn cities(&self) -> Vec<String> {
        self.distinct(|s| s.city.as_deref())
    }

    fn distinct<'a>(&'a self, key: impl Fn(&'a Station) -> Option<&'a str>) -> Vec<String> {
        self.stations
            .iter()
            .filter_map(key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Fuels listed in `carburants_disponibles`, in first-seen order.
    pub fn available_fuels(&self) -> Vec<Fuel> {
        let mut fuels = Vec::new();
        for name in self.stations.iter().flat_map(|s| s.available_fuels.iter()) {
            match name.parse::<Fuel>() {
                Ok(fuel) if !fuels.contains(&fuel) => fuels.push(fuel),
                Ok(_) => {}
                Err(_) => debug!(fuel = %name, "Skipping unknown fuel name"),
            }
        }
        fuels
    }

    pub fn filter<'a>(&'a self, filter: &'a StationFilter) -> impl Iterator<Item = &'a Station> {
        self.stations.iter().filter(move |s| filter.matches(s))
    }

    /// Number of matching stations that publish a price for `fuel`.
    pub fn count_with_fuel(&self, fuel: Fuel, filter: &StationFilter) -> u64 {
        self.filter(filter).filter(|s| s.has_fuel(fuel)).count() as u64
    }

    /// Mean price of `fuel` over matching stations; `None` when none has a price.
    pub fn mean_price(&self, fuel: Fuel, filter: &StationFilter) -> Option<f64> {
        let (sum, n) = self
            .filter(filter)
            .filter_map(|s| s.price(fuel))
            .fold((0.0, 0usize), |(sum, n), p| (sum + p, n + 1));
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    /// Prices of `fuel` by row position, missing values included.
    pub fn price_column(&self, fuel: Fuel) -> Vec<Option<f64>> {
        self.stations.iter().map(|s| s.price(fuel)).collect()
    }

    pub fn first_station_in(&self, city: &str) -> Option<&Station> {
        self.stations
            .iter()
            .find(|s| s.city.as_deref() == Some(city))
    }

    /// Attach brand names by row position. Rows past the end of `brands`
    /// keep no brand.
    pub fn attach_brands(&mut self, brands: Vec<String>) {
        if brands.len() != self.stations.len() {
            debug!(
                stations = self.stations.len(),
                brands = brands.len(),
                "Brand column length differs from station count"
            );
        }
        for (station, brand) in self.stations.iter_mut().zip(brands) {
            station.brand = Some(brand);
        }
    }
}
