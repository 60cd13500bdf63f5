//! Station map: one tooltip-ready point per station plus the view and layer
//! settings a map front-end needs.

use crate::search::Area;
use petrodash_core::config::MapConfig;
use petrodash_core::{Fuel, PetroResult, Station};
use petrodash_dataset::{brand_logo_key, display_brand, StationFilter, StationTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const PRICE_NOT_AVAILABLE: &str = "Not available in station";
pub const NO_UPDATE: &str = "No Update";

/// Optional area plus the fuels every shown station must sell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFilter {
    pub area: Option<Area>,
    #[serde(default)]
    pub fuels: Vec<Fuel>,
}

impl MapFilter {
    fn station_filter(&self) -> StationFilter {
        let base = self
            .area
            .as_ref()
            .map(Area::filter)
            .unwrap_or_default();
        base.with_fuels(self.fuels.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTooltip {
    pub fuel: String,
    pub price: String,
    pub updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub station_id: String,
    /// Decimal degrees.
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub brand: String,
    pub brand_logo: String,
    pub motorway: bool,
    pub fuels: Vec<FuelTooltip>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub pitch: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub kind: String,
    pub radius: u32,
    pub color: [u8; 3],
    pub pickable: bool,
    pub auto_highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMap {
    pub title: String,
    pub view_state: ViewState,
    pub layer: LayerStyle,
    pub points: Vec<MapPoint>,
}

fn fuel_tooltip(station: &Station, fuel: Fuel) -> FuelTooltip {
    let quote = station.quote(fuel);
    FuelTooltip {
        fuel: fuel.label().to_string(),
        price: quote
            .price
            .map(|p| p.to_string())
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string()),
        updated: quote
            .updated_at
            .map(|ts| ts.format("%d/%m at %H:%M").to_string())
            .unwrap_or_else(|| NO_UPDATE.to_string()),
    }
}

fn map_point(station: &Station, coordinate_scale: f64) -> Option<MapPoint> {
    let (latitude, longitude) = station.decimal_position(coordinate_scale)?;
    let brand = display_brand(station.brand.as_deref().unwrap_or_default());
    Some(MapPoint {
        station_id: station.id.clone(),
        latitude,
        longitude,
        address: station.address.clone(),
        postal_code: station.postal_code.clone(),
        city: station.city.clone().unwrap_or_default(),
        brand_logo: brand_logo_key(&brand),
        brand,
        motorway: station.on_motorway(),
        fuels: Fuel::ALL.iter().map(|f| fuel_tooltip(station, *f)).collect(),
    })
}

/// Build the map of stations matching `filter`. Stations without
/// coordinates cannot be placed and are left out.
pub fn station_map(
    table: &StationTable,
    filter: &MapFilter,
    config: &MapConfig,
    coordinate_scale: f64,
) -> PetroResult<StationMap> {
    if let Some(area) = &filter.area {
        area.ensure_known(table)?;
    }

    let predicate = filter.station_filter();
    let mut skipped = 0usize;
    let points: Vec<MapPoint> = table
        .filter(&predicate)
        .filter_map(|s| {
            let point = map_point(s, coordinate_scale);
            if point.is_none() {
                skipped += 1;
            }
            point
        })
        .collect();
    if skipped > 0 {
        debug!(skipped, "Stations without coordinates left off the map");
    }
    info!(points = points.len(), "Station map built");

    Ok(StationMap {
        title: "Gas Station Map".to_string(),
        view_state: ViewState {
            latitude: config.center_latitude,
            longitude: config.center_longitude,
            zoom: config.zoom,
            pitch: 0,
        },
        layer: LayerStyle {
            kind: "ScatterplotLayer".to_string(),
            radius: config.point_radius,
            color: config.point_color,
            pickable: true,
            auto_highlight: true,
        },
        points,
    })
}
