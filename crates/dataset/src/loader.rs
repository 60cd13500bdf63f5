//! CSV loader for the instantaneous price feed.
//!
//! The feed is semicolon-separated with one row per station. Columns are
//! resolved from the header so that extra or reordered columns are
//! tolerated; only `id`, `latitude` and `longitude` are required.

use crate::table::StationTable;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use csv::StringRecord;
use petrodash_core::{Fuel, PetroError, PetroResult, Station};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Column positions resolved from the header row.
struct Columns {
    id: usize,
    latitude: usize,
    longitude: usize,
    postal_code: Option<usize>,
    pop: Option<usize>,
    address: Option<usize>,
    city: Option<usize>,
    region: Option<usize>,
    department: Option<usize>,
    available: Option<usize>,
    prices: [Option<usize>; 6],
    updates: [Option<usize>; 6],
}

impl Columns {
    fn resolve(headers: &StringRecord) -> PetroResult<Self> {
        let required = |name: &str| {
            header_index(headers, name).ok_or_else(|| PetroError::MissingColumn(name.to_string()))
        };

        let mut prices = [None; 6];
        let mut updates = [None; 6];
        for fuel in Fuel::ALL {
            prices[fuel.index()] = header_index(headers, &fuel.price_column());
            updates[fuel.index()] = header_index(headers, &fuel.update_column());
        }

        Ok(Self {
            id: required("id")?,
            latitude: required("latitude")?,
            longitude: required("longitude")?,
            postal_code: header_index(headers, "cp"),
            pop: header_index(headers, "pop"),
            address: header_index(headers, "adresse"),
            city: header_index(headers, "ville"),
            region: header_index(headers, "region"),
            department: header_index(headers, "departement"),
            available: header_index(headers, "carburants_disponibles"),
            prices,
            updates,
        })
    }
}

fn header_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(name))
}

fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
    idx.and_then(|i| record.get(i)).map(str::trim).unwrap_or("")
}

fn optional_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_number(raw: &str, column: &str, row: usize) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    match raw.replace(',', ".").parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            debug!(row, column, value = raw, "Unparseable number, treated as missing");
            None
        }
    }
}

/// Parse a feed timestamp. RFC 3339 values keep their offset; naive values
/// are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(ts);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

fn parse_station(record: &StringRecord, cols: &Columns, row: usize) -> Station {
    let mut station = Station {
        id: field(record, Some(cols.id)).to_string(),
        latitude: parse_number(field(record, Some(cols.latitude)), "latitude", row),
        longitude: parse_number(field(record, Some(cols.longitude)), "longitude", row),
        postal_code: field(record, cols.postal_code).to_string(),
        pop: field(record, cols.pop).to_string(),
        address: field(record, cols.address).to_string(),
        city: optional_text(field(record, cols.city)),
        region: optional_text(field(record, cols.region)),
        department: optional_text(field(record, cols.department)),
        available_fuels: field(record, cols.available)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ..Default::default()
    };

    for fuel in Fuel::ALL {
        let quote = station.quote_mut(fuel);
        quote.price = parse_number(
            field(record, cols.prices[fuel.index()]),
            fuel.column_prefix(),
            row,
        );
        quote.updated_at = parse_timestamp(field(record, cols.updates[fuel.index()]));
    }

    station
}

/// Read the price feed from any reader.
pub fn read_prices<R: Read>(reader: R, delimiter: char) -> PetroResult<StationTable> {
    if !delimiter.is_ascii() {
        return Err(PetroError::InvalidInput(format!(
            "delimiter '{}' is not a single-byte character",
            delimiter
        )));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = Columns::resolve(&headers)?;

    let mut stations = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        stations.push(parse_station(&record, &cols, row));
    }

    debug!(rows = stations.len(), "Parsed price feed");
    Ok(StationTable::new(stations))
}

/// Load the price feed from disk.
pub fn load_prices(path: impl AsRef<Path>, delimiter: char) -> PetroResult<StationTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PetroError::Dataset(format!("cannot open {}: {}", path.display(), e))
    })?;
    let table = read_prices(file, delimiter)?;
    info!(
        path = %path.display(),
        stations = table.len(),
        "Price dataset loaded"
    );
    Ok(table)
}
