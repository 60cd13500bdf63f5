//! Fuel price prediction from update time and station position.
//!
//! Features are `[update timestamp (s), latitude, longitude]` with the raw
//! coordinates of the feed; they are standardised before an ordinary least
//! squares fit. The model is evaluated on a held-out split and then queried
//! at a city's coordinates.

use crate::regression::{mean_squared_error, train_test_split, LinearRegression};
use crate::scaler::StandardScaler;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use petrodash_core::config::MlConfig;
use petrodash_core::{Fuel, PetroError, PetroResult};
use petrodash_dataset::StationTable;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePrediction {
    pub fuel: Fuel,
    pub city: String,
    pub predicted_at: DateTime<Utc>,
    /// Rounded to three decimals.
    pub predicted_price: f64,
    pub mean_squared_error: f64,
    pub train_samples: usize,
    pub test_samples: usize,
    pub test_actual: Vec<f64>,
    pub test_predicted: Vec<f64>,
}

struct Samples {
    features: Array2<f64>,
    targets: Array1<f64>,
}

fn collect_samples(table: &StationTable, fuel: Fuel) -> PetroResult<Samples> {
    let rows: Vec<[f64; 4]> = table
        .stations()
        .iter()
        .filter_map(|s| {
            let quote = s.quote(fuel);
            Some([
                quote.updated_at?.timestamp() as f64,
                s.latitude?,
                s.longitude?,
                quote.price?,
            ])
        })
        .collect();

    let n = rows.len();
    if n < 2 {
        return Err(PetroError::InvalidInput(format!(
            "only {} usable {} samples",
            n,
            fuel.label()
        )));
    }
    Ok(Samples {
        features: Array2::from_shape_fn((n, 3), |(i, j)| rows[i][j]),
        targets: Array1::from_iter(rows.iter().map(|r| r[3])),
    })
}

fn select_rows(x: &Array2<f64>, idx: &[usize]) -> Array2<f64> {
    x.select(ndarray::Axis(0), idx)
}

/// Fit on the feed and predict the `fuel` price at the first station of
/// `city`, as of `at`.
pub fn predict_city_price(
    table: &StationTable,
    fuel: Fuel,
    city: &str,
    at: DateTime<Utc>,
    config: &MlConfig,
) -> PetroResult<PricePrediction> {
    let station = table
        .first_station_in(city)
        .ok_or_else(|| PetroError::NotFound(format!("city '{}'", city)))?;
    let (latitude, longitude) = match (station.latitude, station.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(PetroError::InvalidInput(format!(
                "first station of '{}' has no coordinates",
                city
            )))
        }
    };

    let samples = collect_samples(table, fuel)?;
    let (train_idx, test_idx) =
        train_test_split(samples.targets.len(), config.test_size, config.split_seed)?;

    let x_train = select_rows(&samples.features, &train_idx);
    let y_train = samples.targets.select(ndarray::Axis(0), &train_idx);
    let x_test = select_rows(&samples.features, &test_idx);
    let y_test = samples.targets.select(ndarray::Axis(0), &test_idx);

    let scaler = StandardScaler::fit(&x_train)?;
    let model = LinearRegression::fit(&scaler.transform(&x_train), &y_train)?;

    let y_pred = model.predict(&scaler.transform(&x_test));
    let mse = mean_squared_error(&y_test, &y_pred);

    let query = Array2::from_shape_vec((1, 3), vec![at.timestamp() as f64, latitude, longitude])
        .map_err(|e| PetroError::Model(e.to_string()))?;
    let raw = model.predict(&scaler.transform(&query))[0];
    let predicted_price = (raw * 1000.0).round() / 1000.0;

    info!(
        fuel = %fuel,
        city,
        mse,
        predicted_price,
        train = train_idx.len(),
        test = test_idx.len(),
        "Price model evaluated"
    );

    Ok(PricePrediction {
        fuel,
        city: city.to_string(),
        predicted_at: at,
        predicted_price,
        mean_squared_error: mse,
        train_samples: train_idx.len(),
        test_samples: test_idx.len(),
        test_actual: y_test.to_vec(),
        test_predicted: y_pred.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use petrodash_core::Station;

    fn station(city: &str, day: u32, lat: f64, lon: f64, price: Option<f64>) -> Station {
        let mut s = Station {
            city: Some(city.to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        };
        let quote = s.quote_mut(Fuel::Gazole);
        quote.price = price;
        quote.updated_at = Some(
            FixedOffset::east_opt(3600)
                .unwrap()
                .with_ymd_and_hms(2023, 3, day, 12, 0, 0)
                .unwrap(),
        );
        s
    }

    /// Prices that are an exact linear function of latitude. Update days are
    /// a permutation of 1..=20 so time is not collinear with latitude.
    fn linear_table() -> StationTable {
        let stations = (1..=20u32)
            .map(|i| {
                let lat = 4_300_000.0 + i as f64 * 10_000.0;
                let lon = 200_000.0 + ((i * 7) % 5) as f64 * 1_000.0;
                let price = 1.5 + (lat - 4_300_000.0) / 1_000_000.0;
                let day = (i * 3) % 20 + 1;
                station(if i == 3 { "Lyon" } else { "Elsewhere" }, day, lat, lon, Some(price))
            })
            .collect();
        StationTable::new(stations)
    }

    #[test]
    fn test_exact_linear_relation_is_recovered() {
        let table = linear_table();
        let at = Utc.with_ymd_and_hms(2023, 3, 10, 0, 0, 0).unwrap();
        let prediction =
            predict_city_price(&table, Fuel::Gazole, "Lyon", at, &MlConfig::default()).unwrap();

        assert_eq!(prediction.test_samples, 4);
        assert_eq!(prediction.train_samples, 16);
        assert!(prediction.mean_squared_error < 1e-12);
        // Lyon sits at latitude 4_330_000 -> 1.53
        assert!((prediction.predicted_price - 1.53).abs() < 1e-9);
        assert_eq!(prediction.test_actual.len(), prediction.test_predicted.len());
    }

    #[test]
    fn test_unknown_city() {
        let table = linear_table();
        let err = predict_city_price(&table, Fuel::Gazole, "Paris", Utc::now(), &MlConfig::default())
            .unwrap_err();
        assert!(matches!(err, PetroError::NotFound(_)));
    }

    #[test]
    fn test_too_few_samples() {
        let table = StationTable::new(vec![station("Lyon", 1, 4_500_000.0, 400_000.0, Some(1.8))]);
        let err = predict_city_price(&table, Fuel::Gazole, "Lyon", Utc::now(), &MlConfig::default())
            .unwrap_err();
        assert!(matches!(err, PetroError::InvalidInput(_)));
    }

    #[test]
    fn test_rows_without_price_are_dropped() {
        let mut stations: Vec<Station> = (1..=10)
            .map(|i| station("Lyon", i, 4_500_000.0 + i as f64, 400_000.0, Some(1.8)))
            .collect();
        stations.push(station("Lyon", 11, 4_500_100.0, 400_000.0, None));
        let table = StationTable::new(stations);
        let prediction =
            predict_city_price(&table, Fuel::Gazole, "Lyon", Utc::now(), &MlConfig::default())
                .unwrap();
        assert_eq!(prediction.train_samples + prediction.test_samples, 10);
    }
}
