//! Station segmentation by position and price profile.

use crate::kmeans::KMeans;
use crate::scaler::StandardScaler;
use ndarray::Array2;
use petrodash_core::config::MlConfig;
use petrodash_core::{Fuel, PetroError, PetroResult};
use petrodash_dataset::StationTable;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Price columns in feature order, after the two coordinates.
const PRICE_FEATURES: [Fuel; 6] = [
    Fuel::Gazole,
    Fuel::E10,
    Fuel::Sp98,
    Fuel::Sp95,
    Fuel::E85,
    Fuel::Gplc,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteredStation {
    pub station_id: String,
    /// Raw feed coordinates; missing values are reported as 0.
    pub latitude: f64,
    pub longitude: f64,
    pub cluster: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationClusters {
    pub k: usize,
    pub labels: Vec<usize>,
    pub sizes: Vec<usize>,
    pub inertia: f64,
    pub iterations: usize,
    pub points: Vec<ClusteredStation>,
}

fn feature_matrix(table: &StationTable) -> Array2<f64> {
    let stations = table.stations();
    Array2::from_shape_fn((stations.len(), 2 + PRICE_FEATURES.len()), |(i, j)| {
        let s = &stations[i];
        match j {
            0 => s.latitude,
            1 => s.longitude,
            _ => s.price(PRICE_FEATURES[j - 2]),
        }
        .unwrap_or(0.0)
    })
}

/// Partition every station of the table into `config.clusters` groups.
pub fn cluster_stations(table: &StationTable, config: &MlConfig) -> PetroResult<StationClusters> {
    if table.is_empty() {
        return Err(PetroError::InvalidInput("no stations to cluster".into()));
    }
    let features = feature_matrix(table);
    let (_, scaled) = StandardScaler::fit_transform(&features)?;

    let model = KMeans {
        max_iter: config.kmeans_max_iter,
        n_init: config.kmeans_n_init,
        tolerance: config.kmeans_tolerance,
        ..KMeans::new(config.clusters, config.kmeans_seed)
    };
    let fit = model.fit(&scaled)?;
    let sizes = fit.cluster_sizes();

    info!(k = model.k, inertia = fit.inertia, iterations = fit.iterations, ?sizes, "Stations clustered");

    let points = table
        .stations()
        .iter()
        .zip(fit.labels.iter())
        .map(|(s, &cluster)| ClusteredStation {
            station_id: s.id.clone(),
            latitude: s.latitude.unwrap_or(0.0),
            longitude: s.longitude.unwrap_or(0.0),
            cluster,
        })
        .collect();

    Ok(StationClusters {
        k: model.k,
        labels: fit.labels,
        sizes,
        inertia: fit.inertia,
        iterations: fit.iterations,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use petrodash_core::Station;

    fn station(id: &str, lat: f64, lon: f64, gazole: Option<f64>) -> Station {
        let mut s = Station {
            id: id.to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        };
        s.quote_mut(Fuel::Gazole).price = gazole;
        s
    }

    fn two_regions() -> StationTable {
        StationTable::new(vec![
            station("n1", 5_000_000.0, 230_000.0, Some(1.80)),
            station("n2", 5_001_000.0, 231_000.0, Some(1.81)),
            station("n3", 5_002_000.0, 229_000.0, Some(1.79)),
            station("s1", 4_300_000.0, 700_000.0, Some(2.05)),
            station("s2", 4_301_000.0, 701_000.0, Some(2.04)),
            station("s3", 4_302_000.0, 699_000.0, Some(2.06)),
        ])
    }

    fn config(k: usize) -> MlConfig {
        MlConfig {
            clusters: k,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_groups_split_cleanly() {
        let clusters = cluster_stations(&two_regions(), &config(2)).unwrap();
        assert_eq!(clusters.k, 2);
        assert_eq!(clusters.labels.len(), 6);
        let mut sizes = clusters.sizes.clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3]);
        assert!(clusters.labels[..3].iter().all(|l| *l == clusters.labels[0]));
        assert!(clusters.labels[3..].iter().all(|l| *l == clusters.labels[3]));
        assert_ne!(clusters.labels[0], clusters.labels[3]);
    }

    #[test]
    fn test_points_carry_station_ids() {
        let clusters = cluster_stations(&two_regions(), &config(2)).unwrap();
        assert_eq!(clusters.points[4].station_id, "s2");
        assert_eq!(clusters.points[4].cluster, clusters.labels[4]);
        assert_eq!(clusters.points[0].latitude, 5_000_000.0);
    }

    #[test]
    fn test_iteration_budget_comes_from_config() {
        let config = MlConfig {
            clusters: 2,
            kmeans_max_iter: 1,
            kmeans_n_init: 1,
            ..Default::default()
        };
        let clusters = cluster_stations(&two_regions(), &config).unwrap();
        assert_eq!(clusters.iterations, 1);
        assert_eq!(clusters.labels.len(), 6);
    }

    #[test]
    fn test_invalid_cluster_count() {
        assert!(matches!(
            cluster_stations(&two_regions(), &config(0)),
            Err(PetroError::InvalidInput(_))
        ));
        assert!(matches!(
            cluster_stations(&two_regions(), &config(7)),
            Err(PetroError::InvalidInput(_))
        ));
        assert!(cluster_stations(&StationTable::new(Vec::new()), &config(2)).is_err());
    }
}
