use crate::charts::{Point, ScatterGroup, ScatterPlot};
use petrodash_ml::{PricePrediction, StationClusters};

/// Actual against predicted prices on the held-out split.
pub fn prediction_chart(prediction: &PricePrediction) -> ScatterPlot {
    let points = prediction
        .test_actual
        .iter()
        .zip(prediction.test_predicted.iter())
        .map(|(&x, &y)| Point { x, y })
        .collect();
    ScatterPlot {
        title: format!(
            "Predicted {} prices in {}: {}",
            prediction.fuel.label(),
            prediction.city,
            prediction.predicted_price
        ),
        x_label: "Actual".to_string(),
        y_label: "Predicted".to_string(),
        groups: vec![ScatterGroup {
            name: "test".to_string(),
            points,
        }],
    }
}

/// Station positions, one group per cluster, named with the cluster size.
pub fn cluster_chart(clusters: &StationClusters) -> ScatterPlot {
    let groups = (0..clusters.k)
        .map(|c| ScatterGroup {
            name: format!("Cluster {}: {} stations", c, clusters.sizes.get(c).copied().unwrap_or(0)),
            points: clusters
                .points
                .iter()
                .filter(|p| p.cluster == c)
                .map(|p| Point {
                    x: p.longitude,
                    y: p.latitude,
                })
                .collect(),
        })
        .collect();
    ScatterPlot {
        title: "Clustering of gas stations".to_string(),
        x_label: "Longitude".to_string(),
        y_label: "Latitude".to_string(),
        groups,
    }
}
