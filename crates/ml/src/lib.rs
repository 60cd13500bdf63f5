//! Price analytics models — standardisation, least-squares regression for
//! price prediction, and k-means clustering of stations.

pub mod clustering;
pub mod kmeans;
pub mod predictor;
pub mod regression;
pub mod scaler;

pub use clustering::{cluster_stations, StationClusters};
pub use kmeans::{KMeans, KMeansFit};
pub use predictor::{predict_city_price, PricePrediction};
pub use regression::{mean_squared_error, train_test_split, LinearRegression};
pub use scaler::StandardScaler;
