pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{PetroError, PetroResult};
pub use types::{BrandCount, Fuel, FuelQuote, RewardMode, Station};
