use crate::error::PetroError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fuel grades published in the instantaneous price feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Fuel {
    E10,
    Gazole,
    Sp95,
    Sp98,
    E85,
    Gplc,
}

impl Fuel {
    pub const ALL: [Fuel; 6] = [
        Fuel::E10,
        Fuel::Gazole,
        Fuel::Sp95,
        Fuel::Sp98,
        Fuel::E85,
        Fuel::Gplc,
    ];

    /// Prefix of the `<prefix>_prix` / `<prefix>_maj` column pair.
    pub fn column_prefix(self) -> &'static str {
        match self {
            Fuel::E10 => "e10",
            Fuel::Gazole => "gazole",
            Fuel::Sp95 => "sp95",
            Fuel::Sp98 => "sp98",
            Fuel::E85 => "e85",
            Fuel::Gplc => "gplc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Fuel::E10 => "E10",
            Fuel::Gazole => "Gazole",
            Fuel::Sp95 => "SP95",
            Fuel::Sp98 => "SP98",
            Fuel::E85 => "E85",
            Fuel::Gplc => "GPLc",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Fuel::E10 => 0,
            Fuel::Gazole => 1,
            Fuel::Sp95 => 2,
            Fuel::Sp98 => 3,
            Fuel::E85 => 4,
            Fuel::Gplc => 5,
        }
    }

    pub fn price_column(self) -> String {
        format!("{}_prix", self.column_prefix())
    }

    pub fn update_column(self) -> String {
        format!("{}_maj", self.column_prefix())
    }
}

impl fmt::Display for Fuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Fuel {
    type Err = PetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Fuel::ALL
            .into_iter()
            .find(|fuel| fuel.column_prefix() == needle)
            .ok_or_else(|| PetroError::UnknownFuel(s.trim().to_string()))
    }
}

/// Price and last update of one fuel at one station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelQuote {
    pub price: Option<f64>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// One row of the price feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    /// Raw latitude as published (degrees * 100000).
    pub latitude: Option<f64>,
    /// Raw longitude as published (degrees * 100000).
    pub longitude: Option<f64>,
    pub postal_code: String,
    /// `R` for road, `A` for motorway.
    pub pop: String,
    pub address: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub department: Option<String>,
    pub quotes: [FuelQuote; 6],
    pub available_fuels: Vec<String>,
    pub brand: Option<String>,
}

impl Station {
    pub fn quote(&self, fuel: Fuel) -> &FuelQuote {
        &self.quotes[fuel.index()]
    }

    pub fn quote_mut(&mut self, fuel: Fuel) -> &mut FuelQuote {
        &mut self.quotes[fuel.index()]
    }

    pub fn price(&self, fuel: Fuel) -> Option<f64> {
        self.quote(fuel).price
    }

    pub fn has_fuel(&self, fuel: Fuel) -> bool {
        self.price(fuel).is_some()
    }

    pub fn on_motorway(&self) -> bool {
        self.pop == "A"
    }

    /// Position in decimal degrees as `(latitude, longitude)`.
    pub fn decimal_position(&self, scale: f64) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat / scale, lon / scale)),
            _ => None,
        }
    }
}

/// Number of stations operated under a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCount {
    pub name: String,
    pub stations: u64,
}

/// Which reward a bandit step observes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardMode {
    /// Step `i` replays record `i`, whatever arm was chosen.
    #[default]
    StepIndexed,
    /// Step observes the record of the chosen arm.
    ArmIndexed,
}

impl FromStr for RewardMode {
    type Err = PetroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "step_indexed" | "step" => Ok(RewardMode::StepIndexed),
            "arm_indexed" | "arm" => Ok(RewardMode::ArmIndexed),
            other => Err(PetroError::InvalidInput(format!(
                "unknown reward mode '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_parsing_is_case_insensitive() {
        assert_eq!("GPLc".parse::<Fuel>().unwrap(), Fuel::Gplc);
        assert_eq!(" gazole ".parse::<Fuel>().unwrap(), Fuel::Gazole);
        assert_eq!("SP98".parse::<Fuel>().unwrap(), Fuel::Sp98);
        assert!(matches!(
            "kerosene".parse::<Fuel>(),
            Err(PetroError::UnknownFuel(_))
        ));
    }

    #[test]
    fn test_fuel_columns() {
        assert_eq!(Fuel::E85.price_column(), "e85_prix");
        assert_eq!(Fuel::Gplc.update_column(), "gplc_maj");
        for (i, fuel) in Fuel::ALL.iter().enumerate() {
            assert_eq!(fuel.index(), i);
        }
    }

    #[test]
    fn test_station_position_and_motorway() {
        let station = Station {
            latitude: Some(4_620_100.0),
            longitude: Some(545_300.0),
            pop: "A".to_string(),
            ..Default::default()
        };
        let (lat, lon) = station.decimal_position(100_000.0).unwrap();
        assert!((lat - 46.201).abs() < 1e-9);
        assert!((lon - 5.453).abs() < 1e-9);
        assert!(station.on_motorway());
        assert!(!station.has_fuel(Fuel::Gazole));
    }

    #[test]
    fn test_reward_mode_parsing() {
        assert_eq!("arm-indexed".parse::<RewardMode>().unwrap(), RewardMode::ArmIndexed);
        assert_eq!("step".parse::<RewardMode>().unwrap(), RewardMode::StepIndexed);
        assert!("random".parse::<RewardMode>().is_err());
    }
}
