//! Fuel price dataset — CSV loading, the in-memory station table with its
//! filter predicates, and brand metadata.

pub mod brands;
pub mod loader;
pub mod table;

pub use brands::{brand_logo_key, display_brand, read_brand_column, read_brand_list};
pub use loader::{load_prices, parse_timestamp, read_prices};
pub use table::{StationFilter, StationTable};
