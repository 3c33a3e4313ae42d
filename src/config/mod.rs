//! `.wardrobe.toml` configuration.
//!
//! ```toml
//! [scenarios]
//! coverage_fractions = [0.10, 0.25]
//! avg_item_weight_kg = 0.6
//! co2_per_item_kg = 1.25
//!
//! [waste]
//! sources = ["data/eea_textile_waste_2020.csv"]
//!
//! [population]
//! source = "world-bank"
//! year = 2023
//! ```

mod core;
mod loader;
pub mod retry;
pub mod validation;

pub use core::{
    CountriesConfig, OutputConfig, PopulationConfig, ScenariosConfig, WardrobeConfig,
    WasteConfig, WasteSupplement,
};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from, parse_config,
    CONFIG_FILE_NAME,
};
pub use retry::{RetryConfig, RetryStrategy};
pub use validation::validate_config;
