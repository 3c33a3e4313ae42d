use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Waste-to-Wardrobe configuration

[scenarios]
# Share of clothing purchases redirected to resale, each in (0, 1]
coverage_fractions = [0.10, 0.25]
avg_item_weight_kg = 0.6
co2_per_item_kg = 1.25
allow_zero_coverage = false

[waste]
# Per-capita textile waste CSVs, merged in order (later files win per country)
sources = []
# Extra aggregate labels to drop, on top of EU27, EU28, OECD, ...
aggregate_labels = []

[[waste.supplements]]
country = "United States"
waste_kg_per_capita = 40.22

[population]
# "world-bank", "reference" or "none"
source = "world-bank"
year = 2023
# 0 = number of CPUs, capped at 8
jobs = 0
timeout_seconds = 60
# override_file = "populations.csv"

[population.overrides]
# "Germany" = 84500000

[population.retry]
enabled = true
max_retries = 3
base_delay_ms = 200
strategy = "exponential"
max_delay_ms = 5000

[countries]
# iso_table = "country-codes.csv"

[countries.overrides]
# "Bharat" = "IND"

[output]
format = "terminal"
# top = 10
"#;

/// Write the default config into `dir`.
pub fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}

pub fn init_config(force: bool) -> Result<()> {
    write_default_config(Path::new("."), force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config_from, validate_config, WardrobeConfig};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_built_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_default_config(dir.path(), false).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config, WardrobeConfig::default());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        write_default_config(dir.path(), false).unwrap();
        assert!(write_default_config(dir.path(), false).is_err());
        assert!(write_default_config(dir.path(), true).is_ok());
    }
}
