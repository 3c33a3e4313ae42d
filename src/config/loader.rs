use std::fs;
use std::path::{Path, PathBuf};

use super::core::WardrobeConfig;
use crate::error::WardrobeError;

pub const CONFIG_FILE_NAME: &str = ".wardrobe.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<WardrobeConfig, String> {
    toml::from_str::<WardrobeConfig>(contents)
        .map_err(|e| format!("Failed to parse {CONFIG_FILE_NAME}: {e}"))
}

/// Load an explicitly requested config file. Any failure is fatal.
pub fn load_config_from(path: &Path) -> Result<WardrobeConfig, WardrobeError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        WardrobeError::config(
            format!("Failed to read {}: {e}", path.display()),
            Some(path.to_path_buf()),
        )
    })?;
    let config = parse_config(&contents)
        .map_err(|message| WardrobeError::config(message, Some(path.to_path_buf())))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try a discovered config path; unreadable or malformed files are skipped
/// with a warning.
fn try_load_config_from_path(config_path: &Path) -> Option<WardrobeConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{e}. Using defaults.");
            None
        }
    }
}

/// Directory ancestors of `start`, nearest first, up to `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Discover `.wardrobe.toml` from `start` upwards, falling back to defaults.
pub fn discover_config(start: PathBuf) -> WardrobeConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            WardrobeConfig::default()
        })
}

/// Discover config starting at the current directory.
pub fn load_config() -> WardrobeConfig {
    match std::env::current_dir() {
        Ok(dir) => discover_config(dir),
        Err(e) => {
            log::warn!("Failed to get current directory: {e}. Using default config.");
            WardrobeConfig::default()
        }
    }
}
