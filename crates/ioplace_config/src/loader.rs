//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::PlacerConfig;
use std::path::Path;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "ioplace.toml";

/// Loads and validates `ioplace.toml` from a directory.
pub fn load_config(dir: &Path) -> Result<PlacerConfig, ConfigError> {
    load_config_from_path(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_from_path(path: &Path) -> Result<PlacerConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<PlacerConfig, ConfigError> {
    let config: PlacerConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Rejects the values the placer treats as fatal configuration errors.
fn validate_config(config: &PlacerConfig) -> Result<(), ConfigError> {
    let core = &config.core;
    if core.upper_right.x <= core.lower_left.x || core.upper_right.y <= core.lower_left.y {
        return Err(ConfigError::ValidationError(
            "core.upper_right must lie strictly above and right of core.lower_left".to_string(),
        ));
    }
    if core.min_spacing.x <= 0 || core.min_spacing.y <= 0 {
        return Err(ConfigError::ValidationError(
            "core.min_spacing must be positive on both axes".to_string(),
        ));
    }
    if core.init_tracks.x < 0 || core.init_tracks.y < 0 {
        return Err(ConfigError::ValidationError(
            "core.init_tracks must not be negative".to_string(),
        ));
    }
    if core.database_unit <= 0 {
        return Err(ConfigError::ValidationError(
            "core.database_unit must be positive".to_string(),
        ));
    }
    let placer = &config.placer;
    if placer.slots_per_section <= 1 {
        return Err(ConfigError::ValidationError(
            "placer.slots_per_section must be greater than 1".to_string(),
        ));
    }
    if placer.usage_per_section <= 0.0 {
        return Err(ConfigError::ValidationError(
            "placer.usage_per_section must be positive".to_string(),
        ));
    }
    if placer.slots_increase_factor < 0.0 || placer.usage_increase_factor < 0.0 {
        return Err(ConfigError::ValidationError(
            "placer increase factors must not be negative".to_string(),
        ));
    }
    Ok(())
}
