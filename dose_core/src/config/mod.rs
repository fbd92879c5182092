//! Configuration loading from TOML files

mod catalog;
mod constants;

pub use catalog::{default_catalog, load_catalog, parse_catalog};
pub use constants::{
    ArenaConstants, DifficultyConstants, DosingConstants, OutcomeConstants, TuningConstants,
    VitalsConstants,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure loading tuning constants or the content catalog
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read tuning or catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid game data: {0}")]
    ValidationError(String),
}

/// Read and deserialize a TOML file
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Deserialize TOML already in memory
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load tuning constants, falling back to the embedded defaults when the file is absent
pub fn load_tuning(path: &Path) -> Result<TuningConstants, ConfigError> {
    if !path.exists() {
        return Ok(TuningConstants::embedded());
    }
    let tuning: TuningConstants = load_toml(path)?;
    tuning.validate()?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tuning_file_uses_bundled() {
        let path = std::env::temp_dir().join("dose_defender_no_such_tuning.toml");
        let tuning = load_tuning(&path).unwrap();
        assert_eq!(tuning, TuningConstants::embedded());
    }

    #[test]
    fn test_partial_tuning_keeps_defaults() {
        let tuning: TuningConstants = parse_toml("[arena]\nwidth = 1024.0\n").unwrap();
        assert_eq!(tuning.arena.width, 1024.0);
        assert_eq!(tuning.arena.height, 600.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let path = std::env::temp_dir().join("dose_defender_bad_tuning.toml");
        fs::write(&path, "[dosing]\nunit_per_shot = 0.0\n").unwrap();
        let result = load_tuning(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
