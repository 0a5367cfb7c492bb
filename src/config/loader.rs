// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{CheckConfig, HarnessSection, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; bounds are checked by
/// [`load_and_validate`] / [`resolve`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it, with no CLI
/// overrides applied.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<CheckConfig> {
    let raw_config = load_from_path(&path)?;
    let config = CheckConfig::try_from(raw_config)?;
    Ok(config)
}

/// Merge the sources: `overrides` (the CLI) beat the optional file, which
/// beats the built-in defaults.
pub fn resolve(config_path: Option<&Path>, overrides: HarnessSection) -> Result<CheckConfig> {
    let file = match config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading harness config");
            load_from_path(path)?
        }
        None => RawConfigFile::default(),
    };

    let merged = RawConfigFile {
        harness: file.harness.overlay(overrides),
    };
    CheckConfig::try_from(merged)
}
