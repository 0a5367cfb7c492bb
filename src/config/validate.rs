// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    CheckConfig, CheckMode, DEFAULT_COOKBOOK, DEFAULT_HANG_SECS_PER_RECIPE, DEFAULT_MAX_COOKS,
    DEFAULT_PROGRAM, DEFAULT_WAIT_THRESHOLD_MS, HarnessSection, RawConfigFile,
};
use crate::errors::{CookcheckError, Result};

impl TryFrom<RawConfigFile> for CheckConfig {
    type Error = CookcheckError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_harness(&raw.harness)?;

        let h = raw.harness;
        Ok(CheckConfig {
            program: h.program.unwrap_or_else(|| DEFAULT_PROGRAM.into()),
            cookbook: h.cookbook.unwrap_or_else(|| DEFAULT_COOKBOOK.into()),
            max_cooks: h.max_cooks.unwrap_or(DEFAULT_MAX_COOKS),
            main_recipe: h.main_recipe,
            wait_threshold: Duration::from_millis(
                h.wait_threshold_ms.unwrap_or(DEFAULT_WAIT_THRESHOLD_MS),
            ),
            hang_per_recipe: Duration::from_secs(
                h.hang_secs_per_recipe
                    .unwrap_or(DEFAULT_HANG_SECS_PER_RECIPE),
            ),
            mode: CheckMode::Replay,
        })
    }
}

fn validate_harness(h: &HarnessSection) -> Result<()> {
    if h.max_cooks == Some(0) {
        return Err(CookcheckError::Config(
            "[harness].max_cooks must be >= 1 (got 0)".to_string(),
        ));
    }

    if h.hang_secs_per_recipe == Some(0) {
        return Err(CookcheckError::Config(
            "[harness].hang_secs_per_recipe must be >= 1 (got 0)".to_string(),
        ));
    }

    if h.main_recipe.as_deref().is_some_and(|m| m.trim().is_empty()) {
        return Err(CookcheckError::Config(
            "[harness].main_recipe must not be empty".to_string(),
        ));
    }

    Ok(())
}
