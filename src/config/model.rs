// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::engine::ReplayLimits;

pub const DEFAULT_PROGRAM: &str = "bin/cook";
pub const DEFAULT_COOKBOOK: &str = "rsrc/cookbook.ckb";
pub const DEFAULT_MAX_COOKS: usize = 1;
pub const DEFAULT_WAIT_THRESHOLD_MS: u64 = 20;
pub const DEFAULT_HANG_SECS_PER_RECIPE: u64 = 2;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [harness]
/// program = "bin/cook"
/// cookbook = "rsrc/cookbook.ckb"
/// max_cooks = 2
/// main_recipe = "eggs"
/// wait_threshold_ms = 20
/// hang_secs_per_recipe = 2
/// ```
///
/// Every key is optional; missing keys fall back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub harness: HarnessSection,
}

/// `[harness]` section. Also used to carry CLI overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessSection {
    #[serde(default)]
    pub program: Option<PathBuf>,

    #[serde(default)]
    pub cookbook: Option<PathBuf>,

    #[serde(default)]
    pub max_cooks: Option<usize>,

    /// Recipe to build. If `None`, the first recipe in the cookbook.
    #[serde(default)]
    pub main_recipe: Option<String>,

    #[serde(default)]
    pub wait_threshold_ms: Option<u64>,

    #[serde(default)]
    pub hang_secs_per_recipe: Option<u64>,
}

impl HarnessSection {
    /// Values set in `other` win over values set in `self`.
    pub fn overlay(self, other: HarnessSection) -> HarnessSection {
        HarnessSection {
            program: other.program.or(self.program),
            cookbook: other.cookbook.or(self.cookbook),
            max_cooks: other.max_cooks.or(self.max_cooks),
            main_recipe: other.main_recipe.or(self.main_recipe),
            wait_threshold_ms: other.wait_threshold_ms.or(self.wait_threshold_ms),
            hang_secs_per_recipe: other.hang_secs_per_recipe.or(self.hang_secs_per_recipe),
        }
    }
}

/// What a run is judged on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Replay the reported trace against the reference scheduler.
    #[default]
    Replay,
    /// Pass iff the program exits nonzero.
    ExpectError,
    /// Pass iff the program's trimmed stdout equals this text.
    ExpectOutput(String),
}

/// Validated, fully-resolved harness configuration.
///
/// Construct it via `CheckConfig::try_from(raw)` so the bounds are
/// checked once.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConfig {
    pub program: PathBuf,
    pub cookbook: PathBuf,
    pub max_cooks: usize,
    pub main_recipe: Option<String>,
    pub wait_threshold: Duration,
    pub hang_per_recipe: Duration,
    pub mode: CheckMode,
}

impl CheckConfig {
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replay bounds, in trace time units (seconds).
    pub fn limits(&self) -> ReplayLimits {
        ReplayLimits {
            max_cooks: self.max_cooks,
            wait_threshold: self.wait_threshold.as_secs_f64(),
        }
    }

    /// Deadline for a cookbook with `recipes` recipes.
    pub fn deadline_for(&self, recipes: usize) -> Duration {
        let recipes = u32::try_from(recipes.max(1)).unwrap_or(u32::MAX);
        self.hang_per_recipe.saturating_mul(recipes)
    }

    /// Arguments passed to the program under test.
    pub fn program_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.cookbook.display().to_string(),
            "-c".to_string(),
            self.max_cooks.to_string(),
        ];
        if let Some(main) = &self.main_recipe {
            args.push(main.clone());
        }
        args
    }
}
