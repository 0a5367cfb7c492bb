// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! These are setup and infrastructure failures (bad config, bad cookbook,
//! unreadable trace). Trace-validation failures are *not* errors: they are
//! reported as [`crate::engine::Violation`] values inside a verdict.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CookcheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("recipe '{recipe}' depends on unknown recipe '{dependency}'")]
    UnknownDependency { recipe: String, dependency: String },

    #[error("recipe '{0}' is defined more than once")]
    DuplicateRecipe(String),

    #[error("Cycle detected in cookbook: {0}")]
    DependencyCycle(String),

    #[error("cookbook contains no recipes")]
    EmptyCookbook,

    #[error("main recipe '{0}' not found in cookbook")]
    UnknownMainRecipe(String),

    #[error("unexpected trace output on line {line_no}: '{line}'")]
    MalformedTrace { line_no: usize, line: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CookcheckError>;
