// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{CheckMode, HarnessSection};

/// Command-line arguments for `cookcheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cookcheck",
    version,
    about = "Run a parallel cookbook program and check its reported trace.",
    long_about = None
)]
pub struct CliArgs {
    /// Program under test.
    ///
    /// Default: `bin/cook`.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub program: Option<PathBuf>,

    /// Cookbook passed to the program and used to build the reference graph.
    ///
    /// Default: `rsrc/cookbook.ckb`.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub cookbook: Option<PathBuf>,

    /// Maximum number of cooks (concurrently cooking recipes).
    #[arg(short = 'c', long = "cooks", value_name = "N")]
    pub max_cooks: Option<usize>,

    /// Recipe to build. Defaults to the first recipe in the cookbook.
    #[arg(short = 'm', long = "main", value_name = "NAME")]
    pub main_recipe: Option<String>,

    /// Dispatch-latency threshold in milliseconds.
    #[arg(short = 'w', long = "wait", value_name = "MS")]
    pub wait_threshold_ms: Option<u64>,

    /// Expect the program to report an error (nonzero exit).
    #[arg(short = 'e', long, conflicts_with = "expected_output")]
    pub expect_error: bool,

    /// Expect the program's stdout to equal TEXT instead of replaying the trace.
    #[arg(short = 'x', long, value_name = "TEXT")]
    pub expected_output: Option<String>,

    /// Optional TOML config file with a `[harness]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `COOKCHECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Values given on the command line, to be laid over the config file.
    pub fn overrides(&self) -> HarnessSection {
        HarnessSection {
            program: self.program.clone(),
            cookbook: self.cookbook.clone(),
            max_cooks: self.max_cooks,
            main_recipe: self.main_recipe.clone(),
            wait_threshold_ms: self.wait_threshold_ms,
            hang_secs_per_recipe: None,
        }
    }

    pub fn mode(&self) -> CheckMode {
        match (&self.expected_output, self.expect_error) {
            (Some(text), _) => CheckMode::ExpectOutput(text.clone()),
            (None, true) => CheckMode::ExpectError,
            (None, false) => CheckMode::Replay,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
