// src/lib.rs

pub mod cli;
pub mod config;
pub mod cookbook;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod harness;
pub mod logging;
pub mod scheduler;
pub mod trace;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::resolve;
use crate::exec::ProcessRunner;
use crate::fs::RealFileSystem;
use crate::harness::{Outcome, check};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI over file over defaults)
/// - the real filesystem and process runner
/// - the harness pipeline
pub async fn run(args: CliArgs) -> Result<Outcome> {
    let config = resolve(args.config.as_deref(), args.overrides())?.with_mode(args.mode());

    info!(
        program = %config.program.display(),
        cookbook = %config.cookbook.display(),
        max_cooks = config.max_cooks,
        main_recipe = ?config.main_recipe,
        mode = ?config.mode,
        "checking program"
    );

    let fs = RealFileSystem;
    let mut runner = ProcessRunner::new();
    let outcome = check(&config, &fs, &mut runner).await?;
    Ok(outcome)
}
