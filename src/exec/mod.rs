// src/exec/mod.rs

//! Invocation of the program under test.
//!
//! This layer is responsible for running the cook program, capturing its
//! stdout/stderr, and classifying how it ended (normal exit, crash signal,
//! or killed at the deadline).
//!
//! - [`backend`] provides the `ProgramRunner` trait and the report types,
//!   which tests can implement with a fake runner.
//! - [`process`] is the production runner built on `tokio::process`.

pub mod backend;
pub mod process;

pub use backend::{Invocation, ProgramRunner, RunReport, Termination, Transcript};
pub use process::ProcessRunner;
