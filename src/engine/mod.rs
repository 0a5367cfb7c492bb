// src/engine/mod.rs

//! Trace validation engine.
//!
//! - [`validator`] is the synchronous, deterministic replay state machine.
//!   It has no channels, no Tokio types and does no IO, so it can be unit
//!   tested by feeding it hand-written events.
//! - [`verdict`] defines the replay result and the violation taxonomy.

pub mod validator;
pub mod verdict;

pub use validator::{ReplayLimits, TraceValidator, replay};
pub use verdict::{Verdict, Violation};
