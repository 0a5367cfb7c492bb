// src/engine/verdict.rs

//! Result types of a trace replay.

use std::fmt;

use thiserror::Error;

/// The first invariant a trace broke.
///
/// Every variant is terminal: replay stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("step '{command}' should not have started")]
    UnexpectedStepStarted { command: String },

    #[error("cooks ({cooks}) exceeded max cooks ({max_cooks})")]
    ConcurrencyExceeded { cooks: usize, max_cooks: usize },

    #[error(
        "recipes in queue waiting too long ({waited:.3}s > {threshold:.3}s; \
         recipes ready/cooking: {ready}, active cooks: {active_cooks}, max cooks: {max_cooks})"
    )]
    StarvationTimeout {
        waited: f64,
        threshold: f64,
        ready: usize,
        active_cooks: usize,
        max_cooks: usize,
    },

    #[error("output not equal to input for a task of recipe '{recipe}': {detail}")]
    RedirectionMismatch { recipe: String, detail: String },

    #[error("END reported for pid {pid} with no step attributed to it")]
    OrphanEnd { pid: u32 },

    #[error("program terminated but main recipe '{recipe}' not complete")]
    IncompleteMainRecipe { recipe: String },
}

impl Violation {
    /// Process exit code reported for this violation.
    pub fn exit_code(&self) -> i32 {
        match self {
            Violation::UnexpectedStepStarted { .. } => 1,
            Violation::ConcurrencyExceeded { .. } => 2,
            Violation::StarvationTimeout { .. } => 3,
            Violation::RedirectionMismatch { .. } => 4,
            Violation::OrphanEnd { .. } => -2,
            Violation::IncompleteMainRecipe { .. } => 1,
        }
    }
}

/// Final result of replaying one trace.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The main recipe was completed by a conforming trace.
    Success { main_recipe: String },
    Failed(Violation),
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success { .. })
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Verdict::Success { .. } => None,
            Verdict::Failed(v) => Some(v),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Success { .. } => 0,
            Verdict::Failed(v) => v.exit_code(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success { main_recipe } => {
                write!(f, "SUCCESSFUL COMPLETION OF RECIPE: {main_recipe}")
            }
            Verdict::Failed(v) => write!(f, "ERROR: {v}"),
        }
    }
}
