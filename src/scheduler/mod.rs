// src/scheduler/mod.rs

//! Reference scheduler.
//!
//! - [`reference`] holds the [`ReferenceScheduler`]: ready set, runnable
//!   step queue, step completion and retirement propagation.
//! - [`step_result`] defines the queue entry and per-completion result types.
//! - [`redirection`] checks that a finished task's output matches its input.

pub mod redirection;
pub mod reference;
pub mod step_result;

pub use redirection::RedirectionIo;
pub use reference::ReferenceScheduler;
pub use step_result::{QueuedStep, StepCompletion};
