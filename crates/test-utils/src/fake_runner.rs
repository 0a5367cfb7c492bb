use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use cookcheck::errors::Result;
use cookcheck::exec::{Invocation, ProgramRunner, RunReport, Termination, Transcript};

/// A fake runner that:
/// - records every invocation it receives
/// - immediately returns a canned report instead of spawning anything.
pub struct FakeRunner {
    report: RunReport,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeRunner {
    pub fn new(report: RunReport) -> Self {
        Self {
            report,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A program that exits with `code` after printing `stdout`/`stderr`.
    pub fn exiting(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(RunReport::Completed(Transcript {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.to_string(),
            termination: Termination::Exited(code),
        }))
    }

    /// A program killed by `signal`.
    pub fn signaled(signal: i32) -> Self {
        Self::new(RunReport::Completed(Transcript {
            stdout: Vec::new(),
            stderr: String::new(),
            termination: Termination::Signaled(signal),
        }))
    }

    /// A program that never finishes.
    pub fn hanging() -> Self {
        Self::new(RunReport::Hung {
            deadline: std::time::Duration::ZERO,
        })
    }

    /// Shared handle to the recorded invocations.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }
}

impl ProgramRunner for FakeRunner {
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<RunReport>> + Send + '_>> {
        let report = match &self.report {
            // Report the deadline the harness actually asked for.
            RunReport::Hung { .. } => RunReport::Hung {
                deadline: invocation.deadline,
            },
            other => other.clone(),
        };

        Box::pin(async move {
            self.invocations.lock().unwrap().push(invocation);
            Ok(report)
        })
    }
}
