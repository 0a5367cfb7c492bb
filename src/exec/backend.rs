// src/exec/backend.rs

//! Pluggable runner abstraction for the program under test.
//!
//! The harness talks to a `ProgramRunner` instead of spawning processes
//! itself. Production uses [`super::process::ProcessRunner`]; tests can
//! provide a runner that hands back a canned transcript.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::ExitStatus;
use std::time::Duration;

use crate::errors::Result;

/// Signals treated as a crash of the program under test
/// (SIGILL, SIGABRT, SIGFPE, SIGSEGV).
const CRASH_SIGNALS: [i32; 4] = [4, 6, 8, 11];

/// How to invoke the program under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Wall-clock bound on the whole run.
    pub deadline: Duration,
}

impl Invocation {
    /// Shell-like rendering for logs and reports.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// How the program under test terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
    Unknown,
}

impl Termination {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Termination::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Termination::Signaled(signal);
            }
        }

        Termination::Unknown
    }

    pub fn success(&self) -> bool {
        matches!(self, Termination::Exited(0))
    }

    /// The crash signal, if the program died from one.
    pub fn crash_signal(&self) -> Option<i32> {
        match self {
            Termination::Signaled(sig) if CRASH_SIGNALS.contains(sig) => Some(*sig),
            _ => None,
        }
    }

    /// Conventional return code: the exit code, or the negated signal.
    pub fn return_code(&self) -> i32 {
        match self {
            Termination::Exited(code) => *code,
            Termination::Signaled(sig) => -sig,
            Termination::Unknown => -1,
        }
    }
}

/// Everything captured from a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// The trace is reported on stderr.
    pub stderr: String,
    /// Raw bytes; redirection checks compare them exactly.
    pub stdout: Vec<u8>,
    pub termination: Termination,
}

impl Transcript {
    /// Stdout with invalid UTF-8 replaced, for display and `-x` comparison.
    pub fn stdout_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Completed(Transcript),
    /// The deadline expired and the program was killed.
    Hung { deadline: Duration },
}

/// Trait abstracting how the program under test is run.
pub trait ProgramRunner: Send {
    /// Run the program once, honouring `invocation.deadline`.
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<RunReport>> + Send + '_>>;
}
