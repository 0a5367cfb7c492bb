// src/harness.rs

//! End-to-end check of one run of the program under test.
//!
//! Order of checks: hang, crash, expected-output / expected-error modes,
//! nonzero exit, and finally trace replay.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{CheckConfig, CheckMode};
use crate::cookbook::{Cookbook, parse_cookbook};
use crate::engine::{ReplayLimits, TraceValidator, Verdict, replay};
use crate::errors::Result;
use crate::exec::{Invocation, ProgramRunner, RunReport, Transcript};
use crate::fs::FileSystem;
use crate::scheduler::{RedirectionIo, ReferenceScheduler};
use crate::trace::parse_transcript;

/// Final result of a harness run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The trace was replayed.
    Verdict(Verdict),
    /// The program did not finish before the deadline and was killed.
    ProcessHang { deadline: Duration },
    /// The program died from a crash signal.
    ProcessCrash { signal: i32 },
    /// The program exited nonzero in replay mode.
    NonZeroExit { code: i32 },
    /// `-e`: the program reported the error as expected.
    ErrorHandled { code: i32 },
    /// `-e`: the program exited successfully.
    ErrorNotReported,
    /// `-x`: stdout matched.
    OutputMatched,
    /// `-x`: stdout differed.
    OutputMismatch { expected: String, found: String },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Verdict(verdict) => verdict.exit_code(),
            Outcome::NonZeroExit { .. } => -1,
            Outcome::ErrorHandled { .. } | Outcome::OutputMatched => 0,
            Outcome::ProcessHang { .. }
            | Outcome::ProcessCrash { .. }
            | Outcome::ErrorNotReported
            | Outcome::OutputMismatch { .. } => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Verdict(verdict) => write!(f, "{verdict}"),
            Outcome::ProcessHang { deadline } => write!(
                f,
                "ERROR: program did not finish within {:.1}s (hang)",
                deadline.as_secs_f64()
            ),
            Outcome::ProcessCrash { signal } => {
                write!(f, "ERROR: program crashed (signal {signal})")
            }
            Outcome::NonZeroExit { code } => {
                write!(f, "ERROR: program exited with return code {code}")
            }
            Outcome::ErrorHandled { code } => {
                write!(f, "SUCCESSFUL ERROR HANDLING (return code {code})")
            }
            Outcome::ErrorNotReported => {
                write!(f, "ERROR: program exited successfully, expected an error")
            }
            Outcome::OutputMatched => write!(f, "SUCCESSFUL OUTPUT MATCH"),
            Outcome::OutputMismatch { expected, found } => write!(
                f,
                "ERROR: output mismatch: expected '{expected}', found '{found}'"
            ),
        }
    }
}

/// Run the program once and judge the run.
///
/// `fs` is used both to read the cookbook and for redirection checks.
pub async fn check<R>(config: &CheckConfig, fs: &dyn FileSystem, runner: &mut R) -> Result<Outcome>
where
    R: ProgramRunner + ?Sized,
{
    let text = fs.read_to_string(&config.cookbook)?;
    let parsed = parse_cookbook(&text);
    debug!(recipes = parsed.len(), "cookbook text parsed");

    let invocation = Invocation {
        program: config.program.clone(),
        args: config.program_args(),
        deadline: config.deadline_for(parsed.len()),
    };

    let transcript = match runner.run(invocation).await? {
        RunReport::Hung { deadline } => return Ok(Outcome::ProcessHang { deadline }),
        RunReport::Completed(transcript) => transcript,
    };

    if let Some(signal) = transcript.termination.crash_signal() {
        warn!(signal, "program under test crashed");
        return Ok(Outcome::ProcessCrash { signal });
    }

    let code = transcript.termination.return_code();
    match &config.mode {
        CheckMode::ExpectOutput(expected) => return Ok(judge_output(expected, &transcript)),
        CheckMode::ExpectError if code != 0 => return Ok(Outcome::ErrorHandled { code }),
        CheckMode::ExpectError => return Ok(Outcome::ErrorNotReported),
        CheckMode::Replay if !transcript.termination.success() => {
            return Ok(Outcome::NonZeroExit { code });
        }
        CheckMode::Replay => {}
    }

    let cookbook = Cookbook::from_parsed(parsed)?;
    let scheduler = ReferenceScheduler::new(cookbook, config.main_recipe.as_deref())?;
    let verdict = replay_transcript(scheduler, config.limits(), fs, &transcript)?;

    info!(verdict = %verdict, "run judged");
    Ok(Outcome::Verdict(verdict))
}

/// Replay a captured transcript against a prepared scheduler.
pub fn replay_transcript(
    scheduler: ReferenceScheduler,
    limits: ReplayLimits,
    fs: &dyn FileSystem,
    transcript: &Transcript,
) -> Result<Verdict> {
    let events = parse_transcript(&transcript.stderr)?;
    let io = RedirectionIo::new(fs, &transcript.stdout);
    let validator = TraceValidator::new(scheduler, limits, io);
    Ok(replay(validator, events))
}

fn judge_output(expected: &str, transcript: &Transcript) -> Outcome {
    let stdout = transcript.stdout_text();
    let found = stdout.trim();
    if found == expected {
        Outcome::OutputMatched
    } else {
        Outcome::OutputMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
