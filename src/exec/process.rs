// src/exec/process.rs

//! Real process runner.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::backend::{Invocation, ProgramRunner, RunReport, Termination, Transcript};

/// Runs the program under test with `tokio::process::Command`.
///
/// If the deadline expires, the pending wait is dropped and the child is
/// killed (`kill_on_drop`), producing [`RunReport::Hung`].
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProgramRunner for ProcessRunner {
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<RunReport>> + Send + '_>> {
        Box::pin(async move { Ok(run_process(invocation).await?) })
    }
}

async fn run_process(invocation: Invocation) -> anyhow::Result<RunReport> {
    let rendered = invocation.display_command();
    info!(
        command = %rendered,
        deadline_secs = invocation.deadline.as_secs_f64(),
        "starting program under test"
    );

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .with_context(|| format!("spawning program under test '{rendered}'"))?;

    match timeout(invocation.deadline, child.wait_with_output()).await {
        Ok(output) => {
            let output =
                output.with_context(|| format!("waiting for program under test '{rendered}'"))?;

            let transcript = Transcript {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                stdout: output.stdout,
                termination: Termination::from_status(output.status),
            };

            info!(
                command = %rendered,
                termination = ?transcript.termination,
                "program under test exited"
            );
            debug!(stdout = %transcript.stdout_text(), "captured stdout");
            debug!(stderr = %transcript.stderr, "captured stderr");

            Ok(RunReport::Completed(transcript))
        }
        Err(_elapsed) => {
            warn!(
                command = %rendered,
                deadline_secs = invocation.deadline.as_secs_f64(),
                "program under test did not finish before the deadline; killed"
            );
            Ok(RunReport::Hung {
                deadline: invocation.deadline,
            })
        }
    }
}
