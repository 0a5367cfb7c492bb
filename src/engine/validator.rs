// src/engine/validator.rs

//! Pure trace-replay state machine.
//!
//! The validator consumes trace events one at a time, matches them against
//! the [`ReferenceScheduler`], and stops at the first broken invariant.
//! It owns all mutable replay state and performs no IO of its own; file
//! contents for redirection checks come through [`RedirectionIo`].

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::engine::verdict::{Verdict, Violation};
use crate::scheduler::{QueuedStep, RedirectionIo, ReferenceScheduler};
use crate::trace::{EventKind, TraceEvent};

/// Bounds the trace is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayLimits {
    /// Maximum number of recipes cooking at once.
    pub max_cooks: usize,
    /// Longest tolerated dispatch gap, in trace time units (seconds).
    pub wait_threshold: f64,
}

/// Single-pass replay state.
#[derive(Debug)]
pub struct TraceValidator<'a> {
    scheduler: ReferenceScheduler,
    limits: ReplayLimits,
    io: RedirectionIo<'a>,
    active_cooks: usize,
    /// Step currently attributed to each live pid.
    pid_to_step: HashMap<u32, QueuedStep>,
    /// Timestamp of the last dispatch that left a cook free while ready
    /// work was still waiting.
    slack_since: Option<f64>,
}

impl<'a> TraceValidator<'a> {
    pub fn new(scheduler: ReferenceScheduler, limits: ReplayLimits, io: RedirectionIo<'a>) -> Self {
        Self {
            scheduler,
            limits,
            io,
            active_cooks: 0,
            pid_to_step: HashMap::new(),
            slack_since: None,
        }
    }

    pub fn scheduler(&self) -> &ReferenceScheduler {
        &self.scheduler
    }

    pub fn active_cooks(&self) -> usize {
        self.active_cooks
    }

    pub fn limits(&self) -> ReplayLimits {
        self.limits
    }

    /// Feed one event into the state machine.
    pub fn observe(&mut self, event: &TraceEvent) -> Result<(), Violation> {
        debug!(?event, "replaying trace event");
        match &event.kind {
            EventKind::Start { command } => self.on_start(event.time, event.pid, command),
            EventKind::End => self.on_end(event.pid),
        }
    }

    /// Final check once the stream is exhausted.
    pub fn finish(self) -> Verdict {
        let name = self.scheduler.main_recipe_name().to_string();
        if self.scheduler.main_done() {
            info!(recipe = %name, "trace replay complete");
            Verdict::Success { main_recipe: name }
        } else {
            Verdict::Failed(Violation::IncompleteMainRecipe { recipe: name })
        }
    }

    fn on_start(&mut self, time: f64, pid: u32, command: &str) -> Result<(), Violation> {
        self.check_dispatch_latency(time)?;

        if let Some(live) = self.pid_to_step.get(&pid) {
            warn!(pid, running = %live.command, started = command, "START for a pid that has not ended");
            return Err(Violation::UnexpectedStepStarted {
                command: command.to_string(),
            });
        }

        let entry = self
            .find_runnable(command)
            .cloned()
            .ok_or_else(|| Violation::UnexpectedStepStarted {
                command: command.to_string(),
            })?;

        if !self.scheduler.recipe(entry.recipe).in_progress {
            let cooks = self.active_cooks + 1;
            if cooks > self.limits.max_cooks {
                return Err(Violation::ConcurrencyExceeded {
                    cooks,
                    max_cooks: self.limits.max_cooks,
                });
            }

            self.active_cooks = cooks;
            self.scheduler.set_in_progress(entry.recipe, true);
            self.slack_since = self.has_slack().then_some(time);

            debug!(
                recipe = %self.scheduler.recipe(entry.recipe).name,
                active_cooks = self.active_cooks,
                slack = self.slack_since.is_some(),
                "recipe dispatched to a cook"
            );
        }

        self.pid_to_step.insert(pid, entry);
        Ok(())
    }

    fn on_end(&mut self, pid: u32) -> Result<(), Violation> {
        let entry = self
            .pid_to_step
            .remove(&pid)
            .ok_or(Violation::OrphanEnd { pid })?;

        let completion = self.scheduler.complete_step(entry.step, &self.io)?;
        self.active_cooks = self.active_cooks.saturating_sub(completion.freed_cooks);

        if completion.freed_cooks > 0 {
            debug!(
                active_cooks = self.active_cooks,
                newly_ready = completion.newly_ready.len(),
                "cook freed"
            );
        }
        Ok(())
    }

    /// First runnable step, in enqueue order, that matches `command` and is
    /// not already attributed to a live pid.
    fn find_runnable(&self, command: &str) -> Option<&QueuedStep> {
        self.scheduler.runnable().iter().find(|queued| {
            queued.matches(command)
                && !self.pid_to_step.values().any(|live| live.step == queued.step)
        })
    }

    /// A cook is free and some ready recipe has not been picked up.
    fn has_slack(&self) -> bool {
        self.active_cooks < self.limits.max_cooks && self.scheduler.idle_ready_count() > 0
    }

    fn check_dispatch_latency(&self, now: f64) -> Result<(), Violation> {
        let Some(since) = self.slack_since else {
            return Ok(());
        };

        // Stub timestamps carry whole milliseconds; compare at that resolution.
        let waited_ms = to_millis(now - since);
        if waited_ms > to_millis(self.limits.wait_threshold) && self.has_slack() {
            return Err(Violation::StarvationTimeout {
                waited: waited_ms as f64 / 1000.0,
                threshold: self.limits.wait_threshold,
                ready: self.scheduler.ready().len(),
                active_cooks: self.active_cooks,
                max_cooks: self.limits.max_cooks,
            });
        }
        Ok(())
    }
}

fn to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

/// Replay a whole event stream, stopping at the first violation.
pub fn replay<I>(mut validator: TraceValidator<'_>, events: I) -> Verdict
where
    I: IntoIterator<Item = TraceEvent>,
{
    for event in events {
        if let Err(violation) = validator.observe(&event) {
            warn!(%violation, "trace rejected");
            return Verdict::Failed(violation);
        }
    }
    validator.finish()
}
