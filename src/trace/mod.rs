// src/trace/mod.rs

//! The reporting protocol of the program under test.
//!
//! Every step the program runs announces itself on stderr:
//!
//! ```text
//! START\t[1700000000.120, 4242, 3] ./util/boil -m hot
//! END\t[1700000000.420, 4242, 3]
//! ```
//!
//! The bracketed fields are a timestamp in seconds, the pid of the step
//! process and the delay it chose. Only `START` lines carry a command.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{CookcheckError, Result};

static TRACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(START|END)\s*\[([^\]]*)\](.*)$").expect("trace line pattern is valid")
});

/// What a trace record reports.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Start { command: String },
    End,
}

/// One parsed trace record ("stub record").
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    pub kind: EventKind,
    /// Seconds, as reported by the step process.
    pub time: f64,
    pub pid: u32,
    /// Scheduling delay the step process reported for itself.
    pub delay: u32,
}

impl TraceEvent {
    pub fn start(time: f64, pid: u32, command: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Start {
                command: command.into(),
            },
            time,
            pid,
            delay: 0,
        }
    }

    pub fn end(time: f64, pid: u32) -> Self {
        Self {
            kind: EventKind::End,
            time,
            pid,
            delay: 0,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, EventKind::Start { .. })
    }
}

/// Parse a single trace line; `None` if it is not a well-formed record.
pub fn parse_line(line: &str) -> Option<TraceEvent> {
    let caps = TRACE_LINE.captures(line.trim_end())?;

    let mut fields = caps[2].split(',').map(str::trim);
    let time = fields.next()?.parse::<f64>().ok()?;
    let pid = fields.next()?.parse::<u32>().ok()?;
    let delay = fields.next()?.parse::<u32>().ok()?;
    if fields.next().is_some() {
        return None;
    }

    let rest = caps[3].trim();
    let kind = match &caps[1] {
        "START" => EventKind::Start {
            command: rest.to_string(),
        },
        _ if rest.is_empty() => EventKind::End,
        _ => return None,
    };

    Some(TraceEvent {
        kind,
        time,
        pid,
        delay,
    })
}

/// Parse a whole transcript (the program's stderr), skipping blank lines.
pub fn parse_transcript(text: &str) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let event = parse_line(line).ok_or_else(|| CookcheckError::MalformedTrace {
            line_no: i + 1,
            line: line.to_string(),
        })?;
        events.push(event);
    }

    debug!(events = events.len(), "transcript parsed");
    Ok(events)
}
