#![allow(dead_code)]

use cookcheck::cookbook::Cookbook;
use cookcheck::engine::ReplayLimits;
use cookcheck::scheduler::ReferenceScheduler;
use cookcheck::trace::TraceEvent;

/// Builder for cookbook text.
///
/// ```ignore
/// let text = CookbookBuilder::new()
///     .recipe("B", &["A"], &["cmd2"])
///     .recipe("A", &[], &["cmd1"])
///     .build();
/// ```
pub struct CookbookBuilder {
    blocks: Vec<String>,
}

impl CookbookBuilder {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    pub fn recipe(mut self, name: &str, deps: &[&str], tasks: &[&str]) -> Self {
        let mut block = format!("{name}:");
        for dep in deps {
            block.push(' ');
            block.push_str(dep);
        }
        for task in tasks {
            block.push_str("\n\t");
            block.push_str(task);
        }
        self.blocks.push(block);
        self
    }

    /// Cookbook text, blocks separated by blank lines.
    pub fn build(self) -> String {
        let mut text = self.blocks.join("\n\n");
        text.push('\n');
        text
    }

    pub fn build_cookbook(self) -> Cookbook {
        Cookbook::parse(&self.build()).expect("Failed to build valid cookbook from builder")
    }

    pub fn build_scheduler(self, main: Option<&str>) -> ReferenceScheduler {
        ReferenceScheduler::new(self.build_cookbook(), main)
            .expect("Failed to build scheduler from builder")
    }
}

impl Default for CookbookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a trace, both as events and as the text a program prints.
pub struct TraceBuilder {
    now: f64,
    events: Vec<TraceEvent>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            events: Vec::new(),
        }
    }

    /// Set the timestamp for the following events.
    pub fn at(mut self, time: f64) -> Self {
        self.now = time;
        self
    }

    pub fn advance(mut self, seconds: f64) -> Self {
        self.now += seconds;
        self
    }

    pub fn start(mut self, pid: u32, command: &str) -> Self {
        self.events.push(TraceEvent::start(self.now, pid, command));
        self
    }

    pub fn end(mut self, pid: u32) -> Self {
        self.events.push(TraceEvent::end(self.now, pid));
        self
    }

    /// `start` followed by `end` after `duration` seconds.
    pub fn run(self, pid: u32, command: &str, duration: f64) -> Self {
        self.start(pid, command).advance(duration).end(pid)
    }

    pub fn events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// Render in the padded format the step stub writes to stderr.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            let fields = format!("[{:.6},{:>7},{:>3}]", event.time, event.pid, event.delay);
            match &event.kind {
                cookcheck::trace::EventKind::Start { command } => {
                    out.push_str(&format!("START\t{fields} {command}\n"));
                }
                cookcheck::trace::EventKind::End => {
                    out.push_str(&format!("END\t{fields}\n"));
                }
            }
        }
        out
    }
}

impl Default for TraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Limits with the default 20 ms threshold.
pub fn limits(max_cooks: usize) -> ReplayLimits {
    ReplayLimits {
        max_cooks,
        wait_threshold: 0.020,
    }
}
