#![allow(dead_code)]

use cookcheck::engine::{ReplayLimits, TraceValidator, Verdict, replay};
use cookcheck::fs::mock::MockFileSystem;
use cookcheck::scheduler::{RedirectionIo, ReferenceScheduler};
use cookcheck::trace::TraceEvent;

pub use cookcheck_test_utils::init_tracing;

/// Replay `events` against `scheduler` with a mock filesystem and the given
/// captured stdout.
pub fn replay_with(
    scheduler: ReferenceScheduler,
    limits: ReplayLimits,
    fs: &MockFileSystem,
    stdout: &[u8],
    events: Vec<TraceEvent>,
) -> Verdict {
    let io = RedirectionIo::new(fs, stdout);
    replay(TraceValidator::new(scheduler, limits, io), events)
}

/// Replay with no files and empty stdout.
pub fn replay_plain(
    scheduler: ReferenceScheduler,
    limits: ReplayLimits,
    events: Vec<TraceEvent>,
) -> Verdict {
    let fs = MockFileSystem::new();
    replay_with(scheduler, limits, &fs, b"", events)
}
