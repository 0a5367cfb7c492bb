// src/scheduler/step_result.rs

use crate::cookbook::{RecipeId, StepId, TaskId};

/// A step the scheduler expects to see started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedStep {
    pub step: StepId,
    pub task: TaskId,
    pub recipe: RecipeId,
    pub command: String,
}

impl QueuedStep {
    /// Whether a reported command line denotes this step.
    ///
    /// The reported program may be path-qualified (`./util/boil`) where the
    /// cookbook names it bare (`boil`); all following words must be equal.
    pub fn matches(&self, reported: &str) -> bool {
        let mut expected = self.command.split_whitespace();
        let mut observed = reported.split_whitespace();

        let program_matches = match (expected.next(), observed.next()) {
            (Some(want), Some(got)) => {
                got == want
                    || got
                        .strip_suffix(want)
                        .is_some_and(|prefix| prefix.ends_with('/'))
            }
            _ => false,
        };

        program_matches && expected.eq(observed)
    }
}

/// What changed as a result of one completed step.
///
/// Useful for tests that want to step the scheduler by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCompletion {
    /// The owning task, if this was its last step.
    pub task_completed: Option<TaskId>,
    /// Recipes that ran out of tasks and left the ready set.
    pub retired: Vec<RecipeId>,
    /// Recipes that entered the ready set.
    pub newly_ready: Vec<RecipeId>,
    /// Number of retired recipes that were holding a cook.
    pub freed_cooks: usize,
    /// Whether the main recipe was retired by this completion.
    pub main_done: bool,
}
