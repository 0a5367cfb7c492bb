// src/cookbook/model.rs

//! Parsed and resolved cookbook types.
//!
//! The parser produces [`ParsedRecipe`]s that still refer to their
//! dependencies by name. [`crate::cookbook::Cookbook`] resolves those names
//! into [`RecipeId`] edges and hands out the runtime [`Recipe`] / [`Task`] /
//! [`Step`] values that the scheduler consumes.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::path::PathBuf;

/// Index of a recipe inside its owning [`crate::cookbook::Cookbook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(pub usize);

/// Cookbook-wide unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub usize);

/// Cookbook-wide unique step identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub usize);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recipe block as read from the build file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecipe {
    pub name: String,
    /// Dependency names in header order.
    pub dependencies: Vec<String>,
    pub tasks: Vec<ParsedTask>,
}

/// One task line as read from the build file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTask {
    /// Step commands with redirection syntax stripped, in pipeline order.
    pub steps: Vec<String>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    /// Accumulated `-m` literal text (newline-terminated tokens).
    pub message: String,
    /// Whether the line was written as a `|` pipeline.
    pub piped: bool,
}

impl ParsedTask {
    /// Whether completing this task requires the input/output comparison.
    pub fn has_redirection(&self) -> bool {
        self.piped || self.input_file.is_some() || self.output_file.is_some()
    }
}

/// A single command within a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub task: TaskId,
    pub command: String,
}

/// An ordered sequence of steps owned by exactly one recipe.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub recipe: RecipeId,
    /// Steps not yet observed complete. The task is complete once empty.
    pub steps: VecDeque<Step>,
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub message: String,
    pub piped: bool,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn has_redirection(&self) -> bool {
        self.piped || self.input_file.is_some() || self.output_file.is_some()
    }
}

/// A named buildable unit.
///
/// Edges are stored as id sets; no recipe owns another.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Recipes that must retire before this one can become ready.
    pub depends_on: BTreeSet<RecipeId>,
    /// Inverse of `depends_on`.
    pub depended_on_by: BTreeSet<RecipeId>,
    /// Remaining tasks; the front task is the only one that can run.
    pub tasks: VecDeque<Task>,
    /// A cook is currently attributed to this recipe.
    pub in_progress: bool,
    /// Set only on the main recipe, once it retires.
    pub done: bool,
}

impl Recipe {
    pub fn is_leaf(&self) -> bool {
        self.depends_on.is_empty()
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.front()
    }
}
