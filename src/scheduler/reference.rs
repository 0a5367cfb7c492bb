// src/scheduler/reference.rs

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::cookbook::{Cookbook, Recipe, RecipeId, StepId};
use crate::engine::Violation;
use crate::errors::{CookcheckError, Result};
use crate::scheduler::redirection::RedirectionIo;
use crate::scheduler::step_result::{QueuedStep, StepCompletion};

/// Independent model of what a conforming cook program may run next.
///
/// It owns the cookbook and mutates it as steps are observed complete:
/// steps and tasks are consumed, finished recipes leave the ready set and
/// release their dependents.
///
/// It is responsible for:
/// - computing the initial ready set (leaves under the main recipe)
/// - keeping the runnable queue in sync with the ready set
/// - consuming completed steps and checking task redirections
/// - retiring finished recipes and propagating readiness to dependents
#[derive(Debug)]
pub struct ReferenceScheduler {
    cookbook: Cookbook,
    main: RecipeId,
    /// Dependency closure of the main recipe (inclusive).
    scope: BTreeSet<RecipeId>,
    /// Recipes whose dependencies are satisfied and which still have work,
    /// in the order they became ready.
    ready: Vec<RecipeId>,
    /// Runnable steps in enqueue order.
    queue: Vec<QueuedStep>,
}

impl ReferenceScheduler {
    /// Build the initial scheduler state for `main_recipe` (or the first
    /// recipe in the cookbook when `None`).
    pub fn new(cookbook: Cookbook, main_recipe: Option<&str>) -> Result<Self> {
        let main = match main_recipe {
            Some(name) => cookbook
                .find(name)
                .ok_or_else(|| CookcheckError::UnknownMainRecipe(name.to_string()))?,
            None => cookbook.first().ok_or(CookcheckError::EmptyCookbook)?,
        };

        let (scope, leaves) = collect_leaves(&cookbook, main);
        info!(
            main = %cookbook.recipe(main).name,
            scope = scope.len(),
            leaves = leaves.len(),
            "reference scheduler initialised"
        );

        let mut scheduler = Self {
            cookbook,
            main,
            scope,
            ready: leaves,
            queue: Vec::new(),
        };

        let mut initial = StepCompletion::default();
        scheduler.settle(&mut initial);

        Ok(scheduler)
    }

    pub fn cookbook(&self) -> &Cookbook {
        &self.cookbook
    }

    pub fn recipe(&self, id: RecipeId) -> &Recipe {
        self.cookbook.recipe(id)
    }

    pub fn main_recipe(&self) -> RecipeId {
        self.main
    }

    pub fn main_recipe_name(&self) -> &str {
        &self.cookbook.recipe(self.main).name
    }

    /// Whether the main recipe has retired.
    pub fn main_done(&self) -> bool {
        self.cookbook.recipe(self.main).done
    }

    /// Current ready set, in the order recipes became ready.
    pub fn ready(&self) -> &[RecipeId] {
        &self.ready
    }

    /// Ready recipes that no cook has picked up yet.
    pub fn idle_ready_count(&self) -> usize {
        self.ready
            .iter()
            .filter(|id| !self.cookbook.recipe(**id).in_progress)
            .count()
    }

    /// Recipes currently holding a cook.
    pub fn in_progress_count(&self) -> usize {
        self.cookbook.recipes().iter().filter(|r| r.in_progress).count()
    }

    /// Runnable steps, in enqueue order.
    pub fn runnable(&self) -> &[QueuedStep] {
        &self.queue
    }

    /// Whether `id` is part of the main recipe's dependency closure.
    pub fn in_scope(&self, id: RecipeId) -> bool {
        self.scope.contains(&id)
    }

    pub fn set_in_progress(&mut self, id: RecipeId, in_progress: bool) {
        self.cookbook.recipe_mut(id).in_progress = in_progress;
    }

    /// Consume an observed-complete step.
    ///
    /// Removes it from its task and from the runnable queue. If that was the
    /// task's last step, the task is detached (after its redirection check)
    /// and the recipe either queues its next task or retires.
    pub fn complete_step(
        &mut self,
        step: StepId,
        io: &RedirectionIo<'_>,
    ) -> std::result::Result<StepCompletion, Violation> {
        let mut outcome = StepCompletion::default();

        let Some(pos) = self.queue.iter().position(|q| q.step == step) else {
            warn!(step = step.0, "completed step is not in the runnable queue; ignoring");
            return Ok(outcome);
        };
        let queued = self.queue.remove(pos);

        let recipe = self.cookbook.recipe_mut(queued.recipe);
        let Some(task) = recipe.tasks.front_mut().filter(|t| t.id == queued.task) else {
            warn!(
                recipe = %recipe.name,
                task = queued.task.0,
                "completed step does not belong to the recipe's current task; ignoring"
            );
            return Ok(outcome);
        };

        task.steps.retain(|s| s.id != step);
        debug!(
            recipe = %recipe.name,
            step = %queued.command,
            remaining = task.steps.len(),
            "step completed"
        );

        if !task.is_complete() {
            return Ok(outcome);
        }

        if let Some(task) = recipe.tasks.pop_front() {
            if task.has_redirection() {
                io.check(&recipe.name, &task)?;
            }
            debug!(recipe = %recipe.name, task = task.id.0, "task completed");
            outcome.task_completed = Some(task.id);
        }

        self.settle(&mut outcome);
        Ok(outcome)
    }

    /// Apply the enqueue rule to the whole ready set, retiring recipes that
    /// have run out of tasks, until nothing changes.
    fn settle(&mut self, outcome: &mut StepCompletion) {
        loop {
            let mut exhausted = Vec::new();
            let mut to_enqueue = Vec::new();

            for &id in &self.ready {
                match self.cookbook.recipe(id).current_task() {
                    Some(task) => {
                        if !self.queue.iter().any(|q| q.task == task.id) {
                            to_enqueue.push(id);
                        }
                    }
                    None => exhausted.push(id),
                }
            }

            for id in to_enqueue {
                self.enqueue_current_task(id);
            }

            if exhausted.is_empty() {
                break;
            }

            for id in exhausted {
                self.retire(id, outcome);
            }
        }
    }

    fn enqueue_current_task(&mut self, id: RecipeId) {
        let recipe = self.cookbook.recipe(id);
        let Some(task) = recipe.current_task() else {
            return;
        };

        for step in &task.steps {
            self.queue.push(QueuedStep {
                step: step.id,
                task: task.id,
                recipe: id,
                command: step.command.clone(),
            });
        }

        debug!(
            recipe = %recipe.name,
            task = task.id.0,
            steps = task.steps.len(),
            "enqueued runnable steps"
        );
    }

    /// Remove a finished recipe from the ready set and release its dependents.
    fn retire(&mut self, id: RecipeId, outcome: &mut StepCompletion) {
        self.ready.retain(|r| *r != id);

        let recipe = self.cookbook.recipe_mut(id);
        if recipe.in_progress {
            outcome.freed_cooks += 1;
        }
        recipe.in_progress = false;
        if id == self.main {
            recipe.done = true;
            outcome.main_done = true;
            info!(recipe = %recipe.name, "main recipe complete");
        } else {
            debug!(recipe = %recipe.name, "recipe retired");
        }

        // Drop the edge on both sides so the relations stay inverse.
        let dependents = std::mem::take(&mut recipe.depended_on_by);
        outcome.retired.push(id);

        for dependent in dependents {
            let waiting = self.cookbook.recipe_mut(dependent);
            waiting.depends_on.remove(&id);

            if waiting.depends_on.is_empty()
                && self.scope.contains(&dependent)
                && !self.ready.contains(&dependent)
            {
                debug!(recipe = %waiting.name, "dependencies satisfied; recipe ready");
                self.ready.push(dependent);
                outcome.newly_ready.push(dependent);
            }
        }
    }
}

/// Depth-first walk of `depends_on` edges from `root`.
///
/// Returns the visited closure and the leaves in discovery order.
fn collect_leaves(cookbook: &Cookbook, root: RecipeId) -> (BTreeSet<RecipeId>, Vec<RecipeId>) {
    let mut scope = BTreeSet::new();
    let mut leaves = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        if !scope.insert(id) {
            continue;
        }

        let recipe = cookbook.recipe(id);
        if recipe.is_leaf() {
            leaves.push(id);
        }
        // Reverse so the first-listed dependency is visited first.
        stack.extend(recipe.depends_on.iter().rev().copied());
    }

    (scope, leaves)
}
