// src/cookbook/graph.rs

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::cookbook::model::{ParsedRecipe, Recipe, RecipeId, Step, StepId, Task, TaskId};
use crate::cookbook::parser::parse_cookbook;
use crate::errors::{CookcheckError, Result};

/// The resolved dependency graph.
///
/// Owns every recipe, task and step. Recipes are stored in parse order and
/// refer to each other only through [`RecipeId`] sets, kept as exact
/// inverses (`depends_on` / `depended_on_by`).
#[derive(Debug, Clone)]
pub struct Cookbook {
    recipes: Vec<Recipe>,
}

impl Cookbook {
    /// Parse cookbook text and resolve it into a graph.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_parsed(parse_cookbook(text))
    }

    /// Resolve dependency names into bidirectional edges.
    ///
    /// Fails on the first unknown dependency name; no partial graph is
    /// returned. Duplicate names and dependency cycles are rejected too.
    pub fn from_parsed(parsed: Vec<ParsedRecipe>) -> Result<Self> {
        if parsed.is_empty() {
            return Err(CookcheckError::EmptyCookbook);
        }

        let mut index: HashMap<&str, RecipeId> = HashMap::new();
        for (i, recipe) in parsed.iter().enumerate() {
            if index.insert(recipe.name.as_str(), RecipeId(i)).is_some() {
                return Err(CookcheckError::DuplicateRecipe(recipe.name.clone()));
            }
        }

        let mut edges: Vec<BTreeSet<RecipeId>> = Vec::with_capacity(parsed.len());
        for recipe in &parsed {
            let mut deps = BTreeSet::new();
            for name in &recipe.dependencies {
                let dep = index.get(name.as_str()).copied().ok_or_else(|| {
                    CookcheckError::UnknownDependency {
                        recipe: recipe.name.clone(),
                        dependency: name.clone(),
                    }
                })?;
                deps.insert(dep);
            }
            edges.push(deps);
        }

        ensure_acyclic(&parsed, &edges)?;

        let mut next_task = 0;
        let mut next_step = 0;
        let mut recipes: Vec<Recipe> = parsed
            .into_iter()
            .zip(edges)
            .enumerate()
            .map(|(i, (recipe, depends_on))| {
                let id = RecipeId(i);
                let tasks = recipe
                    .tasks
                    .into_iter()
                    .map(|parsed_task| {
                        let task_id = TaskId(next_task);
                        next_task += 1;
                        let steps = parsed_task
                            .steps
                            .into_iter()
                            .map(|command| {
                                let step = Step {
                                    id: StepId(next_step),
                                    task: task_id,
                                    command,
                                };
                                next_step += 1;
                                step
                            })
                            .collect::<VecDeque<_>>();
                        Task {
                            id: task_id,
                            recipe: id,
                            steps,
                            input_file: parsed_task.input_file,
                            output_file: parsed_task.output_file,
                            message: parsed_task.message,
                            piped: parsed_task.piped,
                        }
                    })
                    .collect();

                Recipe {
                    id,
                    name: recipe.name,
                    depends_on,
                    depended_on_by: BTreeSet::new(),
                    tasks,
                    in_progress: false,
                    done: false,
                }
            })
            .collect();

        // Reverse edges: dependency -> dependent.
        for i in 0..recipes.len() {
            let deps: Vec<RecipeId> = recipes[i].depends_on.iter().copied().collect();
            for dep in deps {
                recipes[dep.0].depended_on_by.insert(RecipeId(i));
            }
        }

        debug!(
            recipes = recipes.len(),
            tasks = next_task,
            steps = next_step,
            "cookbook graph resolved"
        );

        Ok(Self { recipes })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Panics if `id` did not come from this cookbook.
    pub fn recipe(&self, id: RecipeId) -> &Recipe {
        &self.recipes[id.0]
    }

    pub(crate) fn recipe_mut(&mut self, id: RecipeId) -> &mut Recipe {
        &mut self.recipes[id.0]
    }

    /// Look a recipe up by name.
    pub fn find(&self, name: &str) -> Option<RecipeId> {
        self.recipes.iter().find(|r| r.name == name).map(|r| r.id)
    }

    /// The first recipe in the file, the default main recipe.
    pub fn first(&self) -> Option<RecipeId> {
        self.recipes.first().map(|r| r.id)
    }

    /// Whether `depends_on` and `depended_on_by` are exact inverses.
    pub fn edges_are_symmetric(&self) -> bool {
        self.recipes.iter().all(|r| {
            r.depends_on
                .iter()
                .all(|d| self.recipes[d.0].depended_on_by.contains(&r.id))
                && r
                    .depended_on_by
                    .iter()
                    .all(|d| self.recipes[d.0].depends_on.contains(&r.id))
        })
    }
}

fn ensure_acyclic(parsed: &[ParsedRecipe], edges: &[BTreeSet<RecipeId>]) -> Result<()> {
    // Edge direction: dependency -> dependent.
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

    for i in 0..parsed.len() {
        graph.add_node(i);
    }
    for (i, deps) in edges.iter().enumerate() {
        for dep in deps {
            graph.add_edge(dep.0, i, ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(CookcheckError::DependencyCycle(format!(
            "cycle detected in recipe dependencies involving recipe '{}'",
            parsed[cycle.node_id()].name
        ))),
    }
}
