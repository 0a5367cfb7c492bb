// src/cookbook/mod.rs

//! Cookbook (build file) representation.
//!
//! - [`parser`] turns build-file text into [`ParsedRecipe`]s.
//! - [`graph`] resolves dependency names into the bidirectional
//!   [`Cookbook`] graph.
//! - [`model`] holds the recipe / task / step types and their ids.

pub mod graph;
pub mod model;
pub mod parser;

pub use graph::Cookbook;
pub use model::{ParsedRecipe, ParsedTask, Recipe, RecipeId, Step, StepId, Task, TaskId};
pub use parser::{parse_cookbook, parse_task};
