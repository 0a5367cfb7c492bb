// src/scheduler/redirection.rs

use tracing::debug;

use crate::cookbook::Task;
use crate::engine::Violation;
use crate::fs::FileSystem;

/// Everything the redirection check reads from outside the graph.
#[derive(Debug, Clone, Copy)]
pub struct RedirectionIo<'a> {
    pub fs: &'a dyn FileSystem,
    /// Captured stdout of the program under test.
    pub program_output: &'a [u8],
}

impl<'a> RedirectionIo<'a> {
    pub fn new(fs: &'a dyn FileSystem, program_output: &'a [u8]) -> Self {
        Self { fs, program_output }
    }

    /// Literal text + input file contents must equal the output file
    /// contents (or the program's stdout when there is no output file).
    pub fn check(&self, recipe: &str, task: &Task) -> Result<(), Violation> {
        let mut expected = task.message.as_bytes().to_vec();
        if let Some(path) = &task.input_file {
            let contents = self.fs.read(path).map_err(|e| {
                Violation::RedirectionMismatch {
                    recipe: recipe.to_string(),
                    detail: format!("could not read input file: {e:#}"),
                }
            })?;
            expected.extend_from_slice(&contents);
        }

        let found = match &task.output_file {
            Some(path) => self.fs.read(path).map_err(|e| {
                Violation::RedirectionMismatch {
                    recipe: recipe.to_string(),
                    detail: format!("could not read output file: {e:#}"),
                }
            })?,
            None => self.program_output.to_vec(),
        };

        if expected != found {
            return Err(Violation::RedirectionMismatch {
                recipe: recipe.to_string(),
                detail: format!(
                    "expected {:?}, found {:?}",
                    String::from_utf8_lossy(&expected),
                    String::from_utf8_lossy(&found)
                ),
            });
        }

        debug!(recipe, task = task.id.0, "redirection round-trip verified");
        Ok(())
    }
}
