// src/cookbook/parser.rs

//! Build-file ("cookbook") parser.
//!
//! A cookbook is a sequence of blank-line separated blocks:
//!
//! ```text
//! eggs: water pan
//!     boil -m hot < water.txt
//!     crack eggs | whisk > bowl.txt
//! ```
//!
//! The first non-blank line of a block is the header `name: dep dep ...`.
//! A header without `:` ends the cookbook cleanly; blocks parsed so far are
//! kept. Every following line up to a blank line (or EOF) is one task.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::cookbook::model::{ParsedRecipe, ParsedTask};

const REDIRECTS: [char; 2] = ['<', '>'];

/// Parse a whole cookbook from text.
pub fn parse_cookbook(text: &str) -> Vec<ParsedRecipe> {
    let mut lines = text.lines();
    let mut recipes = Vec::new();

    while let Some(recipe) = parse_recipe(&mut lines) {
        trace!(
            recipe = %recipe.name,
            deps = ?recipe.dependencies,
            tasks = recipe.tasks.len(),
            "parsed recipe"
        );
        recipes.push(recipe);
    }

    debug!(recipes = recipes.len(), "cookbook parsed");
    recipes
}

fn parse_recipe<'a, I>(lines: &mut I) -> Option<ParsedRecipe>
where
    I: Iterator<Item = &'a str>,
{
    let header = lines.by_ref().map(str::trim).find(|l| !l.is_empty())?;

    let Some((name, deps)) = header.split_once(':') else {
        debug!(line = header, "line without ':' where a header was expected; end of cookbook");
        return None;
    };

    let mut tasks = Vec::new();
    for line in lines.by_ref() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        tasks.push(parse_task(line));
    }

    Some(ParsedRecipe {
        name: name.trim().to_string(),
        dependencies: deps.split_whitespace().map(str::to_string).collect(),
        tasks,
    })
}

/// Parse a single task line (one command or a `|` pipeline).
///
/// - `<path` counts only in the first segment, `>path` only in the last.
/// - Each `-m token` is *prepended* to the literal text gathered so far, so
///   with several segments the tokens end up in reverse order of encounter.
pub fn parse_task(line: &str) -> ParsedTask {
    let segments: Vec<&str> = line
        .split('|')
        .filter(|s| !s.trim().is_empty())
        .collect();
    let last = segments.len().saturating_sub(1);

    let mut task = ParsedTask {
        piped: line.contains('|'),
        ..ParsedTask::default()
    };

    for (i, raw) in segments.iter().enumerate() {
        let segment = Segment::parse(raw);

        if i == 0 {
            task.input_file = segment.input_file;
        }
        if i == last {
            task.output_file = segment.output_file;
        }
        if let Some(token) = segment.message {
            task.message = format!("{token}\n{}", task.message);
        }

        task.steps.push(segment.command);
    }

    task
}

/// One pipeline segment, split into its command and annotations.
#[derive(Debug)]
struct Segment {
    command: String,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    message: Option<String>,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        let command_end = raw.find(REDIRECTS).unwrap_or(raw.len());
        let command = raw[..command_end].trim().to_string();
        let message = literal_message(&command);

        Self {
            input_file: redirect_target(raw, '<'),
            output_file: redirect_target(raw, '>'),
            message,
            command,
        }
    }
}

/// Text following `marker` up to the next redirection or end of segment.
fn redirect_target(raw: &str, marker: char) -> Option<PathBuf> {
    let start = raw.find(marker)? + 1;
    let rest = &raw[start..];
    let end = rest.find(REDIRECTS).unwrap_or(rest.len());
    let target = rest[..end].trim();

    (!target.is_empty()).then(|| PathBuf::from(target))
}

/// The word following a standalone `-m`, if any.
fn literal_message(command: &str) -> Option<String> {
    let mut words = command.split_whitespace();
    words.by_ref().find(|w| *w == "-m")?;
    words.next().map(str::to_string)
}
