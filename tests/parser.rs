// tests/parser.rs

use std::path::PathBuf;

use cookcheck::cookbook::{parse_cookbook, parse_task};

#[test]
fn test_parses_headers_dependencies_and_tasks() {
    let text = "eggs: water pan\n\tboil water\n\tcrack eggs\n\nwater:\n\tfill pot\n";
    let recipes = parse_cookbook(text);

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].name, "eggs");
    assert_eq!(recipes[0].dependencies, vec!["water", "pan"]);
    assert_eq!(recipes[0].tasks.len(), 2);
    assert_eq!(recipes[0].tasks[1].steps, vec!["crack eggs"]);

    assert_eq!(recipes[1].name, "water");
    assert!(recipes[1].dependencies.is_empty());
    assert_eq!(recipes[1].tasks[0].steps, vec!["fill pot"]);
}

#[test]
fn test_recipe_without_tasks() {
    let recipes = parse_cookbook("pan:\n\nwater:\n\tfill pot\n");
    assert_eq!(recipes.len(), 2);
    assert!(recipes[0].tasks.is_empty());
}

#[test]
fn test_extra_blank_lines_between_blocks_are_skipped() {
    let recipes = parse_cookbook("\n\na:\n\tx\n\n\n\nb: a\n\ty\n\n");
    let names: Vec<_> = recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_header_without_colon_ends_parsing() {
    let recipes = parse_cookbook("a:\n\tx\n\nthis is not a header\n\tfoo\n\nb:\n\ty\n");
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].name, "a");
}

#[test]
fn test_simple_task_has_no_redirection() {
    let task = parse_task("boil water");
    assert_eq!(task.steps, vec!["boil water"]);
    assert!(!task.piped);
    assert!(task.input_file.is_none());
    assert!(task.output_file.is_none());
    assert!(task.message.is_empty());
    assert!(!task.has_redirection());
}

#[test]
fn test_input_and_output_redirection() {
    let task = parse_task("cat < in.txt > out.txt");
    assert_eq!(task.steps, vec!["cat"]);
    assert_eq!(task.input_file, Some(PathBuf::from("in.txt")));
    assert_eq!(task.output_file, Some(PathBuf::from("out.txt")));
    assert!(task.has_redirection());
}

#[test]
fn test_output_before_input_in_one_segment() {
    let task = parse_task("cat >out.txt <in.txt");
    assert_eq!(task.steps, vec!["cat"]);
    assert_eq!(task.input_file, Some(PathBuf::from("in.txt")));
    assert_eq!(task.output_file, Some(PathBuf::from("out.txt")));
}

#[test]
fn test_pipeline_takes_input_from_first_and_output_from_last_segment() {
    let task = parse_task("cat < a.txt > ignored.txt | sort < ignored_too.txt | uniq > b.txt");

    assert!(task.piped);
    assert_eq!(task.steps, vec!["cat", "sort", "uniq"]);
    assert_eq!(task.input_file, Some(PathBuf::from("a.txt")));
    assert_eq!(task.output_file, Some(PathBuf::from("b.txt")));
}

#[test]
fn test_empty_pipeline_segments_are_dropped() {
    let task = parse_task("echo -m hi ||  | cat");
    assert!(task.piped);
    assert_eq!(task.steps, vec!["echo -m hi", "cat"]);
}

#[test]
fn test_literal_message_keeps_the_step_arguments() {
    let task = parse_task("echo -m hello > out.txt");
    assert_eq!(task.steps, vec!["echo -m hello"]);
    assert_eq!(task.message, "hello\n");
    assert!(task.has_redirection());
}

#[test]
fn test_literal_messages_are_prepended_in_reverse_order() {
    let task = parse_task("echo -m first | echo -m second | cat > out.txt");
    assert_eq!(task.message, "second\nfirst\n");
}

#[test]
fn test_dash_m_must_be_a_standalone_word() {
    let task = parse_task("grep -mx pattern");
    assert!(task.message.is_empty());

    let trailing = parse_task("echo -m");
    assert!(trailing.message.is_empty());
}
