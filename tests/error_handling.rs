// tests/error_handling.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::NamedTempFile;

use cookcheck::config::{CheckMode, HarnessSection, load_and_validate, resolve};
use cookcheck::errors::CookcheckError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_defaults_without_config_file() {
    let config = resolve(None, HarnessSection::default()).unwrap();

    assert_eq!(config.program, PathBuf::from("bin/cook"));
    assert_eq!(config.cookbook, PathBuf::from("rsrc/cookbook.ckb"));
    assert_eq!(config.max_cooks, 1);
    assert_eq!(config.main_recipe, None);
    assert_eq!(config.wait_threshold, Duration::from_millis(20));
    assert_eq!(config.hang_per_recipe, Duration::from_secs(2));
    assert_eq!(config.mode, CheckMode::Replay);
    assert!((config.limits().wait_threshold - 0.020).abs() < 1e-12);
}

#[test]
fn test_file_values_are_loaded() {
    let file = config_file(
        r#"
[harness]
program = "target/debug/cook"
cookbook = "books/dinner.ckb"
max_cooks = 4
main_recipe = "dinner"
wait_threshold_ms = 50
hang_secs_per_recipe = 3
"#,
    );

    let config = load_and_validate(file.path()).unwrap();
    assert_eq!(config.program, PathBuf::from("target/debug/cook"));
    assert_eq!(config.cookbook, PathBuf::from("books/dinner.ckb"));
    assert_eq!(config.max_cooks, 4);
    assert_eq!(config.main_recipe.as_deref(), Some("dinner"));
    assert_eq!(config.wait_threshold, Duration::from_millis(50));
    assert_eq!(config.deadline_for(5), Duration::from_secs(15));
}

#[test]
fn test_cli_overrides_beat_the_file() {
    let file = config_file(
        r#"
[harness]
max_cooks = 4
main_recipe = "dinner"
"#,
    );
    let overrides = HarnessSection {
        max_cooks: Some(2),
        ..HarnessSection::default()
    };

    let config = resolve(Some(file.path()), overrides).unwrap();
    assert_eq!(config.max_cooks, 2);
    assert_eq!(config.main_recipe.as_deref(), Some("dinner"));
}

#[test]
fn test_zero_cooks_returns_config_error() {
    let file = config_file("[harness]\nmax_cooks = 0\n");

    match load_and_validate(file.path()) {
        Err(CookcheckError::Config(msg)) => assert!(msg.contains("max_cooks")),
        other => panic!("Expected Config error, got: {:?}", other),
    }
}

#[test]
fn test_zero_cooks_from_cli_is_rejected_too() {
    let overrides = HarnessSection {
        max_cooks: Some(0),
        ..HarnessSection::default()
    };
    assert!(matches!(
        resolve(None, overrides),
        Err(CookcheckError::Config(_))
    ));
}

#[test]
fn test_zero_hang_budget_returns_config_error() {
    let file = config_file("[harness]\nhang_secs_per_recipe = 0\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(CookcheckError::Config(msg)) if msg.contains("hang_secs_per_recipe")
    ));
}

#[test]
fn test_unknown_key_is_a_toml_error() {
    let file = config_file("[harness]\nmax_chefs = 3\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(CookcheckError::Toml(_))
    ));
}

#[test]
fn test_missing_config_file_is_an_io_error() {
    let result = resolve(
        Some(std::path::Path::new("/definitely/not/here.toml")),
        HarnessSection::default(),
    );
    assert!(matches!(result, Err(CookcheckError::Io(_))));
}

#[test]
fn test_empty_deadline_still_allows_one_recipe() {
    let config = resolve(None, HarnessSection::default()).unwrap();
    assert_eq!(config.deadline_for(0), Duration::from_secs(2));
}
