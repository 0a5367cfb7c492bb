// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;

use cookcheck::cli::CliArgs;
use cookcheck::config::{CheckMode, HarnessSection};

#[test]
fn test_short_flags_become_overrides() {
    let args = CliArgs::try_parse_from([
        "cookcheck", "-p", "./cook", "-f", "book.ckb", "-c", "3", "-m", "eggs", "-w", "40",
    ])
    .unwrap();

    let overrides = args.overrides();
    assert_eq!(overrides.program, Some(PathBuf::from("./cook")));
    assert_eq!(overrides.cookbook, Some(PathBuf::from("book.ckb")));
    assert_eq!(overrides.max_cooks, Some(3));
    assert_eq!(overrides.main_recipe.as_deref(), Some("eggs"));
    assert_eq!(overrides.wait_threshold_ms, Some(40));
    assert_eq!(overrides.hang_secs_per_recipe, None);
    assert_eq!(args.mode(), CheckMode::Replay);
}

#[test]
fn test_no_flags_means_no_overrides() {
    let args = CliArgs::try_parse_from(["cookcheck"]).unwrap();
    assert_eq!(args.overrides(), HarnessSection::default());
}

#[test]
fn test_mode_flags() {
    let args = CliArgs::try_parse_from(["cookcheck", "-e"]).unwrap();
    assert_eq!(args.mode(), CheckMode::ExpectError);

    let args = CliArgs::try_parse_from(["cookcheck", "-x", "cycle detected"]).unwrap();
    assert_eq!(args.mode(), CheckMode::ExpectOutput("cycle detected".to_string()));
}

#[test]
fn test_expect_error_conflicts_with_expected_output() {
    assert!(CliArgs::try_parse_from(["cookcheck", "-e", "-x", "text"]).is_err());
}
