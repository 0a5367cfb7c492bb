// tests/harness_fake_runner.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use cookcheck::config::{CheckConfig, CheckMode, RawConfigFile};
use cookcheck::engine::{Verdict, Violation};
use cookcheck::errors::CookcheckError;
use cookcheck::fs::mock::MockFileSystem;
use cookcheck::harness::{Outcome, check};
use cookcheck_test_utils::builders::{CookbookBuilder, TraceBuilder};
use cookcheck_test_utils::fake_runner::FakeRunner;
use cookcheck_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

const COOKBOOK: &str = "rsrc/cookbook.ckb";

fn default_config() -> CheckConfig {
    CheckConfig::try_from(RawConfigFile::default()).unwrap()
}

fn chain_fs() -> MockFileSystem {
    let text = CookbookBuilder::new()
        .recipe("B", &["A"], &["cmd2"])
        .recipe("A", &[], &["cmd1"])
        .build();
    MockFileSystem::new().with_file(COOKBOOK, text)
}

fn chain_trace() -> String {
    TraceBuilder::new()
        .run(1, "cmd1", 0.01)
        .advance(0.001)
        .run(2, "cmd2", 0.01)
        .render()
}

#[tokio::test]
async fn test_conforming_run_succeeds() -> TestResult {
    init_tracing();
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(0, "", &chain_trace());

    let outcome = with_timeout(check(&default_config(), &fs, &mut runner)).await?;

    assert_eq!(
        outcome,
        Outcome::Verdict(Verdict::Success {
            main_recipe: "B".to_string()
        })
    );
    assert_eq!(outcome.exit_code(), 0);
    Ok(())
}

#[tokio::test]
async fn test_program_is_invoked_with_cookbook_cooks_and_main() -> TestResult {
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(0, "", &chain_trace());
    let invocations = runner.invocations();

    let mut config = default_config();
    config.max_cooks = 3;
    config.main_recipe = Some("B".to_string());
    check(&config, &fs, &mut runner).await?;

    let recorded = invocations.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].program, PathBuf::from("bin/cook"));
    assert_eq!(recorded[0].args, vec!["-f", COOKBOOK, "-c", "3", "B"]);
    // Two recipes at two seconds each.
    assert_eq!(recorded[0].deadline, Duration::from_secs(4));
    Ok(())
}

#[tokio::test]
async fn test_hang_is_reported_separately() -> TestResult {
    let fs = chain_fs();
    let mut runner = FakeRunner::hanging();

    let outcome = check(&default_config(), &fs, &mut runner).await?;
    assert_eq!(
        outcome,
        Outcome::ProcessHang {
            deadline: Duration::from_secs(4)
        }
    );
    assert_eq!(outcome.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_crash_signal_wins_over_expected_error() -> TestResult {
    let fs = chain_fs();
    let mut runner = FakeRunner::signaled(11);
    let config = default_config().with_mode(CheckMode::ExpectError);

    let outcome = check(&config, &fs, &mut runner).await?;
    assert_eq!(outcome, Outcome::ProcessCrash { signal: 11 });
    Ok(())
}

#[tokio::test]
async fn test_nonzero_exit_in_replay_mode() -> TestResult {
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(2, "", "");

    let outcome = check(&default_config(), &fs, &mut runner).await?;
    assert_eq!(outcome, Outcome::NonZeroExit { code: 2 });
    assert_eq!(outcome.exit_code(), -1);
    Ok(())
}

#[tokio::test]
async fn test_expected_error_mode() -> TestResult {
    let broken = "cake: unicorn\n\tbake\n";
    let fs = MockFileSystem::new().with_file(COOKBOOK, broken);
    let config = default_config().with_mode(CheckMode::ExpectError);

    let mut failing = FakeRunner::exiting(1, "", "cake: unknown dependency\n");
    let outcome = check(&config, &fs, &mut failing).await?;
    assert_eq!(outcome, Outcome::ErrorHandled { code: 1 });
    assert_eq!(outcome.exit_code(), 0);

    let mut silent = FakeRunner::exiting(0, "", "");
    let outcome = check(&config, &fs, &mut silent).await?;
    assert_eq!(outcome, Outcome::ErrorNotReported);
    assert_eq!(outcome.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_expected_output_mode() -> TestResult {
    let fs = chain_fs();
    let config = default_config().with_mode(CheckMode::ExpectOutput("hello".to_string()));

    let mut matching = FakeRunner::exiting(0, "hello\n", "");
    let outcome = check(&config, &fs, &mut matching).await?;
    assert_eq!(outcome, Outcome::OutputMatched);

    let mut other = FakeRunner::exiting(0, "goodbye\n", "");
    let outcome = check(&config, &fs, &mut other).await?;
    assert!(matches!(
        outcome,
        Outcome::OutputMismatch { ref found, .. } if found == "goodbye"
    ));
    assert_eq!(outcome.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_expected_text_is_compared_untrimmed() -> TestResult {
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(0, "  hello\n", "");

    let padded = default_config().with_mode(CheckMode::ExpectOutput(" hello".to_string()));
    let outcome = check(&padded, &fs, &mut runner).await?;
    assert!(matches!(
        outcome,
        Outcome::OutputMismatch { ref expected, ref found } if expected == " hello" && found == "hello"
    ));

    let mut runner = FakeRunner::exiting(0, "  hello\n", "");
    let exact = default_config().with_mode(CheckMode::ExpectOutput("hello".to_string()));
    let outcome = check(&exact, &fs, &mut runner).await?;
    assert_eq!(outcome, Outcome::OutputMatched);
    Ok(())
}

#[tokio::test]
async fn test_trace_violation_is_a_verdict() -> TestResult {
    let fs = chain_fs();
    let trace = TraceBuilder::new().start(1, "cmd2").render();
    let mut runner = FakeRunner::exiting(0, "", &trace);

    let outcome = check(&default_config(), &fs, &mut runner).await?;
    assert!(matches!(
        outcome,
        Outcome::Verdict(Verdict::Failed(Violation::UnexpectedStepStarted { .. }))
    ));
    assert_eq!(outcome.exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_redirection_uses_program_stdout() -> TestResult {
    let text = CookbookBuilder::new()
        .recipe("greet", &[], &["echo -m hi | cat"])
        .build();
    let fs = MockFileSystem::new().with_file(COOKBOOK, text);
    let trace = TraceBuilder::new()
        .start(1, "echo -m hi")
        .start(2, "cat")
        .advance(0.01)
        .end(1)
        .end(2)
        .render();

    let mut good = FakeRunner::exiting(0, "hi\n", &trace);
    let outcome = check(&default_config(), &fs, &mut good).await?;
    assert!(outcome.is_success(), "got {outcome}");

    let mut bad = FakeRunner::exiting(0, "bye\n", &trace);
    let outcome = check(&default_config(), &fs, &mut bad).await?;
    assert_eq!(outcome.exit_code(), 4);
    Ok(())
}

#[tokio::test]
async fn test_unknown_main_recipe_is_an_error() {
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(0, "", "");
    let mut config = default_config();
    config.main_recipe = Some("soup".to_string());

    let result = check(&config, &fs, &mut runner).await;
    assert!(matches!(result, Err(CookcheckError::UnknownMainRecipe(_))));
}

#[tokio::test]
async fn test_malformed_trace_is_an_error() {
    let fs = chain_fs();
    let mut runner = FakeRunner::exiting(0, "", "cooking...\n");

    let result = check(&default_config(), &fs, &mut runner).await;
    assert!(matches!(
        result,
        Err(CookcheckError::MalformedTrace { line_no: 1, .. })
    ));
}

#[tokio::test]
async fn test_missing_cookbook_is_an_error() {
    let fs = MockFileSystem::new();
    let mut runner = FakeRunner::exiting(0, "", "");

    let result = check(&default_config(), &fs, &mut runner).await;
    assert!(result.is_err());
    assert!(runner.invocations().lock().unwrap().is_empty());
}
