//! Tests for local command execution

use command_runner::{Command, Error, LocalRunner, Runner};
use std::time::Duration;

#[test]
fn test_basic_echo() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::builder("echo").arg("hello world").build();
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.stdout(), ["hello world"]);
        assert!(result.stderr().is_empty());
    });
}

#[test]
fn test_stdout_and_stderr_are_kept_apart() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::shell("echo out; echo err >&2");
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.stdout(), ["out"]);
        assert_eq!(result.stderr(), ["err"]);
    });
}

#[test]
fn test_multiline_output_order() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::shell("printf 'a\\nb\\nc\\n'");
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.stdout(), ["a", "b", "c"]);
    });
}

#[test]
fn test_exit_code_propagation() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::shell("exit 42");
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.exit_code(), 42);
        assert!(!result.success());
    });
}

#[test]
fn test_command_with_env_vars() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::builder("sh")
            .arg("-c")
            .arg("echo $TEST_VAR")
            .env("TEST_VAR", "test_value")
            .build();
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.stdout(), ["test_value"]);
    });
}

#[test]
fn test_working_directory() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::builder("pwd").current_dir("/tmp").build();
        let result = runner.run("localhost", cmd).await.unwrap();

        assert_eq!(result.exit_code(), 0);
        assert!(!result.stdout().is_empty());
    });
}

#[test]
fn test_command_not_found() {
    smol::block_on(async {
        let runner = LocalRunner::new();

        let cmd = Command::new("this_command_does_not_exist_12345");
        let result = runner.run("localhost", cmd).await;

        assert!(matches!(result, Err(Error::SpawnFailed { .. })));
    });
}

#[test]
fn test_timeout_kills_the_child() {
    smol::block_on(async {
        let runner = LocalRunner::with_timeout(Duration::from_millis(200));

        let cmd = Command::builder("sleep").arg("30").build();
        let result = runner.run("localhost", cmd).await;

        match result {
            Err(Error::Timeout { timeout, .. }) => {
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    });
}

#[test]
fn test_fast_command_is_not_timed_out() {
    smol::block_on(async {
        let runner = LocalRunner::with_timeout(Duration::from_secs(5));

        let cmd = Command::builder("echo").arg("quick").build();
        let result = runner.run("localhost", cmd).await.unwrap();

        assert!(result.success());
    });
}
