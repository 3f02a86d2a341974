//! Tests for the CLI adapter's command construction and result interpretation

mod common;

use common::{fail, ok, plan_status, ReplayRunner};
use model_client::{Error, ModelClient, ModelItemPath, PlanState};
use std::sync::Arc;

fn client_with(responses: Vec<command_runner::CommandResult>) -> (Arc<ReplayRunner>, ModelClient) {
    let runner = Arc::new(ReplayRunner::new(responses));
    let client = ModelClient::new(runner.clone(), "ms1", "deployctl");
    (runner, client)
}

#[test]
fn test_create_builds_expected_invocation() {
    smol::block_on(async {
        let (runner, client) = client_with(vec![ok(&[])]);
        let path = ModelItemPath::new("/software/services/vsftpd");

        client
            .create(&path, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();

        let seen = runner.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "ms1");
        assert_eq!(
            seen[0].1,
            "deployctl create /software/services/vsftpd service service_name=vsftpd"
        );
    });
}

#[test]
fn test_inherit_and_remove_invocations() {
    smol::block_on(async {
        let (runner, client) = client_with(vec![ok(&[]), ok(&[])]);
        let target = ModelItemPath::new("/ms/items/vsftpd");
        let source = ModelItemPath::new("/software/items/vsftpd");

        client.inherit(&target, &source).await.unwrap();
        client.remove(&target).await.unwrap();

        let seen = runner.seen();
        assert_eq!(
            seen[0].1,
            "deployctl inherit /ms/items/vsftpd /software/items/vsftpd"
        );
        assert_eq!(seen[1].1, "deployctl remove /ms/items/vsftpd");
    });
}

#[test]
fn test_strict_failure_carries_captured_result() {
    smol::block_on(async {
        let (_, client) = client_with(vec![fail(1, &["ValidationError    bad model"])]);

        let err = client.create_plan().await.unwrap_err();
        match err {
            Error::CommandFailed { verb, result } => {
                assert_eq!(verb, "create_plan");
                assert_eq!(result.exit_code(), 1);
                assert_eq!(result.stderr(), ["ValidationError    bad model"]);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    });
}

#[test]
fn test_expecting_failure_returns_raw_result() {
    smol::block_on(async {
        let (_, client) = client_with(vec![fail(1, &["ItemExistsError    already there"])]);
        let path = ModelItemPath::new("/software/services");

        let result = client
            .load_expecting_failure(&path, "model.xml")
            .await
            .unwrap();
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.stderr(), ["ItemExistsError    already there"]);
    });
}

#[test]
fn test_expecting_failure_rejects_success() {
    smol::block_on(async {
        let (_, client) = client_with(vec![ok(&["Created item"])]);
        let path = ModelItemPath::new("/software/services");

        let err = client
            .load_expecting_failure(&path, "model.xml")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedSuccess { verb: "load" }));
    });
}

#[test]
fn test_plan_state_parses_status_line() {
    smol::block_on(async {
        let (_, client) = client_with(vec![plan_status("Running")]);
        assert_eq!(client.plan_state().await.unwrap(), PlanState::Running);
    });
}

#[test]
fn test_plan_state_maps_missing_plan_to_not_running() {
    smol::block_on(async {
        let (_, client) = client_with(vec![fail(1, &["InvalidLocationError    Plan does not exist"])]);
        assert_eq!(client.plan_state().await.unwrap(), PlanState::NotRunning);
    });
}
