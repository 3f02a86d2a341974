//! Behavioral tests for the orchestrator double
//!
//! These pin down the contract the scenarios rely on: error tokens, exit
//! codes, plan lifecycle and service status conventions.

use std::sync::Arc;

use command_runner::Runner;
use harness_core::assertions::{expect_error_token, tokens};
use harness_core::service_manager::{self, ServiceProbe, SYSTEMD};
use harness_core::testing::ScriptedOrchestrator;
use harness_core::xml;
use model_client::{ModelClient, ModelItemPath, PlanPoller, PlanState, PollConfig};
use std::time::Duration;

const NODE1_PATH: &str = "/deployments/site/clusters/c1/nodes/n1";

fn cluster() -> Arc<ScriptedOrchestrator> {
    Arc::new(
        ScriptedOrchestrator::new("deployctl", "ms1")
            .with_node("node1", NODE1_PATH)
            .with_polls_to_complete(2),
    )
}

fn client(orch: &Arc<ScriptedOrchestrator>) -> ModelClient {
    ModelClient::new(orch.clone(), "ms1", "deployctl")
}

fn fast_poll() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(2),
        stop_on_terminal_failure: false,
    }
}

#[test]
fn test_create_export_validate_roundtrip() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let path = ModelItemPath::new("/software/services/vsftpd");

        client
            .create(&path, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.export(&path, "model.xml").await.unwrap();

        let result = orch
            .run("ms1", xml::xml_check_command("model.xml"))
            .await
            .unwrap();
        xml::require_well_formed(&result).unwrap();
        assert!(result.stdout().iter().any(|l| l.contains("service_name")));
    });
}

#[test]
fn test_load_onto_existing_item_reports_item_exists() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let path = ModelItemPath::new("/software/services/vsftpd");
        let parent = ModelItemPath::new("/software/services");

        client
            .create(&path, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.export(&path, "model.xml").await.unwrap();

        let result = client
            .load_expecting_failure(&parent, "model.xml")
            .await
            .unwrap();
        expect_error_token(&result, tokens::ITEM_EXISTS).unwrap();
    });
}

#[test]
fn test_plan_reaches_complete_and_starts_service() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let service = ModelItemPath::new("/ms/services/vsftpd");

        client
            .create(&service, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.create_plan().await.unwrap();
        client.run_plan().await.unwrap();

        let poller = PlanPoller::new(&client, fast_poll());
        let reached = poller
            .wait_for_state(PlanState::Complete, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(reached);
        assert!(orch.is_service_running("ms1", "vsftpd"));

        let probe = service_manager::probe_service(orch.as_ref(), "ms1", &SYSTEMD, "vsftpd", false)
            .await
            .unwrap();
        assert_eq!(probe, ServiceProbe::Running);
    });
}

#[test]
fn test_failed_plan_is_observable() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let service = ModelItemPath::new("/ms/services/vsftpd");

        client
            .create(&service, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.create_plan().await.unwrap();
        client.run_plan().await.unwrap();
        orch.set_fail_plan_runs(true);

        let poller = PlanPoller::new(&client, fast_poll());
        let reached = poller
            .wait_for_state(PlanState::Failed, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(reached);
        assert!(!orch.is_service_running("ms1", "vsftpd"));
    });
}

#[test]
fn test_duplicate_services_fail_plan_validation() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let a = ModelItemPath::new("/software/services/vsftpd_a");
        let b = ModelItemPath::new("/software/services/vsftpd_b");
        let node_services = ModelItemPath::new(NODE1_PATH).join("services");

        client
            .create(&a, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client
            .create(&b, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.inherit(&node_services.join("vsftpd_a"), &a).await.unwrap();
        client.inherit(&node_services.join("vsftpd_b"), &b).await.unwrap();

        let result = client.create_plan_expecting_failure().await.unwrap();
        expect_error_token(&result, tokens::VALIDATION).unwrap();
    });
}

#[test]
fn test_reserved_service_rejected_at_create_time() {
    smol::block_on(async {
        let orch = Arc::new(
            ScriptedOrchestrator::new("deployctl", "ms1")
                .with_reserved_on_management("mcollective"),
        );
        let client = client(&orch);
        let path = ModelItemPath::new("/ms/services/mcollective");

        let result = client
            .create_expecting_failure(&path, "service", &[("service_name", "mcollective")])
            .await
            .unwrap();
        expect_error_token(&result, tokens::VALIDATION).unwrap();
        assert!(!orch.is_service_running("ms1", "mcollective"));
    });
}

#[test]
fn test_managed_service_rejected_at_plan_time_on_node() {
    smol::block_on(async {
        let orch = Arc::new(
            ScriptedOrchestrator::new("deployctl", "ms1")
                .with_node("node1", NODE1_PATH)
                .with_managed_on_nodes("sshd"),
        );
        let client = client(&orch);
        let source = ModelItemPath::new("/software/services/sshd_x");
        let target = ModelItemPath::new(NODE1_PATH).join("services/sshd_x");

        client
            .create(&source, "service", &[("service_name", "sshd")])
            .await
            .unwrap();
        client.inherit(&target, &source).await.unwrap();

        let result = client.create_plan_expecting_failure().await.unwrap();
        expect_error_token(&result, tokens::VALIDATION).unwrap();
        assert!(!orch.is_service_running("node1", "sshd"));
    });
}

#[test]
fn test_removal_plan_uninstalls_service() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);
        let service = ModelItemPath::new("/ms/services/vsftpd");

        client
            .create(&service, "service", &[("service_name", "vsftpd")])
            .await
            .unwrap();
        client.create_plan().await.unwrap();
        client.run_plan().await.unwrap();
        let poller = PlanPoller::new(&client, fast_poll());
        assert!(poller
            .wait_for_state(PlanState::Complete, Duration::from_secs(5))
            .await
            .unwrap());

        client.remove(&service).await.unwrap();
        client.create_plan().await.unwrap();
        client.run_plan().await.unwrap();
        assert!(poller
            .wait_for_state(PlanState::Complete, Duration::from_secs(5))
            .await
            .unwrap());

        service_manager::require_not_installed(orch.as_ref(), "ms1", &SYSTEMD, "vsftpd", false)
            .await
            .unwrap();
    });
}

#[test]
fn test_plan_with_no_changes_is_rejected() {
    smol::block_on(async {
        let orch = cluster();
        let client = client(&orch);

        let result = client.create_plan_expecting_failure().await.unwrap();
        assert!(result
            .stderr()
            .iter()
            .any(|line| line.contains("DoNothingPlanError")));
    });
}

#[test]
fn test_cli_is_only_available_on_the_management_node() {
    smol::block_on(async {
        let orch = cluster();
        let stray = ModelClient::new(orch.clone(), "node1", "deployctl");
        let path = ModelItemPath::new("/software/services/x");

        let err = stray.create(&path, "service", &[]).await.unwrap_err();
        assert!(matches!(err, model_client::Error::CommandFailed { .. }));
    });
}
