//! Negative scenarios: validation must reject bad service models

use harness_core::assertions::{expect_error_token, tokens};
use harness_core::service_manager::{require_not_running, require_running, SYSTEMD};
use harness_core::{Result, ScenarioContext, ScenarioStep, StepTrace};
use model_client::{ModelItemPath, PlanState};

use super::{node_at, xml_roundtrip};

/// Two services with the same service_name on one node must fail plan
/// validation
pub async fn duplicate_service_names(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("duplicate_service_names");
    let client = ctx.management_client();
    let node1 = node_at(ctx, 0)?.clone();

    let app = "vsftpd";
    let id_a = "vsftpd_dup05";
    let id_b = "vsftpd_dup05_b";
    let xml_file = "xml_service_dup05.xml";

    let service_parent = ModelItemPath::new("/software/services");
    let service_a = service_parent.join(id_a);
    let service_b = service_parent.join(id_b);
    let node_services = ModelItemPath::new(node1.model_path.as_str()).join("services");

    // 1. Two definitions carrying the same service_name
    client.create(&service_a, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service_a, &service_parent, xml_file, &mut trace).await?;

    client.create(&service_b, "service", &[("service_name", app)]).await?;
    xml_roundtrip(ctx, &client, &service_b, &service_parent, xml_file, &mut trace).await?;

    // 2. Both inherited onto the same node
    client.inherit(&node_services.join(id_a), &service_a).await?;
    client.inherit(&node_services.join(id_b), &service_b).await?;
    trace.mark(ScenarioStep::Inherited);

    // 3. Plan creation must be rejected
    let result = client.create_plan_expecting_failure().await?;
    expect_error_token(&result, tokens::VALIDATION)?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}

/// A service name reserved by the orchestrator must be rejected when
/// created under the management node
pub async fn disallowed_service_on_management_node(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("disallowed_service_on_management_node");
    let client = ctx.management_client();

    let app = "mcollective";
    let service = ModelItemPath::new("/ms/services").join("mcollective_res06");

    // 1. Creation itself must fail with a validation error
    let result = client
        .create_expecting_failure(&service, "service", &[("service_name", app)])
        .await?;
    expect_error_token(&result, tokens::VALIDATION)?;

    // 2. Nothing may have been deployed by the attempt
    require_not_running(
        ctx.runner().as_ref(),
        ctx.management_node(),
        &SYSTEMD,
        app,
        false,
    )
    .await?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}

/// A service the orchestrator manages itself must be rejected at plan time
/// when inherited onto a peer node
pub async fn managed_service_on_peer_node(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("managed_service_on_peer_node");
    let client = ctx.management_client();
    let node1 = node_at(ctx, 0)?.clone();

    let app = "sshd";
    let id = "sshd_node07";
    let xml_file = "xml_service_node07.xml";

    let service_parent = ModelItemPath::new("/software/services");
    let service = service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let service_packages = service.join("packages").join(id);
    let node_service = ModelItemPath::new(node1.model_path.as_str()).join("services").join(id);

    // 1. Model creation goes through; the name is only checked at plan time
    client.create(&service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    client.create(&package, "package", &[("name", app)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    client.inherit(&node_service, &service).await?;
    client.inherit(&service_packages, &package).await?;
    trace.mark(ScenarioStep::Inherited);

    // 2. Plan creation must be rejected
    let result = client.create_plan_expecting_failure().await?;
    expect_error_token(&result, tokens::VALIDATION)?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}

/// A service disallowed on the management node is still deployable on a
/// peer node
pub async fn disallowed_on_management_allowed_on_node(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("disallowed_on_management_allowed_on_node");
    let client = ctx.management_client();
    let node1 = node_at(ctx, 0)?.clone();

    let app = "rabbitmq-server";
    let id = "rabbitmq_mixed08";
    let id_b = "rabbitmq_mixed08_b";
    let package_name = "rabbitmq-server-bundle.noarch";
    let xml_file = "xml_service_mixed08.xml";

    let ms_service_parent = ModelItemPath::new("/ms/services");
    let ms_service = ms_service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let ms_item = ModelItemPath::new("/ms/items").join(id);

    // 1. Model the service on the management node; creation succeeds
    client.create(&ms_service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &ms_service, &ms_service_parent, xml_file, &mut trace).await?;

    client.create(&package, "package", &[("name", package_name)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    client.inherit(&ms_item, &package).await?;
    trace.mark(ScenarioStep::Inherited);

    // 2. Plan creation must be rejected on the management node
    let result = client.create_plan_expecting_failure().await?;
    expect_error_token(&result, tokens::VALIDATION)?;
    trace.mark(ScenarioStep::PlanFailed);

    // 3. Back the rejected model out
    client.remove(&ms_item).await?;
    client.remove(&package).await?;
    client.remove(&ms_service).await?;

    // 4. Model the same service on a peer node instead
    let service_parent = ModelItemPath::new("/software/services");
    let service = service_parent.join(id_b);
    let package_b = package_parent.join(id_b);
    let service_packages = service.join("packages").join(id_b);
    let node_service = ModelItemPath::new(node1.model_path.as_str()).join("services").join(id_b);

    client.create(&service, "service", &[("service_name", app)]).await?;
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    client.create(&package_b, "package", &[("name", package_name)]).await?;
    xml_roundtrip(ctx, &client, &package_b, &package_parent, xml_file, &mut trace).await?;

    client.inherit(&node_service, &service).await?;
    client.inherit(&service_packages, &package_b).await?;

    // 5. This time the plan runs to completion
    client.create_plan().await?;
    trace.mark(ScenarioStep::PlanCreated);
    client.run_plan().await?;
    trace.mark(ScenarioStep::PlanRunning);
    ctx.wait_for_plan(PlanState::Complete).await?;
    trace.mark(ScenarioStep::PlanComplete);

    // 6. The service runs on the node; probing it needs root
    require_running(ctx.runner().as_ref(), &node1.hostname, &SYSTEMD, app, true).await?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}
