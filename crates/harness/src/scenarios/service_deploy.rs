//! Positive deployment scenarios: create, inherit, plan, verify, remove

use harness_core::service_manager::{require_not_installed, require_running, SYSTEMD};
use harness_core::{Result, ScenarioContext, ScenarioStep, StepTrace};
use model_client::{ModelItemPath, PlanState};

use super::{node_at, xml_roundtrip};

/// Deploy a service and its package on the management node
pub async fn service_on_management_node(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("service_on_management_node");
    let client = ctx.management_client();

    let app = "vsftpd";
    let id = "vsftpd_mgmt01";
    let xml_file = "xml_service_mgmt01.xml";

    let service_parent = ModelItemPath::new("/ms/services");
    let service = service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let ms_item = ModelItemPath::new("/ms/items").join(id);

    // 1. Create the service
    client.create(&service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    // 2. Create its package
    client.create(&package, "package", &[("name", app)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    // 3. Inherit the package onto the management node
    client.inherit(&ms_item, &package).await?;
    trace.mark(ScenarioStep::Inherited);

    // 4. Create and run the plan
    client.create_plan().await?;
    trace.mark(ScenarioStep::PlanCreated);
    client.run_plan().await?;
    trace.mark(ScenarioStep::PlanRunning);
    ctx.wait_for_plan(PlanState::Complete).await?;
    trace.mark(ScenarioStep::PlanComplete);

    // 5. The service must be running
    require_running(
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

/// Deploy a service and its package on one managed node
pub async fn service_on_one_node(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("service_on_one_node");
    let client = ctx.management_client();
    let node1 = node_at(ctx, 0)?.clone();

    let app = "vsftpd";
    let id = "vsftpd_node01";
    let xml_file = "xml_service_node01.xml";

    let service_parent = ModelItemPath::new("/software/services");
    let service = service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let service_packages = service.join("packages").join(id);
    let node_service = ModelItemPath::new(node1.model_path.as_str()).join("services").join(id);

    // 1. Create the service
    client.create(&service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    // 2. Create its package
    client.create(&package, "package", &[("name", app)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    // 3. Inherit the service onto the node, the package under the service
    client.inherit(&node_service, &service).await?;
    client.inherit(&service_packages, &package).await?;
    trace.mark(ScenarioStep::Inherited);

    // 4. Create and run the plan
    client.create_plan().await?;
    trace.mark(ScenarioStep::PlanCreated);
    client.run_plan().await?;
    trace.mark(ScenarioStep::PlanRunning);
    ctx.wait_for_plan(PlanState::Complete).await?;
    trace.mark(ScenarioStep::PlanComplete);

    // 5. The service must be running on the node
    require_running(ctx.runner().as_ref(), &node1.hostname, &SYSTEMD, app, false).await?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}

/// Deploy one service definition on two managed nodes
pub async fn service_on_two_nodes(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("service_on_two_nodes");
    let client = ctx.management_client();
    let node1 = node_at(ctx, 0)?.clone();
    let node2 = node_at(ctx, 1)?.clone();

    let app = "vsftpd";
    let id = "vsftpd_node02";
    let xml_file = "xml_service_node02.xml";

    let service_parent = ModelItemPath::new("/software/services");
    let service = service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let service_packages = service.join("packages").join(id);
    let node1_service = ModelItemPath::new(node1.model_path.as_str()).join("services").join(id);
    let node2_service = ModelItemPath::new(node2.model_path.as_str()).join("services").join(id);

    // 1. Create the service and its package
    client.create(&service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    client.create(&package, "package", &[("name", app)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    // 2. Inherit onto both nodes
    client.inherit(&node1_service, &service).await?;
    client.inherit(&service_packages, &package).await?;
    client.inherit(&node2_service, &service).await?;
    trace.mark(ScenarioStep::Inherited);

    // 3. Create and run the plan
    client.create_plan().await?;
    trace.mark(ScenarioStep::PlanCreated);
    client.run_plan().await?;
    trace.mark(ScenarioStep::PlanRunning);
    ctx.wait_for_plan(PlanState::Complete).await?;
    trace.mark(ScenarioStep::PlanComplete);

    // 4. The service must be running on both nodes
    require_running(ctx.runner().as_ref(), &node1.hostname, &SYSTEMD, app, false).await?;
    require_running(ctx.runner().as_ref(), &node2.hostname, &SYSTEMD, app, false).await?;
    trace.mark(ScenarioStep::PostConditionChecked);
    Ok(())
}

/// Deploy a service on the management node, then remove it again
pub async fn service_removal(ctx: &ScenarioContext) -> Result<()> {
    let mut trace = StepTrace::new("service_removal");
    let client = ctx.management_client();

    let app = "vsftpd";
    let id = "vsftpd_removal01";
    let xml_file = "xml_service_removal01.xml";

    let service_parent = ModelItemPath::new("/ms/services");
    let service = service_parent.join(id);
    let package_parent = ModelItemPath::new("/software/items");
    let package = package_parent.join(id);
    let ms_item = ModelItemPath::new("/ms/items").join(id);

    // 1. Create the service and its package, inherit onto the node
    client.create(&service, "service", &[("service_name", app)]).await?;
    trace.mark(ScenarioStep::ItemCreated);
    xml_roundtrip(ctx, &client, &service, &service_parent, xml_file, &mut trace).await?;

    client.create(&package, "package", &[("name", app)]).await?;
    xml_roundtrip(ctx, &client, &package, &package_parent, xml_file, &mut trace).await?;

    client.inherit(&ms_item, &package).await?;
    trace.mark(ScenarioStep::Inherited);

    // 2. Deploy and verify
    client.create_plan().await?;
    trace.mark(ScenarioStep::PlanCreated);
    client.run_plan().await?;
    trace.mark(ScenarioStep::PlanRunning);
    ctx.wait_for_plan(PlanState::Complete).await?;
    trace.mark(ScenarioStep::PlanComplete);

    require_running(
        ctx.runner().as_ref(),
        ctx.management_node(),
        &SYSTEMD,
        app,
        false,
    )
    .await?;

    // 3. Remove the service and the inherited package
    client.remove(&service).await?;
    client.remove(&ms_item).await?;

    // 4. A second plan applies the removal
    client.create_plan().await?;
    client.run_plan().await?;
    ctx.wait_for_plan(PlanState::Complete).await?;

    // 5. The unit must be gone entirely
    require_not_installed(
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
