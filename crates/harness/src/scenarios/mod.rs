//! The service acceptance scenarios
//!
//! Each scenario is one fail-fast sequence of model-client calls and
//! assertions, using model paths unique to that scenario so independent
//! runs cannot collide. The shared helpers mirror the per-item XML
//! round-trip every positive scenario performs.

mod service_deploy;
mod service_validation;

use command_runner::Runner;
use harness_core::assertions::{expect_error_token, tokens};
use harness_core::xml::{require_well_formed, xml_check_command};
use harness_core::{Error, Result, ScenarioContext, ScenarioStep, StepTrace};
use model_client::{ModelClient, ModelItemPath};

/// A named scenario
pub struct Scenario {
    /// Name used on the command line and in reports
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
}

/// Every scenario the harness knows, in suite order
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "service_on_management_node",
        description: "Deploy a service with its package on the management node",
    },
    Scenario {
        name: "service_on_one_node",
        description: "Deploy a service with its package on one managed node",
    },
    Scenario {
        name: "service_on_two_nodes",
        description: "Deploy the same service definition on two managed nodes",
    },
    Scenario {
        name: "service_removal",
        description: "Deploy a service, then remove it and verify the unit is gone",
    },
    Scenario {
        name: "duplicate_service_names",
        description: "Two services with one name on a node must fail plan validation",
    },
    Scenario {
        name: "disallowed_service_on_management_node",
        description: "A reserved service name must be rejected at create time",
    },
    Scenario {
        name: "managed_service_on_peer_node",
        description: "An orchestrator-managed service on a node must fail plan validation",
    },
    Scenario {
        name: "disallowed_on_management_allowed_on_node",
        description: "Rejected on the management node, deployable on a peer node",
    },
];

/// Run the named scenario against `ctx`
pub async fn run_scenario(name: &str, ctx: &ScenarioContext) -> Result<()> {
    match name {
        "service_on_management_node" => service_deploy::service_on_management_node(ctx).await,
        "service_on_one_node" => service_deploy::service_on_one_node(ctx).await,
        "service_on_two_nodes" => service_deploy::service_on_two_nodes(ctx).await,
        "service_removal" => service_deploy::service_removal(ctx).await,
        "duplicate_service_names" => service_validation::duplicate_service_names(ctx).await,
        "disallowed_service_on_management_node" => {
            service_validation::disallowed_service_on_management_node(ctx).await
        }
        "managed_service_on_peer_node" => {
            service_validation::managed_service_on_peer_node(ctx).await
        }
        "disallowed_on_management_allowed_on_node" => {
            service_validation::disallowed_on_management_allowed_on_node(ctx).await
        }
        other => Err(Error::Assertion(format!("unknown scenario '{other}'"))),
    }
}

/// Export `path`, validate the produced file, then re-load it expecting the
/// duplicate to be rejected
pub(crate) async fn xml_roundtrip(
    ctx: &ScenarioContext,
    client: &ModelClient,
    path: &ModelItemPath,
    parent: &ModelItemPath,
    xml_file: &str,
    trace: &mut StepTrace,
) -> Result<()> {
    client.export(path, xml_file).await?;
    trace.mark(ScenarioStep::XmlExported);

    let check = ctx
        .runner()
        .run(ctx.management_node(), xml_check_command(xml_file))
        .await?;
    require_well_formed(&check)?;
    trace.mark(ScenarioStep::XmlValidated);

    let loaded = client.load_expecting_failure(parent, xml_file).await?;
    expect_error_token(&loaded, tokens::ITEM_EXISTS)?;
    trace.mark(ScenarioStep::XmlLoadAttempted);
    Ok(())
}

/// The managed node at `index`, or a scenario-fatal error
pub(crate) fn node_at(ctx: &ScenarioContext, index: usize) -> Result<&harness_config::Node> {
    ctx.nodes().get(index).ok_or_else(|| {
        Error::Assertion(format!(
            "scenario requires at least {} managed node(s), configuration has {}",
            index + 1,
            ctx.nodes().len()
        ))
    })
}
