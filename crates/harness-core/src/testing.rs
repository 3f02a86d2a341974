//! In-memory orchestrator double for scenario tests
//!
//! [`ScriptedOrchestrator`] implements [`Runner`] by interpreting the
//! orchestrator CLI, `systemctl status` and `xmllint` invocations against a
//! scripted model, so the scenario library, poller and assertion helpers
//! can be exercised end to end without a live cluster. Validation rules
//! (reserved and orchestrator-managed service names) are configurable
//! tables, mirroring the table-driven service-manager requirement.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use command_runner::{Command, CommandResult, Runner};
use harness_config::Config;
use model_client::PlanState;

/// One scripted model item
#[derive(Debug, Clone)]
struct Item {
    item_type: String,
    properties: BTreeMap<String, String>,
    for_removal: bool,
}

impl Item {
    fn service_name(&self, path: &str) -> String {
        self.properties
            .get("service_name")
            .cloned()
            .unwrap_or_else(|| last_segment(path).to_string())
    }
}

/// Snapshot produced by `export`
#[derive(Debug, Clone)]
struct ExportedFile {
    item_id: String,
    item: Item,
}

#[derive(Debug, Clone)]
enum Action {
    EnsureRunning { host: String, service: String },
    Uninstall { host: String, service: String },
    RemoveItem { path: String },
}

#[derive(Debug)]
struct Plan {
    state: PlanState,
    polls_remaining: u32,
    actions: Vec<Action>,
}

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<String, Item>,
    files: BTreeMap<String, ExportedFile>,
    plan: Option<Plan>,
    /// host -> set of running services
    running: BTreeMap<String, BTreeSet<String>>,
    fail_plan_runs: bool,
}

/// Scripted stand-in for the orchestrator and its cluster
pub struct ScriptedOrchestrator {
    binary: String,
    management_node: String,
    /// (hostname, model path) per managed node
    nodes: Vec<(String, String)>,
    /// Rejected when created under the management node's services
    reserved_on_management: BTreeSet<String>,
    /// Rejected at plan time when deployed on the management node
    managed_on_management: BTreeSet<String>,
    /// Rejected at plan time when deployed on a peer node
    managed_on_nodes: BTreeSet<String>,
    /// `show_plan` polls a running plan needs before finishing
    polls_to_complete: u32,
    state: Mutex<State>,
}

impl ScriptedOrchestrator {
    /// Create a double for `binary` running on `management_node`
    pub fn new(binary: impl Into<String>, management_node: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            management_node: management_node.into(),
            nodes: Vec::new(),
            reserved_on_management: BTreeSet::new(),
            managed_on_management: BTreeSet::new(),
            managed_on_nodes: BTreeSet::new(),
            polls_to_complete: 2,
            state: Mutex::new(State::default()),
        }
    }

    /// Create a double matching a harness configuration's cluster
    pub fn from_config(config: &Config) -> Self {
        let mut double = Self::new(
            config.cli.binary.clone(),
            config.cluster.management_node.clone(),
        );
        for node in &config.cluster.nodes {
            double = double.with_node(node.hostname.clone(), node.model_path.clone());
        }
        double
    }

    /// Register a managed node
    pub fn with_node(mut self, hostname: impl Into<String>, model_path: impl Into<String>) -> Self {
        self.nodes.push((hostname.into(), model_path.into()));
        self
    }

    /// Reject `service` at create time under the management node
    pub fn with_reserved_on_management(mut self, service: impl Into<String>) -> Self {
        self.reserved_on_management.insert(service.into());
        self
    }

    /// Reject `service` at plan time when deployed on the management node
    pub fn with_managed_on_management(mut self, service: impl Into<String>) -> Self {
        self.managed_on_management.insert(service.into());
        self
    }

    /// Reject `service` at plan time when deployed on a peer node
    pub fn with_managed_on_nodes(mut self, service: impl Into<String>) -> Self {
        self.managed_on_nodes.insert(service.into());
        self
    }

    /// Number of status polls a running plan takes to finish
    pub fn with_polls_to_complete(mut self, polls: u32) -> Self {
        self.polls_to_complete = polls.max(1);
        self
    }

    /// Make subsequent plan runs end in `Failed` instead of `Complete`
    pub fn set_fail_plan_runs(&self, fail: bool) {
        self.state.lock().unwrap().fail_plan_runs = fail;
    }

    /// Whether the double currently reports `service` running on `host`
    pub fn is_service_running(&self, host: &str, service: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .running
            .get(host)
            .is_some_and(|services| services.contains(service))
    }

    fn deployment_host(&self, path: &str) -> Option<String> {
        if path.starts_with("/ms/services/") {
            return Some(self.management_node.clone());
        }
        for (hostname, model_path) in &self.nodes {
            if path.starts_with(&format!("{model_path}/services/")) {
                return Some(hostname.clone());
            }
        }
        None
    }

    fn dispatch_cli(&self, st: &mut State, args: &[String]) -> Reply {
        match args.first().map(String::as_str) {
            Some("create") if args.len() >= 3 => self.create(st, &args[1], &args[2], &args[3..]),
            Some("inherit") if args.len() == 3 => self.inherit(st, &args[1], &args[2]),
            Some("remove") if args.len() == 2 => self.remove(st, &args[1]),
            Some("export") if args.len() == 3 => self.export(st, &args[1], &args[2]),
            Some("load") if args.len() == 3 => self.load(st, &args[1], &args[2]),
            Some("create_plan") => self.create_plan(st),
            Some("run_plan") => self.run_plan(st),
            Some("show_plan") => self.show_plan(st),
            _ => failure(2, vec![format!("Usage error: {}", args.join(" "))]),
        }
    }

    fn create(&self, st: &mut State, path: &str, item_type: &str, props: &[String]) -> Reply {
        if st.items.contains_key(path) {
            return failure(1, vec![item_exists(path)]);
        }

        let mut properties = BTreeMap::new();
        for prop in props {
            if let Some((key, value)) = prop.split_once('=') {
                properties.insert(key.to_string(), value.trim_matches('\'').to_string());
            }
        }

        if item_type == "service" && path.starts_with("/ms/services/") {
            if let Some(name) = properties.get("service_name") {
                if self.reserved_on_management.contains(name) {
                    return failure(
                        1,
                        vec![format!(
                            "ValidationError in property: \"service_name\"    \
                             Service \"{name}\" is managed by the deployment manager"
                        )],
                    );
                }
            }
        }

        st.items.insert(
            path.to_string(),
            Item {
                item_type: item_type.to_string(),
                properties,
                for_removal: false,
            },
        );
        success(vec![])
    }

    fn inherit(&self, st: &mut State, target: &str, source: &str) -> Reply {
        let Some(source_item) = st.items.get(source).cloned() else {
            return failure(1, vec![invalid_location(source)]);
        };
        if st.items.contains_key(target) {
            return failure(1, vec![item_exists(target)]);
        }
        st.items.insert(target.to_string(), source_item);
        success(vec![])
    }

    fn remove(&self, st: &mut State, path: &str) -> Reply {
        if !st.items.contains_key(path) {
            return failure(1, vec![invalid_location(path)]);
        }
        let prefix = format!("{path}/");
        for (item_path, item) in st.items.iter_mut() {
            if item_path == path || item_path.starts_with(&prefix) {
                item.for_removal = true;
            }
        }
        success(vec![])
    }

    fn export(&self, st: &mut State, path: &str, filename: &str) -> Reply {
        let Some(item) = st.items.get(path).cloned() else {
            return failure(1, vec![invalid_location(path)]);
        };
        st.files.insert(
            filename.to_string(),
            ExportedFile {
                item_id: last_segment(path).to_string(),
                item,
            },
        );
        success(vec![])
    }

    fn load(&self, st: &mut State, parent: &str, filename: &str) -> Reply {
        let Some(file) = st.files.get(filename).cloned() else {
            return failure(1, vec![format!("InvalidRequestError    Unable to load file {filename}")]);
        };
        let target = format!("{}/{}", parent.trim_end_matches('/'), file.item_id);
        if st.items.contains_key(&target) {
            return failure(1, vec![item_exists(&target)]);
        }
        st.items.insert(target, file.item);
        success(vec![])
    }

    fn create_plan(&self, st: &mut State) -> Reply {
        // Deployed service instances: (host, service name, marked removal)
        let mut deployed: Vec<(String, String, bool)> = Vec::new();
        for (path, item) in &st.items {
            if item.item_type != "service" {
                continue;
            }
            if let Some(host) = self.deployment_host(path) {
                deployed.push((host, item.service_name(path), item.for_removal));
            }
        }

        let mut errors = Vec::new();

        let mut per_host: BTreeMap<(&str, &str), u32> = BTreeMap::new();
        for (host, name, removal) in &deployed {
            if !removal {
                *per_host.entry((host.as_str(), name.as_str())).or_default() += 1;
            }
        }
        for (&(host, name), count) in &per_host {
            if *count > 1 {
                errors.push(format!(
                    "ValidationError    Create plan failed: Duplicate service \"{name}\" defined on node \"{host}\""
                ));
            }
        }

        for (&(host, name), _) in &per_host {
            let managed = if host == self.management_node {
                self.managed_on_management.contains(name)
                    || self.reserved_on_management.contains(name)
            } else {
                self.managed_on_nodes.contains(name)
            };
            if managed {
                errors.push(format!(
                    "ValidationError    Service \"{name}\" is managed by the deployment manager"
                ));
            }
        }

        if !errors.is_empty() {
            return failure(1, errors);
        }

        let mut actions = Vec::new();
        for (host, name, removal) in &deployed {
            let running = st
                .running
                .get(host)
                .is_some_and(|services| services.contains(name));
            if *removal {
                if running {
                    actions.push(Action::Uninstall {
                        host: host.clone(),
                        service: name.clone(),
                    });
                }
            } else if !running {
                actions.push(Action::EnsureRunning {
                    host: host.clone(),
                    service: name.clone(),
                });
            }
        }
        for (path, item) in &st.items {
            if item.for_removal {
                actions.push(Action::RemoveItem { path: path.clone() });
            }
        }

        if actions.is_empty() {
            return failure(1, vec!["DoNothingPlanError    Create plan failed: no tasks were generated".to_string()]);
        }

        st.plan = Some(Plan {
            state: PlanState::Initial,
            polls_remaining: self.polls_to_complete,
            actions,
        });
        success(vec![])
    }

    fn run_plan(&self, st: &mut State) -> Reply {
        match st.plan.as_mut() {
            Some(plan) if plan.state == PlanState::Initial => {
                plan.state = PlanState::Running;
                success(vec![])
            }
            Some(_) => failure(1, vec!["InvalidRequestError    Plan not in initial state".to_string()]),
            None => failure(1, vec!["InvalidLocationError    Plan does not exist".to_string()]),
        }
    }

    fn show_plan(&self, st: &mut State) -> Reply {
        if st.plan.is_none() {
            return failure(1, vec!["InvalidLocationError    Plan does not exist".to_string()]);
        }

        let failing = st.fail_plan_runs;
        let mut finished: Option<Vec<Action>> = None;
        {
            let plan = st.plan.as_mut().unwrap();
            if plan.state == PlanState::Running {
                if plan.polls_remaining > 1 {
                    plan.polls_remaining -= 1;
                } else if failing {
                    plan.state = PlanState::Failed;
                } else {
                    plan.state = PlanState::Complete;
                    finished = Some(std::mem::take(&mut plan.actions));
                }
            }
        }
        if let Some(actions) = finished {
            apply_actions(st, actions);
        }

        let state = st.plan.as_ref().unwrap().state;
        success(vec![format!("Plan Status: {state}")])
    }

    fn systemctl_status(&self, st: &State, host: &str, service: &str) -> Reply {
        let service = service.trim_end_matches(".service");
        let running = st
            .running
            .get(host)
            .is_some_and(|services| services.contains(service));

        // The double only models deployed-and-running versus absent; the
        // inactive exit code 3 is covered by the service-manager tables.
        if running {
            success(vec![
                format!("● {service}.service - {service}"),
                "   Active: active (running)".to_string(),
            ])
        } else {
            (
                4,
                vec![],
                vec![format!("Unit {service}.service could not be found.")],
            )
        }
    }

    fn xmllint(&self, st: &State, filename: &str) -> Reply {
        match st.files.get(filename) {
            Some(file) => {
                let mut stdout = vec![
                    "<?xml version='1.0' encoding='utf-8'?>".to_string(),
                    format!("<{} id=\"{}\">", file.item.item_type, file.item_id),
                ];
                for (key, value) in &file.item.properties {
                    stdout.push(format!("  <{key}>{value}</{key}>"));
                }
                stdout.push(format!("</{}>", file.item.item_type));
                success(stdout)
            }
            None => (
                8,
                vec![],
                vec![format!("warning: failed to load external entity \"{filename}\"")],
            ),
        }
    }
}

type Reply = (i32, Vec<String>, Vec<String>);

fn success(stdout: Vec<String>) -> Reply {
    (0, stdout, vec![])
}

fn failure(code: i32, stderr: Vec<String>) -> Reply {
    (code, vec![], stderr)
}

fn item_exists(path: &str) -> String {
    format!("ItemExistsError    Item already exists in model: {path}")
}

fn invalid_location(path: &str) -> String {
    format!("InvalidLocationError    Path not found: {path}")
}

fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

fn apply_actions(st: &mut State, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::EnsureRunning { host, service } => {
                st.running.entry(host).or_default().insert(service);
            }
            Action::Uninstall { host, service } => {
                if let Some(services) = st.running.get_mut(&host) {
                    services.remove(&service);
                }
            }
            Action::RemoveItem { path } => {
                st.items.remove(&path);
            }
        }
    }
}

#[async_trait]
impl Runner for ScriptedOrchestrator {
    async fn run(
        &self,
        host: &str,
        command: Command,
    ) -> command_runner::Result<CommandResult> {
        let mut program = command.get_program().to_string_lossy().into_owned();
        let mut args: Vec<String> = command
            .get_args()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();

        // A privileged probe is the same command behind sudo.
        if program == "sudo" && !args.is_empty() {
            program = args.remove(0);
        }

        let mut st = self.state.lock().unwrap();
        let (exit_code, stdout, stderr) = if program == self.binary {
            if host == self.management_node {
                self.dispatch_cli(&mut st, &args)
            } else {
                (127, vec![], vec![format!("sh: {program}: command not found")])
            }
        } else if program == "systemctl" && args.first().map(String::as_str) == Some("status") {
            match args.get(1) {
                Some(service) => self.systemctl_status(&st, host, service),
                None => (2, vec![], vec!["systemctl: missing unit name".to_string()]),
            }
        } else if program == "xmllint" {
            match args.last() {
                Some(filename) => self.xmllint(&st, filename),
                None => (2, vec![], vec!["xmllint: missing file".to_string()]),
            }
        } else {
            (127, vec![], vec![format!("sh: {program}: command not found")])
        };

        Ok(CommandResult::new(stdout, stderr, exit_code))
    }
}
