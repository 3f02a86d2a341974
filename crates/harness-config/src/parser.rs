//! Configuration parser with environment variable substitution

use crate::{Config, ConfigError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Parse a YAML configuration file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse YAML configuration from a string
pub fn parse_str(content: &str) -> Result<Config> {
    // Fixtures are small and static after load, so substitution runs over
    // the whole document before deserializing.
    let substituted = substitute_env_vars(content)?;
    let config: Config = serde_yaml::from_str(&substituted)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    // Check version
    if config.version != "1.0" {
        return Err(ConfigError::ValidationError(format!(
            "Unsupported version: {}, expected 1.0",
            config.version
        )));
    }

    if config.cluster.management_node.is_empty() {
        return Err(ConfigError::ValidationError(
            "cluster.management_node must not be empty".to_string(),
        ));
    }

    let mut hostnames = HashSet::new();
    hostnames.insert(config.cluster.management_node.as_str());
    for node in &config.cluster.nodes {
        if node.hostname.is_empty() {
            return Err(ConfigError::ValidationError(
                "node hostname must not be empty".to_string(),
            ));
        }
        if !node.model_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "node '{}' model_path must be absolute, got '{}'",
                node.hostname, node.model_path
            )));
        }
        if !hostnames.insert(node.hostname.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate hostname '{}'",
                node.hostname
            )));
        }
    }

    if config.plan.poll_interval == 0 {
        return Err(ConfigError::ValidationError(
            "plan.poll_interval must be greater than zero".to_string(),
        ));
    }
    if config.plan.timeout <= config.plan.poll_interval {
        return Err(ConfigError::ValidationError(format!(
            "plan.timeout ({}) must exceed plan.poll_interval ({})",
            config.plan.timeout, config.plan.poll_interval
        )));
    }

    Ok(())
}

/// Substitute environment variables in a string
///
/// Supports `${VAR}` and `${VAR:-default}`.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let full_match = &cap[0];
        let var_expr = &cap[1];

        // Handle default values: ${VAR:-default}
        let (var_name, default_value) = if let Some(pos) = var_expr.find(":-") {
            (&var_expr[..pos], Some(&var_expr[pos + 2..]))
        } else {
            (var_expr, None)
        };

        match std::env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                if let Some(default) = default_value {
                    result = result.replace(full_match, default);
                } else {
                    errors.push(var_name.to_string());
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(ConfigError::EnvVarNotFound(errors.join(", ")));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
version: "1.0"
name: service-acceptance
cluster:
  management_node: ms1
  nodes:
    - hostname: node1
      model_path: /deployments/site/clusters/c1/nodes/n1
    - hostname: node2
      model_path: /deployments/site/clusters/c1/nodes/n2
  connection:
    user: root
cli:
  binary: deployctl
plan:
  poll_interval: 10
  timeout: 1800
"#;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_str(VALID).unwrap();
        assert_eq!(config.cluster.management_node, "ms1");
        assert_eq!(config.cluster.nodes.len(), 2);
        assert_eq!(config.cluster.nodes[1].hostname, "node2");
        assert_eq!(config.cli.binary, "deployctl");
        assert_eq!(config.plan.poll_interval, 10);
        assert!(!config.plan.stop_on_terminal_failure);
    }

    #[test]
    fn test_defaults_apply_when_sections_missing() {
        let minimal = r#"
version: "1.0"
cluster:
  management_node: ms1
  nodes: []
"#;
        let config = parse_str(minimal).unwrap();
        assert_eq!(config.cli.binary, "deployctl");
        assert_eq!(config.cli.command_timeout, 300);
        assert_eq!(config.plan.timeout, 1800);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let bad = VALID.replace("\"1.0\"", "\"2.0\"");
        assert!(matches!(
            parse_str(&bad),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_duplicate_hostname_rejected() {
        let bad = VALID.replace("node2", "node1");
        assert!(matches!(
            parse_str(&bad),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_relative_model_path_rejected() {
        let bad = VALID.replace("/deployments/site/clusters/c1/nodes/n1", "nodes/n1");
        assert!(matches!(
            parse_str(&bad),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_interval_must_be_below_timeout() {
        let bad = VALID.replace("timeout: 1800", "timeout: 5");
        assert!(matches!(
            parse_str(&bad),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_substitution() {
        // Safety valve for parallel tests: a name nothing else uses.
        unsafe { std::env::set_var("HARNESS_CONFIG_TEST_MS", "ms-from-env") };
        let with_var = VALID.replace("ms1", "${HARNESS_CONFIG_TEST_MS}");
        let config = parse_str(&with_var).unwrap();
        assert_eq!(config.cluster.management_node, "ms-from-env");
    }

    #[test]
    fn test_env_substitution_default_value() {
        let result =
            substitute_env_vars("user: ${HARNESS_CONFIG_TEST_UNSET:-cluster-admin}").unwrap();
        assert_eq!(result, "user: cluster-admin");
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        assert!(matches!(
            substitute_env_vars("${HARNESS_CONFIG_TEST_DEFINITELY_UNSET}"),
            Err(ConfigError::EnvVarNotFound(_))
        ));
    }

    #[test]
    fn test_parse_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harness.yaml");
        std::fs::write(&path, VALID).unwrap();

        let config = parse_file(&path).unwrap();
        assert_eq!(config.name.as_deref(), Some("service-acceptance"));
    }
}
