//! XML well-formedness checks for exported model subtrees
//!
//! Every positive scenario exports the item it created and validates the
//! produced file before reusing it as the duplicate-load input.

use command_runner::{Command, CommandResult};

use crate::{Error, Result};

/// Build the well-formedness check for `filename`
///
/// `xmllint` without `--noout` echoes the parsed document, so a successful
/// check has non-empty stdout; that is part of the contract scenarios
/// assert on.
pub fn xml_check_command(filename: &str) -> Command {
    let mut cmd = Command::new("xmllint");
    cmd.arg(filename);
    cmd
}

/// Assert the result of an [`xml_check_command`] run
///
/// Well-formed means exit code 0, the echoed document on stdout, and
/// nothing on stderr.
pub fn require_well_formed(result: &CommandResult) -> Result<()> {
    if result.success() && !result.stdout().is_empty() && result.stderr().is_empty() {
        return Ok(());
    }
    Err(Error::Assertion(format!(
        "exported XML failed the well-formedness check: {result}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_command_shape() {
        let cmd = xml_check_command("/tmp/xml_service_deploy.xml");
        assert_eq!(cmd.display_line(), "xmllint /tmp/xml_service_deploy.xml");
    }

    #[test]
    fn test_well_formed_result_passes() {
        let result = CommandResult::new(
            vec!["<?xml version='1.0'?>".into(), "<service id=\"x\"/>".into()],
            vec![],
            0,
        );
        assert!(require_well_formed(&result).is_ok());
    }

    #[test]
    fn test_empty_stdout_fails() {
        let result = CommandResult::new(vec![], vec![], 0);
        assert!(require_well_formed(&result).is_err());
    }

    #[test]
    fn test_parser_noise_on_stderr_fails() {
        let result = CommandResult::new(
            vec!["<service/>".into()],
            vec!["namespace warning".into()],
            0,
        );
        assert!(require_well_formed(&result).is_err());
    }
}
