//! Assertion helpers over captured command output

use command_runner::CommandResult;

use crate::{Error, Result};

/// Error tokens the orchestrator surfaces in stderr
///
/// These are opaque strings, not a structured protocol; keeping them in one
/// place is the compatibility fallback called out in the design notes.
pub mod tokens {
    /// An item already exists at the target path
    pub const ITEM_EXISTS: &str = "ItemExistsError";
    /// The model failed create-time or plan-time validation
    pub const VALIDATION: &str = "ValidationError";
}

/// Case-sensitive substring search across an ordered line sequence
///
/// Returns false on an empty haystack.
pub fn is_text_in_list(needle: &str, haystack: &[String]) -> bool {
    haystack.iter().any(|line| line.contains(needle))
}

/// [`is_text_in_list`] as a scenario-fatal check
pub fn require_text_in_list(needle: &str, haystack: &[String], what: &str) -> Result<()> {
    if is_text_in_list(needle, haystack) {
        return Ok(());
    }
    Err(Error::Assertion(format!(
        "'{needle}' not found in {what}: {haystack:?}"
    )))
}

/// Check that an expected failure carries the expected error token
///
/// Success means a non-zero exit code and `token` somewhere in stderr;
/// anything else fails the scenario.
pub fn expect_error_token(result: &CommandResult, token: &str) -> Result<()> {
    if !result.success() && is_text_in_list(token, result.stderr()) {
        return Ok(());
    }
    Err(Error::ExpectedFailureMissing {
        token: token.to_string(),
        result: result.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_haystack_is_false() {
        assert!(!is_text_in_list("anything", &[]));
        assert!(!is_text_in_list("", &[]));
    }

    #[test]
    fn test_substring_match() {
        let haystack = lines(&["ValidationError in property: \"service_name\""]);
        assert!(is_text_in_list("ValidationError", &haystack));
        assert!(is_text_in_list("service_name", &haystack));
        assert!(!is_text_in_list("ItemExistsError", &haystack));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let haystack = lines(&["ValidationError"]);
        assert!(!is_text_in_list("validationerror", &haystack));
    }

    #[test]
    fn test_require_text_in_list() {
        let haystack = lines(&["a", "b"]);
        assert!(require_text_in_list("b", &haystack, "stderr").is_ok());
        assert!(matches!(
            require_text_in_list("c", &haystack, "stderr"),
            Err(Error::Assertion(_))
        ));
    }

    #[test]
    fn test_expect_error_token_happy_path() {
        let result = CommandResult::new(
            vec![],
            lines(&["ItemExistsError    Item already exists in model: /software/services/x"]),
            1,
        );
        assert!(expect_error_token(&result, tokens::ITEM_EXISTS).is_ok());
    }

    #[test]
    fn test_expect_error_token_rejects_success() {
        let result = CommandResult::new(vec![], lines(&["ItemExistsError"]), 0);
        assert!(matches!(
            expect_error_token(&result, tokens::ITEM_EXISTS),
            Err(Error::ExpectedFailureMissing { .. })
        ));
    }

    #[test]
    fn test_expect_error_token_rejects_wrong_token() {
        let result = CommandResult::new(vec![], lines(&["SomethingElseEntirely"]), 1);
        assert!(matches!(
            expect_error_token(&result, tokens::VALIDATION),
            Err(Error::ExpectedFailureMissing { .. })
        ));
    }
}
