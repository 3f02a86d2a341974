//! Hierarchical model item identifiers

use std::fmt;

/// A hierarchical path into the orchestrator's configuration model
///
/// Paths like `/software/services/vsftpd` are owned entirely by the caller;
/// the harness performs no structural validation. The orchestrator itself
/// rejects invalid locations, and that rejection is part of what the
/// acceptance scenarios observe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelItemPath(String);

impl ModelItemPath {
    /// Create a path from its string form
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a child segment, inserting a separator as needed
    pub fn join(&self, segment: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        let segment = segment.trim_start_matches('/');
        Self(format!("{base}/{segment}"))
    }

    /// The parent path, if this path has one
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.0.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        if idx == 0 {
            if trimmed.len() > 1 {
                return Some(Self("/".to_string()));
            }
            return None;
        }
        Some(Self(trimmed[..idx].to_string()))
    }
}

impl fmt::Display for ModelItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelItemPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ModelItemPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        let base = ModelItemPath::new("/software/services");
        assert_eq!(base.join("vsftpd").as_str(), "/software/services/vsftpd");
        assert_eq!(base.join("/vsftpd").as_str(), "/software/services/vsftpd");
    }

    #[test]
    fn test_parent() {
        let path = ModelItemPath::new("/software/services/vsftpd");
        assert_eq!(path.parent().unwrap().as_str(), "/software/services");
        assert_eq!(ModelItemPath::new("/software").parent().unwrap().as_str(), "/");
        assert!(ModelItemPath::new("/").parent().is_none());
    }

    #[test]
    fn test_no_validation() {
        // Anything goes; the orchestrator is the judge.
        let odd = ModelItemPath::new("not-even-absolute");
        assert_eq!(odd.as_str(), "not-even-absolute");
    }
}
