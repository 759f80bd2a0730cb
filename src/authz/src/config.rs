//! Loading subject and policy documents
//!
//! Documents are JSON with the same shape as [`Policy`] and [`Subject`]:
//!
//! ```json
//! {
//!   "roles": { "admin": ["*"], "editor": ["post:*", "comment:moderate"] },
//!   "features": { "beta-dashboard": true }
//! }
//! ```

use crate::error::{AuthzError, Result};
use crate::pattern::PermissionPattern;
use crate::types::{Policy, Subject};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Something in a policy that is legal but probably a mistake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyIssue {
    /// A role is mapped under the empty name
    EmptyRoleName,
    /// A feature is declared under the empty name
    EmptyFeatureName,
    /// Pattern contains `*` but is neither `*` nor `prefix:*`, so it only matches itself
    LiteralWildcard {
        /// Role whose mapping holds the pattern
        role: String,
        /// Offending pattern
        pattern: String,
    },
}

impl fmt::Display for PolicyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoleName => write!(f, "role name cannot be empty"),
            Self::EmptyFeatureName => write!(f, "feature name cannot be empty"),
            Self::LiteralWildcard { role, pattern } => write!(
                f,
                "role '{}' pattern '{}' is matched literally; use '*' or 'prefix:*'",
                role, pattern
            ),
        }
    }
}

impl Policy {
    /// List suspicious entries. Issues are sorted so the output is stable.
    pub fn validate(&self) -> Vec<PolicyIssue> {
        let mut issues = Vec::new();

        let mut roles: Vec<_> = self.roles.iter().collect();
        roles.sort_by(|a, b| a.0.cmp(b.0));

        for (role, patterns) in roles {
            if role.is_empty() {
                issues.push(PolicyIssue::EmptyRoleName);
            }

            for pattern in patterns {
                if PermissionPattern::is_suspicious(pattern) {
                    issues.push(PolicyIssue::LiteralWildcard {
                        role: role.clone(),
                        pattern: pattern.clone(),
                    });
                }
            }
        }

        if self.features.contains_key("") {
            issues.push(PolicyIssue::EmptyFeatureName);
        }

        issues
    }
}

/// Reads policy and subject documents
///
/// In the default lenient mode every [`PolicyIssue`] is logged and the policy
/// is kept. Strict mode rejects a policy with any issue.
#[derive(Debug, Clone, Default)]
pub struct PolicyLoader {
    /// Reject policies that have validation issues
    pub strict: bool,
}

impl PolicyLoader {
    /// Create a lenient loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that rejects policies with issues
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parse a policy from a JSON string
    pub fn load_str(&self, json: &str) -> Result<Policy> {
        let policy: Policy = serde_json::from_str(json)?;
        self.check(&policy)?;

        debug!(
            roles = policy.roles.len(),
            features = policy.features.len(),
            "policy loaded"
        );
        Ok(policy)
    }

    /// Read and parse a policy file
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Policy> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "reading policy");
        self.load_str(&json)
    }

    /// Parse a subject from a JSON string
    pub fn load_subject_str(&self, json: &str) -> Result<Subject> {
        let subject: Subject = serde_json::from_str(json)?;
        debug!(
            roles = subject.roles.len(),
            permissions = subject.permissions.len(),
            "subject loaded"
        );
        Ok(subject)
    }

    fn check(&self, policy: &Policy) -> Result<()> {
        let issues = policy.validate();

        if self.strict {
            if let Some(issue) = issues.first() {
                return Err(AuthzError::InvalidPolicy(issue.to_string()));
            }
        }

        for issue in &issues {
            warn!(%issue, "policy issue");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const POLICY: &str = r#"{
        "roles": {
            "admin": ["*"],
            "editor": ["post:*", "comment:moderate"]
        },
        "features": { "beta-dashboard": true, "legacy-export": false }
    }"#;

    #[test]
    fn test_load_policy() {
        let policy = PolicyLoader::new().load_str(POLICY).unwrap();

        assert_eq!(policy.roles.len(), 2);
        assert_eq!(policy.grants_for("admin"), Some(&["*".to_string()][..]));
        assert_eq!(policy.features.get("legacy-export"), Some(&false));
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn test_load_empty_policy() {
        let policy = PolicyLoader::new().load_str("{}").unwrap();
        assert_eq!(policy, Policy::default());
    }

    #[test]
    fn test_malformed_json() {
        let result = PolicyLoader::new().load_str(r#"{"roles": ["admin"]}"#);
        assert!(matches!(result, Err(AuthzError::Json(_))));
    }

    #[test]
    fn test_validate_reports_issues() {
        let policy = Policy::new()
            .with_role("", ["post:read"])
            .with_role("editor", ["post*", "*:read", "post:*"])
            .with_feature("", true);

        let issues = policy.validate();
        assert_eq!(
            issues,
            vec![
                PolicyIssue::EmptyRoleName,
                PolicyIssue::LiteralWildcard {
                    role: "editor".to_string(),
                    pattern: "post*".to_string(),
                },
                PolicyIssue::LiteralWildcard {
                    role: "editor".to_string(),
                    pattern: "*:read".to_string(),
                },
                PolicyIssue::EmptyFeatureName,
            ]
        );
    }

    #[test]
    fn test_lenient_keeps_suspicious_policy() {
        let json = r#"{"roles": {"editor": ["post*"]}}"#;
        let policy = PolicyLoader::new().load_str(json).unwrap();
        let grants = policy.grants_for("editor");
        assert_eq!(grants, Some(&["post*".to_string()][..]));
    }

    #[test]
    fn test_strict_rejects_suspicious_policy() {
        let json = r#"{"roles": {"editor": ["post*"]}}"#;
        let result = PolicyLoader::strict().load_str(json);

        match result {
            Err(AuthzError::InvalidPolicy(msg)) => assert!(msg.contains("post*")),
            other => panic!("expected InvalidPolicy, got {:?}", other),
        }
    }

    #[test]
    fn test_load_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(POLICY.as_bytes()).unwrap();

        let policy = PolicyLoader::new().load_path(file.path()).unwrap();
        assert!(policy.features["beta-dashboard"]);
    }

    #[test]
    fn test_load_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = PolicyLoader::new().load_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(AuthzError::Io(_))));
    }

    #[test]
    fn test_load_subject() {
        let loader = PolicyLoader::new();

        let subject = loader
            .load_subject_str(r#"{"roles": ["editor"], "permissions": ["order:read"]}"#)
            .unwrap();
        assert!(subject.roles.contains("editor"));
        assert!(subject.permissions.contains("order:read"));

        let subject = loader.load_subject_str("{}").unwrap();
        assert!(subject.is_empty());
    }
}
