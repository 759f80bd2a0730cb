//! Grant explanations returned by the evaluator

use crate::types::{Permission, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A permission grant together with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Permission that was requested
    pub permission: Permission,

    /// Rule that granted it
    pub source: GrantSource,
}

impl Grant {
    /// Create a grant
    pub fn new(permission: impl Into<Permission>, source: GrantSource) -> Self {
        Self {
            permission: permission.into(),
            source,
        }
    }
}

/// Which precedence step granted a permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GrantSource {
    /// Permission held directly by the subject
    Direct,

    /// Subject holds the literal `*` permission
    DirectWildcard,

    /// A role of the subject maps to a matching pattern
    Role {
        /// Role that carries the grant
        role: Role,
        /// Pattern in the role mapping that matched
        pattern: Permission,
    },
}

impl fmt::Display for GrantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct grant"),
            Self::DirectWildcard => write!(f, "direct wildcard grant"),
            Self::Role { role, pattern } => write!(f, "role '{}' via '{}'", role, pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_source_display() {
        assert_eq!(GrantSource::Direct.to_string(), "direct grant");
        let source = GrantSource::Role {
            role: "editor".to_string(),
            pattern: "post:*".to_string(),
        };
        assert_eq!(source.to_string(), "role 'editor' via 'post:*'");
    }

    #[test]
    fn test_grant_serialization() {
        let grant = Grant::new(
            "post:create",
            GrantSource::Role {
                role: "editor".to_string(),
                pattern: "post:*".to_string(),
            },
        );

        let json = serde_json::to_value(&grant).unwrap();
        assert_eq!(json["source"]["type"], "role");
        assert_eq!(json["source"]["role"], "editor");

        let back: Grant = serde_json::from_value(json).unwrap();
        assert_eq!(back, grant);
    }
}
