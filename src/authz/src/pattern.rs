//! Permission pattern matching
//!
//! A permission pattern is one of:
//! - `*` - matches every permission
//! - `prefix:*` - matches any permission starting with `prefix:`
//! - anything else - matches only itself, exactly
//!
//! # Examples
//!
//! ```
//! use roleguard_authz::pattern::{matches_permission, PermissionPattern};
//!
//! assert!(matches_permission("post:delete", "post:*"));
//! assert!(!matches_permission("comment:delete", "post:*"));
//!
//! let pattern = PermissionPattern::parse("*");
//! assert!(pattern.matches("anything:at:all"));
//! ```

use std::fmt;

/// Parsed form of a permission pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionPattern {
    /// `*`
    Any,
    /// `prefix:*`; holds the prefix including the trailing colon
    Prefix(String),
    /// Literal permission
    Exact(String),
}

impl PermissionPattern {
    /// Parse a pattern string. Total: every string is a valid pattern.
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Self::Any
        } else if let Some(prefix) = prefix_of(pattern) {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(pattern.to_string())
        }
    }

    /// Check whether `permission` is covered by this pattern
    pub fn matches(&self, permission: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Prefix(prefix) => permission.starts_with(prefix.as_str()),
            Self::Exact(literal) => permission == literal,
        }
    }

    /// Whether this pattern matches more than one permission
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, Self::Exact(_))
    }

    /// Reports strings that contain `*` without being one of the wildcard forms.
    ///
    /// `post*`, `*:read` and `a:*:b` are all matched literally, which is
    /// rarely what a policy author meant.
    pub fn is_suspicious(pattern: &str) -> bool {
        pattern.contains('*')
            && pattern != "*"
            && prefix_of(pattern).map_or(true, |p| p.contains('*'))
    }
}

impl fmt::Display for PermissionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Prefix(prefix) => write!(f, "{}*", prefix),
            Self::Exact(literal) => write!(f, "{}", literal),
        }
    }
}

/// `Some("post:")` for `"post:*"`, `None` when the pattern is not a prefix wildcard
fn prefix_of(pattern: &str) -> Option<&str> {
    if pattern.ends_with(":*") {
        Some(&pattern[..pattern.len() - 1])
    } else {
        None
    }
}

/// Match a permission against a single pattern
pub fn matches_permission(permission: &str, pattern: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    if let Some(prefix) = prefix_of(pattern) {
        return permission.starts_with(prefix);
    }

    permission == pattern
}

/// Check whether any of `patterns` grants `permission`
pub fn is_permission_granted<S: AsRef<str>>(permission: &str, patterns: &[S]) -> bool {
    patterns
        .iter()
        .any(|pattern| matches_permission(permission, pattern.as_ref()))
}
