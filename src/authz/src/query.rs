//! Combined authorization queries
//!
//! A [`Query`] asks exactly one of three questions: does the subject hold a
//! role, a single permission, or a set of permissions (any or all of them).
//! [`QueryRequest`] is the loosely-typed shape produced by declarative
//! callers and documents, where every field is optional.

use crate::error::{AuthzError, Result};
use crate::evaluator::PolicyEvaluator;
use crate::types::{Permission, Policy, Role, Subject};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a permission set is combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// At least one permission must be granted
    #[default]
    Any,
    /// Every permission must be granted
    All,
}

/// A single authorization question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Subject holds this role
    Role(Role),

    /// Subject is granted this permission
    Permission(Permission),

    /// Subject is granted any/all of these permissions
    Permissions {
        /// Permissions to check
        permissions: Vec<Permission>,
        /// How the results are combined
        #[serde(default)]
        mode: MatchMode,
    },
}

impl Query {
    /// Ask whether the subject holds `role`
    pub fn role(role: impl Into<Role>) -> Self {
        Self::Role(role.into())
    }

    /// Ask whether the subject is granted `permission`
    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self::Permission(permission.into())
    }

    /// Granted if any of `permissions` is granted
    pub fn any_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::permissions(permissions, MatchMode::Any)
    }

    /// Granted if all of `permissions` are granted
    pub fn all_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::permissions(permissions, MatchMode::All)
    }

    /// Ask about a permission set combined with `mode`
    pub fn permissions<I, P>(permissions: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::Permissions {
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode,
        }
    }
}

/// Query with optional fields, as written by declarative callers
///
/// ```json
/// { "permissions": ["post:create", "post:update"], "match": "all" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Role to check; takes precedence over the other fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Single permission to check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,

    /// Permission set combined by `match_mode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,

    /// Combination mode for `permissions`; defaults to `any`
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
}

impl QueryRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role to check
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the single permission to check
    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Set the permission set and how it is combined
    pub fn with_permissions<I, P>(mut self, permissions: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self.match_mode = mode;
        self
    }
}

impl TryFrom<QueryRequest> for Query {
    type Error = AuthzError;

    /// Resolves role first, then single permission, then permission set
    fn try_from(request: QueryRequest) -> Result<Self> {
        if let Some(role) = request.role {
            return Ok(Query::Role(role));
        }

        if let Some(permission) = request.permission {
            return Ok(Query::Permission(permission));
        }

        if let Some(permissions) = request.permissions {
            return Ok(Query::Permissions {
                permissions,
                mode: request.match_mode,
            });
        }

        Err(AuthzError::InvalidQuery(
            "one of role, permission or permissions is required".to_string(),
        ))
    }
}

/// Evaluate a loosely-typed request; invalid requests are denied
pub fn evaluate_request(subject: &Subject, policy: &Policy, request: &QueryRequest) -> bool {
    match Query::try_from(request.clone()) {
        Ok(query) => PolicyEvaluator::new(subject, policy).evaluate(&query),
        Err(err) => {
            debug!(error = %err, "denying invalid query");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (Subject, Policy) {
        let subject = Subject::new().with_role("editor").with_permission("order:read");
        let policy = Policy::new().with_role("editor", ["post:*"]);
        (subject, policy)
    }

    #[test]
    fn test_resolution_order() {
        let request = QueryRequest::new()
            .with_role("admin")
            .with_permission("post:create")
            .with_permissions(["order:read"], MatchMode::Any);

        assert_eq!(Query::try_from(request).unwrap(), Query::role("admin"));

        let request = QueryRequest::new()
            .with_permission("post:create")
            .with_permissions(["order:read"], MatchMode::All);

        assert_eq!(
            Query::try_from(request).unwrap(),
            Query::permission("post:create")
        );
    }

    #[test]
    fn test_role_short_circuits_permission() {
        let (subject, policy) = fixture();

        // Role is checked alone even though the permission would be granted
        let request = QueryRequest::new()
            .with_role("admin")
            .with_permission("post:create");

        assert!(!evaluate_request(&subject, &policy, &request));
    }

    #[test]
    fn test_empty_request_is_denied() {
        let (subject, policy) = fixture();

        assert!(matches!(Query::try_from(QueryRequest::new()), Err(AuthzError::InvalidQuery(_))));
        assert!(!evaluate_request(&subject, &policy, &QueryRequest::new()));
    }

    #[test]
    fn test_match_mode_defaults_to_any() {
        let (subject, policy) = fixture();
        let request: QueryRequest =
            serde_json::from_str(r#"{"permissions": ["post:read", "user:ban"]}"#).unwrap();

        assert_eq!(request.match_mode, MatchMode::Any);
        assert!(evaluate_request(&subject, &policy, &request));
    }

    #[test]
    fn test_match_all_from_json() {
        let (subject, policy) = fixture();
        let request: QueryRequest = serde_json::from_str(
            r#"{"permissions": ["post:read", "order:read"], "match": "all"}"#,
        )
        .unwrap();

        assert_eq!(request.match_mode, MatchMode::All);
        assert!(evaluate_request(&subject, &policy, &request));

        let request = request.with_permissions(["post:read", "user:ban"], MatchMode::All);
        assert!(!evaluate_request(&subject, &policy, &request));
    }

    #[test]
    fn test_empty_permission_set_is_valid() {
        let (subject, policy) = fixture();

        let any = QueryRequest::new().with_permissions(Vec::<String>::new(), MatchMode::Any);
        let all = QueryRequest::new().with_permissions(Vec::<String>::new(), MatchMode::All);

        assert!(!evaluate_request(&subject, &policy, &any));
        assert!(evaluate_request(&subject, &policy, &all));
    }

    #[test]
    fn test_query_serialization() {
        let query = Query::all_of(["post:create", "post:update"]);
        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(json["permissions"]["mode"], "all");
        assert_eq!(serde_json::from_value::<Query>(json).unwrap(), query);
    }
}
