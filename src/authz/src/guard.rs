//! Declarative guards
//!
//! A guard pairs a condition with a choice between primary and fallback
//! content. It only asks the evaluator; pattern and role semantics stay there.
//!
//! ```
//! use roleguard_authz::{Guard, Policy, SessionCarrier, Subject};
//!
//! let carrier = SessionCarrier::new(
//!     Some(Subject::new().with_role("editor")),
//!     Policy::new().with_role("editor", ["post:*"]),
//! );
//!
//! let button = Guard::permission("post:delete")
//!     .render(&carrier, || "Delete", || Some("Read only"))?;
//! assert_eq!(button, Some("Delete"));
//!
//! let admin_panel = Guard::role("admin").render(&carrier, || "Admin", || None)?;
//! assert_eq!(admin_panel, None);
//! # Ok::<(), roleguard_authz::AuthzError>(())
//! ```

use crate::error::Result;
use crate::query::{Query, QueryRequest};
use crate::session::{SessionCarrier, SessionSnapshot};
use crate::types::{Permission, Role};

/// What a guard checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardCondition {
    /// Role, permission or permission-set query
    Query(Query),
    /// Feature flag by exact name
    Feature(String),
}

/// Chooses between primary and fallback content based on one condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    condition: GuardCondition,
}

impl Guard {
    /// Create a guard for `condition`
    pub fn new(condition: GuardCondition) -> Self {
        Self { condition }
    }

    /// Guard on a combined query
    pub fn query(query: Query) -> Self {
        Self::new(GuardCondition::Query(query))
    }

    /// Guard on a role
    pub fn role(role: impl Into<Role>) -> Self {
        Self::query(Query::role(role))
    }

    /// Guard on a single permission
    pub fn permission(permission: impl Into<Permission>) -> Self {
        Self::query(Query::permission(permission))
    }

    /// Guard on any of `permissions`
    pub fn any_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::query(Query::any_of(permissions))
    }

    /// Guard on all of `permissions`
    pub fn all_of<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Self::query(Query::all_of(permissions))
    }

    /// Guard on a feature flag
    pub fn feature(name: impl Into<String>) -> Self {
        Self::new(GuardCondition::Feature(name.into()))
    }

    /// Build a guard from a loosely-typed request
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthzError::InvalidQuery`] when the request names no question.
    pub fn from_request(request: QueryRequest) -> Result<Self> {
        Ok(Self::query(Query::try_from(request)?))
    }

    /// Condition checked by this guard
    pub fn condition(&self) -> &GuardCondition {
        &self.condition
    }

    /// Whether the condition holds for `snapshot`
    pub fn allows(&self, snapshot: &SessionSnapshot) -> bool {
        match &self.condition {
            GuardCondition::Query(query) => snapshot.can(query),
            GuardCondition::Feature(name) => snapshot.has_feature(name),
        }
    }

    /// `primary` when allowed, otherwise `fallback` (nothing by default)
    pub fn select<T>(
        &self,
        snapshot: &SessionSnapshot,
        primary: T,
        fallback: Option<T>,
    ) -> Option<T> {
        if self.allows(snapshot) {
            Some(primary)
        } else {
            fallback
        }
    }

    /// Resolve against the carrier's current snapshot, building only the chosen branch
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthzError::SessionNotInitialized`] when the carrier is empty.
    pub fn render<T, P, F>(
        &self,
        carrier: &SessionCarrier,
        primary: P,
        fallback: F,
    ) -> Result<Option<T>>
    where
        P: FnOnce() -> T,
        F: FnOnce() -> Option<T>,
    {
        let snapshot = carrier.snapshot()?;
        if self.allows(&snapshot) {
            Ok(Some(primary()))
        } else {
            Ok(fallback())
        }
    }
}

impl From<Query> for Guard {
    fn from(query: Query) -> Self {
        Self::query(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthzError;
    use crate::query::MatchMode;
    use crate::types::{Policy, Subject};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot::new(
            Some(
                Subject::new()
                    .with_role("editor")
                    .with_permission("order:read"),
            ),
            Policy::new()
                .with_role("editor", ["post:create", "post:update"])
                .with_feature("beta", true)
                .with_feature("legacy", false),
        )
    }

    #[test]
    fn test_select_primary_and_fallback() {
        let snapshot = snapshot();

        let editor = Guard::role("editor");
        let admin = Guard::role("admin");

        assert_eq!(editor.select(&snapshot, "yes", Some("no")), Some("yes"));
        assert_eq!(admin.select(&snapshot, "yes", Some("no")), Some("no"));
        assert_eq!(admin.select(&snapshot, "yes", None), None);
    }

    #[test]
    fn test_permission_set_guards() {
        let snapshot = snapshot();

        let any_edit = Guard::any_of(["post:delete", "order:read"]);
        let all_edit = Guard::all_of(["post:delete", "order:read"]);
        let all_granted = Guard::all_of(["post:create", "order:read"]);

        assert!(any_edit.allows(&snapshot));
        assert!(!all_edit.allows(&snapshot));
        assert!(all_granted.allows(&snapshot));
    }

    #[test]
    fn test_feature_guard() {
        let snapshot = snapshot();

        assert!(Guard::feature("beta").allows(&snapshot));
        assert!(!Guard::feature("legacy").allows(&snapshot));
        assert!(!Guard::feature("missing").allows(&snapshot));
    }

    #[test]
    fn test_guard_from_request() {
        let request = QueryRequest::new().with_permissions(["post:update"], MatchMode::All);
        let guard = Guard::from_request(request).unwrap();

        assert!(guard.allows(&snapshot()));
        assert!(matches!(
            Guard::from_request(QueryRequest::new()),
            Err(AuthzError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_render_only_builds_chosen_branch() {
        let carrier = SessionCarrier::new(Some(Subject::new().with_role("viewer")), Policy::new());

        let rendered = Guard::permission("post:create")
            .render(
                &carrier,
                || panic!("primary must not be built"),
                || Some("fallback"),
            )
            .unwrap();

        assert_eq!(rendered, Some("fallback"));
    }

    #[test]
    fn test_render_requires_session() {
        let carrier = SessionCarrier::uninitialized();
        let result = Guard::feature("beta").render(&carrier, || 1, || None);

        assert!(matches!(result, Err(AuthzError::SessionNotInitialized)));
    }
}
