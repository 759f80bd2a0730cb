//! Session carrier
//!
//! Holds the current subject and policy for an application session and hands
//! out immutable snapshots. Replacing either value publishes a new snapshot;
//! an evaluation holding an older snapshot keeps seeing that one.
//!
//! ```
//! use roleguard_authz::{Policy, SessionCarrier, Subject};
//!
//! let carrier = SessionCarrier::new(
//!     Some(Subject::new().with_role("editor")),
//!     Policy::new().with_role("editor", ["post:*"]),
//! );
//!
//! let snapshot = carrier.snapshot()?;
//! carrier.replace_subject(None);
//!
//! assert!(snapshot.has_permission("post:create"));
//! assert!(!carrier.snapshot()?.has_permission("post:create"));
//! # Ok::<(), roleguard_authz::AuthzError>(())
//! ```

use crate::error::{AuthzError, Result};
use crate::evaluator::PolicyEvaluator;
use crate::query::Query;
use crate::types::{Policy, Subject};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Subject used for snapshots without a signed-in subject
static ANONYMOUS: Subject = Subject {
    roles: BTreeSet::new(),
    permissions: BTreeSet::new(),
};

/// Immutable subject/policy pair observed by one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    subject: Option<Subject>,
    policy: Policy,
}

impl SessionSnapshot {
    /// Create a snapshot from a subject and policy
    pub fn new(subject: Option<Subject>, policy: Policy) -> Self {
        Self { subject, policy }
    }

    /// Current subject; `None` when no one is signed in
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Policy in effect for this snapshot
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Evaluator over this snapshot. A missing subject is granted nothing.
    pub fn evaluator(&self) -> PolicyEvaluator<'_> {
        PolicyEvaluator::new(self.subject.as_ref().unwrap_or(&ANONYMOUS), &self.policy)
    }

    /// Check whether the current subject holds `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.evaluator().has_role(role)
    }

    /// Check a single permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.evaluator().has_permission(permission)
    }

    /// True iff any of `permissions` is granted
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.evaluator().has_any_permission(permissions)
    }

    /// True iff all of `permissions` are granted
    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        self.evaluator().has_all_permissions(permissions)
    }

    /// Look up a feature flag
    pub fn has_feature(&self, feature: &str) -> bool {
        self.evaluator().has_feature(feature)
    }

    /// Answer a combined query against this snapshot
    pub fn can(&self, query: &Query) -> bool {
        self.evaluator().evaluate(query)
    }
}

/// Explicitly constructed holder of the current session snapshot
///
/// Shared by reference or `Arc` down the call chain; there is no global
/// instance.
#[derive(Debug, Default)]
pub struct SessionCarrier {
    current: RwLock<Option<Arc<SessionSnapshot>>>,
}

impl SessionCarrier {
    /// Create a carrier holding an initial subject and policy
    pub fn new(subject: Option<Subject>, policy: Policy) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(SessionSnapshot::new(subject, policy)))),
        }
    }

    /// Create a carrier with no session yet; every read fails until [`replace`](Self::replace)
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Whether a session has been published
    pub fn is_initialized(&self) -> bool {
        self.current.read().is_some()
    }

    /// Current snapshot
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::SessionNotInitialized`] if no session was published.
    pub fn snapshot(&self) -> Result<Arc<SessionSnapshot>> {
        self.current
            .read()
            .as_ref()
            .cloned()
            .ok_or(AuthzError::SessionNotInitialized)
    }

    /// Subject of the current snapshot
    pub fn current_subject(&self) -> Result<Option<Subject>> {
        Ok(self.snapshot()?.subject().cloned())
    }

    /// Policy of the current snapshot
    pub fn current_policy(&self) -> Result<Policy> {
        Ok(self.snapshot()?.policy().clone())
    }

    /// Publish a new subject and policy together
    pub fn replace(&self, subject: Option<Subject>, policy: Policy) {
        let snapshot = Arc::new(SessionSnapshot::new(subject, policy));
        *self.current.write() = Some(snapshot);
        debug!("session replaced");
    }

    /// Publish a new subject, keeping the current policy (empty if uninitialized)
    pub fn replace_subject(&self, subject: Option<Subject>) {
        let mut current = self.current.write();
        let policy = current
            .as_ref()
            .map(|snapshot| snapshot.policy.clone())
            .unwrap_or_default();
        *current = Some(Arc::new(SessionSnapshot::new(subject, policy)));
        debug!("session subject replaced");
    }

    /// Publish a new policy, keeping the current subject
    pub fn replace_policy(&self, policy: Policy) {
        let mut current = self.current.write();
        let subject = current.as_ref().and_then(|snapshot| snapshot.subject.clone());
        *current = Some(Arc::new(SessionSnapshot::new(subject, policy)));
        debug!("session policy replaced");
    }

    /// Drop the current session; later reads fail until a new one is published
    pub fn clear(&self) {
        *self.current.write() = None;
        debug!("session cleared");
    }
}
