//! Policy evaluation
//!
//! Stateless decisions over an explicit `(Subject, Policy)` pair.
//!
//! `has_permission` resolves in a fixed precedence order and stops at the
//! first match:
//!
//! ```text
//! 1. permission ∈ subject.permissions          → Direct
//! 2. "*" ∈ subject.permissions                 → DirectWildcard
//! 3. ∃ role ∈ subject.roles,
//!      ∃ pattern ∈ policy.roles[role] matching → Role { role, pattern }
//! 4. otherwise                                 → denied
//! ```
//!
//! Every operation is total: missing roles, undefined role mappings and
//! unknown features all resolve to `false`.

pub mod grant;


pub use grant::{Grant, GrantSource};

use crate::pattern::matches_permission;
use crate::query::{MatchMode, Query};
use crate::types::{Policy, Subject};
use tracing::trace;

/// Literal permission granting everything when held directly
const WILDCARD: &str = "*";

/// Check whether the subject holds `role`. Independent of any policy.
pub fn has_role(subject: &Subject, role: &str) -> bool {
    subject.roles.contains(role)
}

/// Explain which rule grants `permission`, or `None` when nothing does
///
/// Roles are visited in sorted order, so the reported grant is stable for
/// identical inputs.
pub fn explain_permission(subject: &Subject, policy: &Policy, permission: &str) -> Option<Grant> {
    if subject.permissions.contains(permission) {
        return Some(Grant::new(permission, GrantSource::Direct));
    }

    if subject.permissions.contains(WILDCARD) {
        return Some(Grant::new(permission, GrantSource::DirectWildcard));
    }

    for role in &subject.roles {
        // Roles absent from the policy contribute no grants
        let Some(patterns) = policy.grants_for(role) else {
            continue;
        };

        if let Some(pattern) = patterns
            .iter()
            .find(|pattern| matches_permission(permission, pattern))
        {
            return Some(Grant::new(
                permission,
                GrantSource::Role {
                    role: role.clone(),
                    pattern: pattern.clone(),
                },
            ));
        }
    }

    None
}

/// Check whether the subject is granted `permission` under `policy`
pub fn has_permission(subject: &Subject, policy: &Policy, permission: &str) -> bool {
    match explain_permission(subject, policy, permission) {
        Some(grant) => {
            trace!(permission, source = %grant.source, "permission granted");
            true
        }
        None => {
            trace!(permission, "permission denied");
            false
        }
    }
}

/// True iff at least one permission is granted; `false` for an empty list
pub fn has_any_permission<S: AsRef<str>>(
    subject: &Subject,
    policy: &Policy,
    permissions: &[S],
) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(subject, policy, permission.as_ref()))
}

/// True iff every permission is granted; `true` for an empty list
pub fn has_all_permissions<S: AsRef<str>>(
    subject: &Subject,
    policy: &Policy,
    permissions: &[S],
) -> bool {
    permissions
        .iter()
        .all(|permission| has_permission(subject, policy, permission.as_ref()))
}

/// Look up a feature flag; unknown features are disabled
pub fn has_feature(policy: &Policy, feature: &str) -> bool {
    policy.features.get(feature).copied().unwrap_or(false)
}

/// Evaluator bound to one subject/policy pair
///
/// Borrowing both values guarantees that every check made through one
/// evaluator observes the same snapshot.
///
/// # Example
///
/// ```
/// use roleguard_authz::{Policy, PolicyEvaluator, Query, Subject};
///
/// let subject = Subject::new().with_role("editor");
/// let policy = Policy::new().with_role("editor", ["post:*"]);
/// let evaluator = PolicyEvaluator::new(&subject, &policy);
///
/// assert!(evaluator.has_permission("post:delete"));
/// assert!(evaluator.evaluate(&Query::all_of(["post:create", "post:update"])));
/// assert!(!evaluator.has_permission("comment:delete"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator<'a> {
    subject: &'a Subject,
    policy: &'a Policy,
}

impl<'a> PolicyEvaluator<'a> {
    /// Bind an evaluator to a subject and policy
    pub fn new(subject: &'a Subject, policy: &'a Policy) -> Self {
        Self { subject, policy }
    }

    /// Subject under evaluation
    pub fn subject(&self) -> &'a Subject {
        self.subject
    }

    /// Policy under evaluation
    pub fn policy(&self) -> &'a Policy {
        self.policy
    }

    /// Check whether the bound subject holds `role`
    pub fn has_role(&self, role: &str) -> bool {
        has_role(self.subject, role)
    }

    /// Check a single permission against the bound pair
    pub fn has_permission(&self, permission: &str) -> bool {
        has_permission(self.subject, self.policy, permission)
    }

    /// Explain which rule grants `permission`
    pub fn explain_permission(&self, permission: &str) -> Option<Grant> {
        explain_permission(self.subject, self.policy, permission)
    }

    /// True iff any of `permissions` is granted
    pub fn has_any_permission<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        has_any_permission(self.subject, self.policy, permissions)
    }

    /// True iff all of `permissions` are granted
    pub fn has_all_permissions<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        has_all_permissions(self.subject, self.policy, permissions)
    }

    /// Look up a feature flag in the bound policy
    pub fn has_feature(&self, feature: &str) -> bool {
        has_feature(self.policy, feature)
    }

    /// Answer a combined query
    pub fn evaluate(&self, query: &Query) -> bool {
        match query {
            Query::Role(role) => self.has_role(role),
            Query::Permission(permission) => self.has_permission(permission),
            Query::Permissions { permissions, mode } => match mode {
                MatchMode::Any => self.has_any_permission(permissions),
                MatchMode::All => self.has_all_permissions(permissions),
            },
        }
    }
}
