//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Role identifier, matched exactly and case-sensitively
pub type Role = String;

/// Permission identifier, conventionally `resource:action`
pub type Permission = String;

/// The entity whose access is being decided
///
/// Missing `roles` or `permissions` in a document deserialize as empty sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Roles held by the subject
    #[serde(default)]
    pub roles: BTreeSet<Role>,

    /// Permissions granted directly (may include the literal `*`)
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl Subject {
    /// Create a subject with no roles and no permissions
    pub fn new() -> Self {
        Self::default()
    }

    /// Subject used when no one is signed in; granted nothing
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Add a role to the subject
    pub fn with_role(mut self, role: impl Into<Role>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add several roles to the subject
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Add a direct permission to the subject
    pub fn with_permission(mut self, permission: impl Into<Permission>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Add several direct permissions to the subject
    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions.extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Whether the subject holds neither roles nor permissions
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }
}

/// Role-to-permission mapping plus feature flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Permission patterns granted to holders of each role
    #[serde(default)]
    pub roles: HashMap<Role, Vec<Permission>>,

    /// Feature name to enabled flag
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

impl Policy {
    /// Create an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a role to its granted permission patterns, replacing any previous entry
    pub fn with_role<I, P>(mut self, role: impl Into<Role>, grants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.roles
            .insert(role.into(), grants.into_iter().map(Into::into).collect());
        self
    }

    /// Set a feature flag
    pub fn with_feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    /// Permission patterns granted to `role`, if the role is defined
    pub fn grants_for(&self, role: &str) -> Option<&[Permission]> {
        self.roles.get(role).map(Vec::as_slice)
    }
}
