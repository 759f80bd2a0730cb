//! # RoleGuard Authorization Core
//!
//! Pure, synchronous authorization decisions over a subject and a policy.
//!
//! ## Features
//!
//! - **Role checks** by exact, case-sensitive role name
//! - **Permission checks** against direct grants and role-derived grants
//! - **Wildcard patterns**: `*` and `prefix:*`
//! - **Any/all combinators** over permission sets
//! - **Feature flags** by exact key lookup
//! - **Session carrier** publishing immutable snapshots for concurrent readers
//! - **Declarative guards** choosing between primary and fallback content
//!
//! ## Example
//!
//! ```rust
//! use roleguard_authz::{has_permission, Policy, Subject};
//!
//! let subject = Subject::new()
//!     .with_role("editor")
//!     .with_permission("order:read");
//!
//! let policy = Policy::new()
//!     .with_role("editor", ["post:create", "post:update", "post:delete"])
//!     .with_feature("beta-dashboard", true);
//!
//! assert!(has_permission(&subject, &policy, "post:create"));
//! assert!(has_permission(&subject, &policy, "order:read"));
//! assert!(!has_permission(&subject, &policy, "post:read"));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod guard;
pub mod pattern;
pub mod query;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::{PolicyIssue, PolicyLoader};
pub use error::{AuthzError, Result};
pub use evaluator::{
    explain_permission, has_all_permissions, has_any_permission, has_feature, has_permission,
    has_role, Grant, GrantSource, PolicyEvaluator,
};
pub use guard::{Guard, GuardCondition};
pub use pattern::{is_permission_granted, matches_permission, PermissionPattern};
pub use query::{evaluate_request, MatchMode, Query, QueryRequest};
pub use session::{SessionCarrier, SessionSnapshot};
pub use types::{Permission, Policy, Role, Subject};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
