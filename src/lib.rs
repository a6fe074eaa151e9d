//! Role-based authorization with composable access control lists and path
//! gating
//!
//! Three cooperating pieces decide what an entity may do:
//!
//! - **[`Acl`]**: `(role, target) -> action set` storage with write-time
//!   action-alias expansion
//! - **[`Manager`]**: flattens every registered ACL for the current entity's
//!   roles, overlays the entity's own permissions, and runs the
//!   override/service/self-check decision pipeline
//! - **[`Guard`]**: ordered accept/reject path rules with `!` negation and a
//!   tri-state outcome
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use authgate::{Acl, Manager, StaticEntity};
//!
//! let mut acl = Acl::new();
//! acl.alias("manage", ["create", "read", "update", "delete"]);
//! acl.allow("admin", "user", ["manage"]);
//!
//! let mut manager = Manager::new();
//! manager.add(Arc::new(acl));
//! manager.set_entity(Arc::new(StaticEntity::new(["admin"])));
//!
//! assert!(manager.can("read", "user"));
//! assert!(manager.is("admin"));
//!
//! // Aliases expand at write time; the alias name itself is not a grant
//! assert!(!manager.can("manage", "user"));
//! ```
//!
//! ACL and Guard state is additive and meant to be populated at startup,
//! then shared read-only. A [`Manager`] carries per-entity derived state, so
//! multi-request servers hand each request its own instance.

pub mod acl;
pub mod context;
pub mod error;
pub mod guard;
pub mod manager;
pub mod types;

pub use acl::{AccessControl, Acl, AclConfig};
pub use context::{Context, ResourceContext, SelfAuthorizing};
pub use error::{AuthError, Result};
pub use guard::{DefaultRule, Guard, GuardConfig};
pub use manager::{Manager, OverrideFn, ServiceFn};
pub use types::{Access, Action, Entity, PermissionMap, Role, StaticEntity, Target};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
