//! Access control lists with write-time alias expansion
//!
//! An [`Acl`] maps `(role, target)` pairs to deduplicated action sets. Action
//! aliases expand eagerly while [`allow`](Acl::allow) stores a grant, so the
//! table only ever holds base actions; the alias name itself is never
//! grantable.
//!
//! # Example
//!
//! ```
//! use authgate::Acl;
//!
//! let mut acl = Acl::new();
//! acl.alias("manage", ["create", "read", "update", "delete"]);
//! acl.allow("Admin", "User", ["manage"]);
//!
//! let permissions = acl.permissions_for("admin");
//! assert!(permissions["user"].contains("update"));
//! assert!(!permissions["user"].contains("manage"));
//! ```

mod aliases;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{PermissionMap, Role};

use aliases::AliasTable;

/// Source of role permissions a [`Manager`](crate::manager::Manager) can
/// compose
///
/// Implementations report lowercase roles and targets. [`Acl`] is the bundled
/// in-memory implementation.
pub trait AccessControl: Send + Sync {
    /// Every role with at least one grant
    fn roles(&self) -> Vec<Role>;

    /// The `target -> action set` map for a role; empty for unknown roles
    fn permissions_for(&self, role: &str) -> PermissionMap;
}

/// In-memory access control list with action aliases
#[derive(Debug, Clone, Default)]
pub struct Acl {
    aliases: AliasTable,
    grants: HashMap<Role, PermissionMap>,
}

impl Acl {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a populated list from deserialized settings
    ///
    /// Every alias is defined before any grant is stored, so grant lists may
    /// reference aliases regardless of map order.
    pub fn from_config(config: AclConfig) -> Self {
        let mut acl = Acl::new();

        for (name, actions) in config.aliases {
            acl.alias(&name, actions);
        }

        for (role, targets) in config.grants {
            for (target, actions) in targets {
                acl.allow(&role, &target, actions);
            }
        }

        acl
    }

    /// Register or overwrite the expansion list for an alias
    pub fn alias<I, S>(&mut self, name: &str, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.define(name, actions);
    }

    /// Grant actions to a role on a target
    ///
    /// Role and target are lowercased; actions resolve through the alias
    /// table and union into the existing entry, so repeated overlapping calls
    /// are idempotent.
    pub fn allow<I, S>(&mut self, role: &str, target: &str, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resolved = self.aliases.resolve(actions);

        debug!(
            "allowing {} action(s) for role {:?} on target {:?}",
            resolved.len(),
            role,
            target
        );

        self.grants
            .entry(role.to_lowercase())
            .or_default()
            .entry(target.to_lowercase())
            .or_default()
            .extend(resolved);
    }

    /// The `target -> action set` map for a role
    ///
    /// Lookup is case-insensitive; unknown roles yield an empty map. The
    /// returned map is a copy and carries no aliasing state.
    pub fn permissions_for(&self, role: &str) -> PermissionMap {
        self.grants
            .get(&role.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Every role with at least one grant, in no particular order
    pub fn roles(&self) -> Vec<Role> {
        self.grants.keys().cloned().collect()
    }
}

impl AccessControl for Acl {
    fn roles(&self) -> Vec<Role> {
        Acl::roles(self)
    }

    fn permissions_for(&self, role: &str) -> PermissionMap {
        Acl::permissions_for(self, role)
    }
}

/// Deserializable ACL settings
///
/// ```
/// use authgate::{Acl, AclConfig};
///
/// let config: AclConfig = serde_json::from_str(
///     r#"{
///         "aliases": {"manage": ["create", "read", "update", "delete"]},
///         "grants": {"admin": {"user": ["manage"]}}
///     }"#,
/// ).unwrap();
///
/// let acl = Acl::from_config(config);
/// assert!(acl.permissions_for("admin")["user"].contains("delete"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    /// Alias expansions, defined before any grant is applied
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,

    /// Grant lists keyed by role, then target
    #[serde(default)]
    pub grants: HashMap<String, HashMap<String, Vec<String>>>,
}
