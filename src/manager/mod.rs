//! Authorization manager composing ACLs, entities, and custom checks
//!
//! A [`Manager`] flattens the grants of every registered
//! [`AccessControl`](crate::acl::AccessControl) for the roles of the current
//! entity into a single permission table, overlays the entity's own
//! authoritative permissions, and answers `can`/`has`/`is` queries. The
//! [`can`](Manager::can) pipeline additionally consults registered override
//! and service callbacks and the context value's self-check capability before
//! falling back to the table.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use authgate::{Acl, Manager, StaticEntity};
//!
//! let mut acl = Acl::new();
//! acl.allow("editor", "article", ["read", "update"]);
//!
//! let mut manager = Manager::new();
//! manager.add(Arc::new(acl));
//! manager.set_entity(Arc::new(StaticEntity::new(["editor"])));
//!
//! assert!(manager.can("update", "article"));
//! assert!(manager.is("Editor"));
//! assert!(!manager.can("delete", "article"));
//! ```

mod hooks;


pub use hooks::{OverrideFn, ServiceFn};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::acl::AccessControl;
use crate::context::Context;
use crate::types::{Access, Action, Entity, PermissionMap, Role, Target};

use hooks::{Hooks, WILDCARD};

/// Composes access control lists and entity state into authorization
/// decisions
///
/// The permission table is derived state: it is rebuilt whenever the entity
/// changes and extended whenever an ACL is added afterwards. A manager with
/// no entity behaves as if the role set were empty.
pub struct Manager {
    acls: Vec<Arc<dyn AccessControl>>,
    entity: Option<Arc<dyn Entity>>,
    roles: HashSet<Role>,
    permissions: PermissionMap,
    hooks: Hooks,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    /// Create a manager with no ACLs and no entity
    pub fn new() -> Self {
        Self {
            acls: Vec::new(),
            entity: None,
            roles: HashSet::new(),
            permissions: HashMap::new(),
            hooks: Hooks::default(),
        }
    }

    /// Register an access control list
    ///
    /// With an entity already set, the new list's grants for the entity's
    /// roles are imported immediately (union per target) and the entity's
    /// authoritative permissions are re-applied on top.
    pub fn add(&mut self, acl: Arc<dyn AccessControl>) {
        if self.entity.is_some() {
            Self::import_into(&mut self.permissions, &self.roles, acl.as_ref());
            self.apply_entity_overrides();
        }

        self.acls.push(acl);
        debug!("access control list registered ({} total)", self.acls.len());
    }

    /// Set the entity being authorized, rebuilding the permission table
    ///
    /// Imports every registered ACL for the entity's roles, then overlays the
    /// entity's own permissions target by target (replacement, not union).
    pub fn set_entity(&mut self, entity: Arc<dyn Entity>) {
        self.roles = entity
            .roles()
            .iter()
            .map(|role| role.to_lowercase())
            .collect();
        self.permissions.clear();
        self.entity = Some(entity);

        for acl in &self.acls {
            Self::import_into(&mut self.permissions, &self.roles, acl.as_ref());
        }

        self.apply_entity_overrides();

        info!(
            "entity set: {} role(s), {} target(s) in table",
            self.roles.len(),
            self.permissions.len()
        );
    }

    /// The entity currently being authorized
    pub fn entity(&self) -> Option<&Arc<dyn Entity>> {
        self.entity.as_ref()
    }

    /// Install or overwrite the authorization service for a target
    ///
    /// The service covers every permission on its target; `"*"` registers
    /// the catch-all consulted when no exact-target service decides.
    pub fn register<F>(&mut self, target: &str, service: F)
    where
        F: Fn(&Manager, &Context<'_>, &str) -> Access + Send + Sync + 'static,
    {
        debug!("service registered for target {:?}", target);
        self.hooks.register_service(target, Box::new(service));
    }

    /// Install or overwrite a decision override for a `(target, permission)`
    /// pair
    ///
    /// Overrides are decisive once matched and take precedence over every
    /// other source. `"*"` registers a wildcard-target override.
    pub fn add_override<F>(&mut self, target: &str, permission: &str, callback: F)
    where
        F: Fn(&Manager, &Context<'_>) -> bool + Send + Sync + 'static,
    {
        debug!("override registered for {:?} on {:?}", permission, target);
        self.hooks
            .register_override(target, permission, Box::new(callback));
    }

    /// Resolve a context value to its lowercase target name
    pub fn resolve<'a>(&self, context: impl Into<Context<'a>>) -> Target {
        context.into().target()
    }

    /// Whether the permission table grants `permission` on the context's
    /// target
    ///
    /// Pure table lookup: overrides, services, and self-checks are not
    /// consulted. The permission is compared as given against the stored
    /// lowercase set; unknown targets are false.
    pub fn has<'a>(&self, permission: &str, context: impl Into<Context<'a>>) -> bool {
        let target = context.into().target();
        self.check_table(permission, &target)
    }

    /// Decide `permission` against the full pipeline
    ///
    /// Consults, in order, stopping at the first decisive answer: the exact
    /// `(target, permission)` override, the wildcard-target override, the
    /// exact-target service, the wildcard-target service, the context value's
    /// self-check, and finally the permission table.
    pub fn can<'a>(&self, permission: &str, context: impl Into<Context<'a>>) -> bool {
        let context = context.into();
        let target = context.target();

        if let Some(decision) = self.consult_overrides(&target, permission, &context) {
            debug!("{:?} on {:?} decided by override: {}", permission, target, decision);
            return decision;
        }

        if let Some(decision) = self.consult_services(&target, permission, &context).decision() {
            debug!("{:?} on {:?} decided by service: {}", permission, target, decision);
            return decision;
        }

        if let Context::Guarded(value) = &context {
            if let Some(decision) = value.can(self, permission).decision() {
                debug!("{:?} on {:?} decided by self-check: {}", permission, target, decision);
                return decision;
            }
        }

        self.check_table(permission, &target)
    }

    /// Whether the current entity holds a role (case-insensitive)
    pub fn is(&self, role: &str) -> bool {
        self.roles.contains(&role.to_lowercase())
    }

    /// Whether the current entity holds every listed role
    pub fn is_all<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().all(|role| self.is(role.as_ref()))
    }

    /// Whether the current entity holds at least one listed role
    pub fn is_any<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.is(role.as_ref()))
    }

    fn check_table(&self, permission: &str, target: &str) -> bool {
        self.permissions
            .get(target)
            .map_or(false, |actions| actions.contains(permission))
    }

    /// Overrides are decisive: the exact pair wins, then the wildcard target
    fn consult_overrides(
        &self,
        target: &str,
        permission: &str,
        context: &Context<'_>,
    ) -> Option<bool> {
        let permission = permission.to_lowercase();

        for key in [target, WILDCARD] {
            if let Some(callback) = self.hooks.override_for(key, &permission) {
                return Some(callback(self, context));
            }
        }

        None
    }

    /// An indeterminate exact-target service falls through to the wildcard
    fn consult_services(&self, target: &str, permission: &str, context: &Context<'_>) -> Access {
        for key in [target, WILDCARD] {
            if let Some(service) = self.hooks.service(key) {
                let access = service(self, context, permission);
                if !access.is_indeterminate() {
                    return access;
                }
            }
        }

        Access::Indeterminate
    }

    /// Union an ACL's grants for the held roles into the permission table
    fn import_into(permissions: &mut PermissionMap, roles: &HashSet<Role>, acl: &dyn AccessControl) {
        for role in acl.roles() {
            if !roles.contains(&role) {
                continue;
            }

            for (target, actions) in acl.permissions_for(&role) {
                permissions.entry(target).or_default().extend(actions);
            }
        }
    }

    /// Replace table entries for every target the entity declares itself
    fn apply_entity_overrides(&mut self) {
        let Some(entity) = &self.entity else {
            return;
        };

        for (target, actions) in entity.permissions() {
            let normalized: HashSet<Action> =
                actions.iter().map(|action| action.to_lowercase()).collect();

            self.permissions.insert(target.to_lowercase(), normalized);
        }
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("acls", &self.acls.len())
            .field("roles", &self.roles)
            .field("permissions", &self.permissions)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
