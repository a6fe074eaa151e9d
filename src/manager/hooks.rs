//! Callback registries consulted ahead of the permission table

use std::collections::HashMap;
use std::fmt;

use crate::context::Context;
use crate::manager::Manager;
use crate::types::{Access, Action, Target};

/// Decision callback covering every permission on a target
///
/// Receives the unresolved context value. Returning
/// [`Access::Indeterminate`] passes the decision to the next pipeline step.
pub type ServiceFn = Box<dyn Fn(&Manager, &Context<'_>, &str) -> Access + Send + Sync>;

/// Decisive callback for a single `(target, permission)` pair
pub type OverrideFn = Box<dyn Fn(&Manager, &Context<'_>) -> bool + Send + Sync>;

/// Catch-all key matching any target
pub(crate) const WILDCARD: &str = "*";

/// Registered services and overrides, keyed lowercase
#[derive(Default)]
pub(crate) struct Hooks {
    services: HashMap<Target, ServiceFn>,
    overrides: HashMap<Target, HashMap<Action, OverrideFn>>,
}

impl Hooks {
    /// Install or overwrite the service for a target
    pub fn register_service(&mut self, target: &str, service: ServiceFn) {
        self.services.insert(target.to_lowercase(), service);
    }

    /// Install or overwrite the override for a `(target, permission)` pair
    pub fn register_override(&mut self, target: &str, permission: &str, callback: OverrideFn) {
        self.overrides
            .entry(target.to_lowercase())
            .or_default()
            .insert(permission.to_lowercase(), callback);
    }

    pub fn service(&self, target: &str) -> Option<&ServiceFn> {
        self.services.get(target)
    }

    pub fn override_for(&self, target: &str, permission: &str) -> Option<&OverrideFn> {
        self.overrides
            .get(target)
            .and_then(|table| table.get(permission))
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("services", &self.services.len())
            .field(
                "overrides",
                &self.overrides.values().map(HashMap::len).sum::<usize>(),
            )
            .finish()
    }
}
