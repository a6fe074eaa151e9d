//! Core authorization types

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Role identifier, compared case-insensitively via lowercase normalization
pub type Role = String;

/// Target identifier naming a resource class (commonly a type name)
pub type Target = String;

/// Action identifier naming an operation ("read", "delete", ...)
pub type Action = String;

/// Flattened permission table: target to granted action set
pub type PermissionMap = HashMap<Target, HashSet<Action>>;

/// Outcome of an authorization check
///
/// `Indeterminate` means no authority could decide; it is distinct from an
/// explicit denial and typically maps to "authentication required" at the
/// transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// The check passed
    Granted,
    /// The check was explicitly refused
    Denied,
    /// No authority could decide
    Indeterminate,
}

impl Access {
    /// Whether the check passed
    pub fn is_granted(self) -> bool {
        matches!(self, Access::Granted)
    }

    /// Whether the check was explicitly refused
    pub fn is_denied(self) -> bool {
        matches!(self, Access::Denied)
    }

    /// Whether no authority could decide
    pub fn is_indeterminate(self) -> bool {
        matches!(self, Access::Indeterminate)
    }

    /// Collapse to a boolean, or `None` when undecided
    pub fn decision(self) -> Option<bool> {
        match self {
            Access::Granted => Some(true),
            Access::Denied => Some(false),
            Access::Indeterminate => None,
        }
    }
}

impl From<bool> for Access {
    fn from(allowed: bool) -> Self {
        if allowed {
            Access::Granted
        } else {
            Access::Denied
        }
    }
}

/// An authorizable actor: a set of roles plus optional per-target permission
/// overrides
///
/// Targets listed in [`permissions`](Entity::permissions) are authoritative:
/// when an entity is handed to a [`Manager`](crate::manager::Manager), those
/// action lists replace any ACL-derived entry for the same target wholesale.
/// The default implementation declares no overrides.
pub trait Entity: Send + Sync {
    /// Roles held by this entity
    fn roles(&self) -> Vec<Role>;

    /// Per-target authoritative action lists
    fn permissions(&self) -> HashMap<Target, Vec<Action>> {
        HashMap::new()
    }
}

/// Ready-made [`Entity`] backed by plain data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticEntity {
    /// Roles held by the entity
    #[serde(default)]
    roles: Vec<Role>,

    /// Authoritative per-target action lists
    #[serde(default)]
    permissions: HashMap<Target, Vec<Action>>,
}

impl StaticEntity {
    /// Create an entity holding the given roles
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            permissions: HashMap::new(),
        }
    }

    /// Declare an authoritative action list for a target
    pub fn with_permission<I, S>(mut self, target: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .insert(target.into(), actions.into_iter().map(Into::into).collect());
        self
    }
}

impl Entity for StaticEntity {
    fn roles(&self) -> Vec<Role> {
        self.roles.clone()
    }

    fn permissions(&self) -> HashMap<Target, Vec<Action>> {
        self.permissions.clone()
    }
}
