//! Path gating with ordered accept/reject rules
//!
//! A [`Guard`] decides whether a raw request path is reachable for a set of
//! roles. Rules come in two families: patterns whose role entries accept the
//! path and patterns whose entries reject it. The default rule fixes the
//! starting polarity and the evaluation order; whichever family applies last
//! wins. The result is a tri-state [`Access`]: granted, denied to an
//! identified user, or indeterminate when no identity was established.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use authgate::{Access, Guard};
//!
//! let mut guard = Guard::new();
//! guard.add_reject_rules(HashMap::from([
//!     ("/admin(/.*)?".to_string(), vec!["!admin".to_string()]),
//! ]));
//! guard.set_user_role("user");
//!
//! assert_eq!(guard.check("/admin/users", &["admin"]), Access::Granted);
//! assert_eq!(guard.check("/admin/users", &["user"]), Access::Denied);
//! assert_eq!(guard.check("/admin/users", &["guest"]), Access::Indeterminate);
//! ```

mod rules;


pub use rules::{DefaultRule, GuardConfig};

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::types::Access;

use rules::{PathRule, RoleMatcher};

/// Ordered accept/reject path rules with a default polarity
///
/// Rule sets are additive; there is no removal operation. Populate at
/// startup, share read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Guard {
    accept_rules: Vec<PathRule>,
    reject_rules: Vec<PathRule>,
    default_rule: DefaultRule,
    user_role: Option<String>,
}

impl Guard {
    /// Create a guard with no rules and the accept default
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a populated guard from deserialized settings
    ///
    /// Fails only on an invalid default-rule value.
    pub fn from_config(config: GuardConfig) -> Result<Self> {
        let mut guard = Guard::new();

        if let Some(rule) = &config.default_rule {
            guard.set_default_rule(rule)?;
        }

        if let Some(role) = &config.user_role {
            guard.set_user_role(role);
        }

        guard.add_accept_rules(config.accept);
        guard.add_reject_rules(config.reject);

        Ok(guard)
    }

    /// Merge accept rules, `pattern -> role entries`
    ///
    /// Entries are trimmed and lowercased; a `!` prefix negates. A pattern
    /// already in the table has its role list replaced.
    pub fn add_accept_rules(&mut self, rules: HashMap<String, Vec<String>>) {
        Self::merge_rules(&mut self.accept_rules, rules);
    }

    /// Merge reject rules, `pattern -> role entries`
    ///
    /// Same normalization and replacement semantics as
    /// [`add_accept_rules`](Guard::add_accept_rules).
    pub fn add_reject_rules(&mut self, rules: HashMap<String, Vec<String>>) {
        Self::merge_rules(&mut self.reject_rules, rules);
    }

    /// Set the default polarity; accepts `"accept"` or `"reject"`
    /// (case-insensitive)
    pub fn set_default_rule(&mut self, rule: &str) -> Result<()> {
        self.default_rule = rule.parse()?;
        debug!("default rule set to {}", self.default_rule);
        Ok(())
    }

    /// Set the lowercase role marking a logged-in user
    ///
    /// With the marker present in a checked role set, a non-granted outcome
    /// is a denial; without it, the outcome is indeterminate.
    pub fn set_user_role(&mut self, role: &str) {
        self.user_role = Some(role.to_lowercase());
    }

    /// Decide whether `path` is reachable for `roles`
    ///
    /// Roles are lowercased first. An empty role list short-circuits to the
    /// default rule. Otherwise the families apply in default-dependent order
    /// (reject then accept under an accept default, accept then reject under
    /// a reject default) and the outcome maps to granted, denied, or
    /// indeterminate depending on the authenticated-role marker.
    pub fn check<S: AsRef<str>>(&self, path: &str, roles: &[S]) -> Access {
        let roles: Vec<String> = roles
            .iter()
            .map(|role| role.as_ref().to_lowercase())
            .collect();

        if roles.is_empty() {
            return Access::from(self.default_rule == DefaultRule::Accept);
        }

        let mut granted = self.default_rule == DefaultRule::Accept;

        if granted {
            if Self::family_triggered(&self.reject_rules, path, &roles) {
                granted = false;
            }
            if Self::family_triggered(&self.accept_rules, path, &roles) {
                granted = true;
            }
        } else {
            if Self::family_triggered(&self.accept_rules, path, &roles) {
                granted = true;
            }
            if Self::family_triggered(&self.reject_rules, path, &roles) {
                granted = false;
            }
        }

        let outcome = if granted {
            Access::Granted
        } else if self.is_authenticated(&roles) {
            Access::Denied
        } else {
            Access::Indeterminate
        };

        debug!("path {:?} for roles {:?}: {:?}", path, roles, outcome);
        outcome
    }

    fn merge_rules(table: &mut Vec<PathRule>, rules: HashMap<String, Vec<String>>) {
        for (pattern, raw_entries) in rules {
            let mut entries = Vec::with_capacity(raw_entries.len());

            for raw in &raw_entries {
                match RoleMatcher::parse(raw) {
                    Some(matcher) => entries.push(matcher),
                    None => warn!("dropping empty role entry for pattern {:?}", pattern),
                }
            }

            let rule = PathRule::new(pattern, entries);

            match table
                .iter_mut()
                .find(|existing| existing.pattern() == rule.pattern())
            {
                Some(existing) => *existing = rule,
                None => table.push(rule),
            }
        }
    }

    /// Boolean OR across the entries of every pattern matching the path
    fn family_triggered(rules: &[PathRule], path: &str, roles: &[String]) -> bool {
        let mut triggered = false;

        for rule in rules {
            if !rule.matches_path(path) {
                continue;
            }

            triggered |= rule.triggered_by(roles);
        }

        triggered
    }

    fn is_authenticated(&self, roles: &[String]) -> bool {
        self.user_role
            .as_ref()
            .map_or(false, |user| roles.iter().any(|role| role == user))
    }
}
