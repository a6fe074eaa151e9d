//! Rule-table primitives for path gating

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthError, Result};

/// Polarity applied when no rule decides a checked path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultRule {
    /// Paths are reachable unless a reject rule triggers
    #[default]
    Accept,
    /// Paths are unreachable unless an accept rule triggers
    Reject,
}

impl FromStr for DefaultRule {
    type Err = AuthError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "accept" => Ok(DefaultRule::Accept),
            "reject" => Ok(DefaultRule::Reject),
            other => Err(AuthError::InvalidInput(format!(
                "default rule must be one of \"accept\" or \"reject\", got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for DefaultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultRule::Accept => write!(f, "accept"),
            DefaultRule::Reject => write!(f, "reject"),
        }
    }
}

/// One entry in a rule's role list
///
/// A `!` prefix inverts the test: the entry matches when the checked role set
/// lacks the named role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RoleMatcher {
    /// Matches when the checked set holds the role
    Has(String),
    /// Matches when the checked set lacks the role
    Lacks(String),
}

impl RoleMatcher {
    /// Parse a raw entry, trimming and lowercasing; empty entries yield
    /// `None`
    pub fn parse(raw: &str) -> Option<Self> {
        let entry = raw.trim();

        if let Some(negated) = entry.strip_prefix('!') {
            let role = negated.trim().to_lowercase();
            if role.is_empty() {
                return None;
            }
            return Some(RoleMatcher::Lacks(role));
        }

        if entry.is_empty() {
            return None;
        }

        Some(RoleMatcher::Has(entry.to_lowercase()))
    }

    /// Whether this entry holds for the given lowercase role set
    pub fn matches(&self, roles: &[String]) -> bool {
        match self {
            RoleMatcher::Has(role) => roles.iter().any(|held| held == role),
            RoleMatcher::Lacks(role) => !roles.iter().any(|held| held == role),
        }
    }
}

/// A compiled path pattern and the role entries that trigger it
///
/// Patterns match the whole path, case-insensitively. A pattern that fails
/// to compile stays in the table but never matches.
#[derive(Debug, Clone)]
pub(crate) struct PathRule {
    pattern: String,
    regex: Option<Regex>,
    entries: Vec<RoleMatcher>,
}

impl PathRule {
    pub fn new(pattern: String, entries: Vec<RoleMatcher>) -> Self {
        let regex = compile_anchored(&pattern);

        Self {
            pattern,
            regex,
            entries,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the whole path matches this rule's pattern
    pub fn matches_path(&self, path: &str) -> bool {
        self.regex
            .as_ref()
            .map_or(false, |regex| regex.is_match(path))
    }

    /// Whether any role entry holds for the given lowercase role set
    pub fn triggered_by(&self, roles: &[String]) -> bool {
        self.entries.iter().any(|entry| entry.matches(roles))
    }
}

fn compile_anchored(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(&format!("^{}$", pattern))
        .case_insensitive(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!("unusable path pattern {:?}: {}", pattern, err);
            None
        }
    }
}

/// Deserializable guard settings
///
/// ```
/// use authgate::{Access, Guard, GuardConfig};
///
/// let config: GuardConfig = serde_json::from_str(
///     r#"{
///         "default_rule": "accept",
///         "user_role": "user",
///         "reject": {"/admin(/.*)?": ["!admin"]}
///     }"#,
/// ).unwrap();
///
/// let guard = Guard::from_config(config).unwrap();
/// assert_eq!(guard.check("/admin", &["admin"]), Access::Granted);
/// assert_eq!(guard.check("/admin", &["user"]), Access::Denied);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// `"accept"` or `"reject"`; unset keeps the accept default
    #[serde(default)]
    pub default_rule: Option<String>,

    /// Role marking a logged-in user
    #[serde(default)]
    pub user_role: Option<String>,

    /// Accept rules, `pattern -> role entries`
    #[serde(default)]
    pub accept: HashMap<String, Vec<String>>,

    /// Reject rules, `pattern -> role entries`
    #[serde(default)]
    pub reject: HashMap<String, Vec<String>>,
}
