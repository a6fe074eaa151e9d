//! Write-time action-alias expansion

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::types::Action;

/// Expansion table mapping an alias to the actions it stands for
///
/// Expansion lists may themselves contain aliases; resolution recurses until
/// only base actions remain. The alias name itself is never part of a
/// resolution result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AliasTable {
    entries: HashMap<String, Vec<Action>>,
}

impl AliasTable {
    /// Register or overwrite an alias, lowercasing the name and every token
    pub fn define<I, S>(&mut self, name: &str, actions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expansion = actions
            .into_iter()
            .map(|action| action.into().to_lowercase())
            .collect();

        self.entries.insert(name.to_lowercase(), expansion);
    }

    /// Resolve raw action tokens to the base actions they stand for
    ///
    /// Tokens are lowercased; tokens naming an alias are replaced by their
    /// recursively-resolved expansion, everything else passes through. The
    /// result is deduplicated.
    pub fn resolve<I, S>(&self, tokens: I) -> HashSet<Action>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut resolved = HashSet::new();
        let mut expanding = HashSet::new();

        for token in tokens {
            self.expand(&token.into().to_lowercase(), &mut resolved, &mut expanding);
        }

        resolved
    }

    fn expand(&self, token: &str, resolved: &mut HashSet<Action>, expanding: &mut HashSet<String>) {
        let Some(expansion) = self.entries.get(token) else {
            resolved.insert(token.to_string());
            return;
        };

        // Re-entering an alias mid-expansion means the configuration is cyclic
        if !expanding.insert(token.to_string()) {
            warn!("alias {:?} expands through itself, skipping re-entry", token);
            return;
        }

        for action in expansion {
            self.expand(action, resolved, expanding);
        }

        expanding.remove(token);
    }
}
