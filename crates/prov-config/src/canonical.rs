//! Type canonicalization
//!
//! Declared types arrive in arbitrary spellings (`UserStory`, `user-story`,
//! `BIZ-STORY`). Every policy lookup goes through [`TypeCanonicalizer`] so
//! that all of them land on one canonical form.

use crate::policy::PolicyConfig;
use std::collections::{HashMap, HashSet};

/// Maps declared type spellings to canonical types
///
/// Resolution order:
/// 1. the declared string is itself a known canonical type
/// 2. its hyphenated lower-case form is a known canonical type
/// 3. the declared string, then the hyphenated form, is a known alias
/// 4. otherwise the hyphenated form is returned unchanged
///
/// Known canonical types are the rule keys, alias keys and the glossary type.
#[derive(Debug, Clone, Default)]
pub struct TypeCanonicalizer {
    canonical: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl TypeCanonicalizer {
    /// Build from the policy tables
    #[must_use]
    pub fn new(policy: &PolicyConfig) -> Self {
        let mut canonical: HashSet<String> = policy.rules.keys().cloned().collect();
        canonical.extend(policy.type_aliases.keys().cloned());
        canonical.insert(policy.glossary_type.clone());

        let aliases = policy
            .type_aliases
            .iter()
            .flat_map(|(target, spellings)| {
                spellings
                    .iter()
                    .map(move |alias| (alias.clone(), target.clone()))
            })
            .collect();

        Self { canonical, aliases }
    }

    /// Canonical form of a declared type
    #[must_use]
    pub fn canonicalize(&self, declared: &str) -> String {
        if self.canonical.contains(declared) {
            return declared.to_string();
        }

        let hyphenated = hyphenate(declared);
        if self.canonical.contains(&hyphenated) {
            return hyphenated;
        }

        self.aliases
            .get(declared)
            .or_else(|| self.aliases.get(&hyphenated))
            .cloned()
            .unwrap_or(hyphenated)
    }

    /// Check if a type is known to the policy
    #[inline]
    #[must_use]
    pub fn is_known(&self, canonical_type: &str) -> bool {
        self.canonical.contains(canonical_type)
    }
}

/// `UserStory` → `user-story`
fn hyphenate(declared: &str) -> String {
    let mut out = String::with_capacity(declared.len() + 4);
    for ch in declared.chars() {
        if ch.is_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out.trim_start_matches('-').to_string()
}
