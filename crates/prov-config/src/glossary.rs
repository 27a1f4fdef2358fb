//! Glossary (data dictionary) loading
//!
//! The glossary is just another corpus artifact carrying a `terms` list.
//! Loading is tolerant: a malformed term is skipped with a warning, it never
//! fails the run.

use crate::canonical::TypeCanonicalizer;
use crate::policy::PolicyConfig;
use indexmap::IndexMap;
use prov_artifact::{Artifact, DocValue};
use serde::Serialize;
use std::collections::BTreeMap;

/// One canonical term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    /// Term id referenced from documents
    pub id: String,

    /// Canonical display name
    pub name: String,

    /// Declared data type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Boolean constraint flags (`required`, `unique`, ...)
    pub constraints: BTreeMap<String, bool>,

    /// Non-canonical names authors should avoid
    pub synonyms: Vec<String>,

    /// Term is scheduled for removal
    pub deprecated: bool,

    /// Replacement term id for deprecated terms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replaced_by: Option<String>,
}

impl GlossaryTerm {
    /// Create a plain term
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type: None,
            constraints: BTreeMap::new(),
            synonyms: Vec::new(),
            deprecated: false,
            replaced_by: None,
        }
    }

    /// With declared data type
    #[inline]
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// With a constraint flag
    #[inline]
    #[must_use]
    pub fn with_constraint(mut self, name: impl Into<String>, value: bool) -> Self {
        self.constraints.insert(name.into(), value);
        self
    }

    /// With synonyms
    #[must_use]
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Mark deprecated, optionally naming a replacement
    #[must_use]
    pub fn deprecated(mut self, replaced_by: Option<&str>) -> Self {
        self.deprecated = true;
        self.replaced_by = replaced_by.map(str::to_string);
        self
    }

    /// Constraint flag, `false` when undeclared
    #[inline]
    #[must_use]
    pub fn constraint(&self, name: &str) -> bool {
        self.constraints.get(name).copied().unwrap_or(false)
    }

    /// Read a term from one entry of a `terms` list
    ///
    /// Returns `None` when the entry is not a mapping or has no usable id.
    #[must_use]
    pub fn from_value(value: &DocValue) -> Option<Self> {
        let id = value.get_str("id")?.to_string();
        let name = value
            .get_str("canonicalName")
            .or_else(|| value.get_str("term"))
            .unwrap_or(&id)
            .to_string();

        let constraints = value
            .get("constraints")
            .and_then(DocValue::as_mapping)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                    .collect()
            })
            .unwrap_or_default();

        let synonyms = value
            .get("synonyms")
            .and_then(DocValue::as_sequence)
            .map(|items| {
                items
                    .iter()
                    .filter_map(DocValue::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name,
            data_type: value.get_str("dataType").map(str::to_string),
            constraints,
            synonyms,
            deprecated: value.get("deprecated").and_then(DocValue::as_bool) == Some(true),
            replaced_by: value.get_str("replacedBy").map(str::to_string),
            id,
        })
    }
}

/// Loaded glossary, terms keyed by id in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Glossary {
    terms: IndexMap<String, GlossaryTerm>,
}

impl Glossary {
    /// Create glossary from terms; a later duplicate id replaces an earlier one
    #[must_use]
    pub fn from_terms(terms: impl IntoIterator<Item = GlossaryTerm>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    /// Load from a glossary artifact's `terms` list
    #[must_use]
    pub fn from_artifact(artifact: &Artifact) -> Self {
        let Some(entries) = artifact.body().get("terms").and_then(DocValue::as_sequence) else {
            tracing::warn!(
                location = %artifact.location(),
                "glossary artifact has no terms list"
            );
            return Self::default();
        };

        let mut terms = IndexMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match GlossaryTerm::from_value(entry) {
                Some(term) => {
                    terms.insert(term.id.clone(), term);
                }
                None => tracing::warn!(
                    location = %artifact.location(),
                    index,
                    "skipping malformed glossary term"
                ),
            }
        }

        tracing::debug!(
            location = %artifact.location(),
            terms = terms.len(),
            "loaded glossary"
        );
        Self { terms }
    }

    /// Find the glossary among corpus artifacts
    ///
    /// The first artifact whose canonical type is the policy's glossary type
    /// wins.
    #[must_use]
    pub fn locate(
        artifacts: &[Artifact],
        policy: &PolicyConfig,
        canonicalizer: &TypeCanonicalizer,
    ) -> Option<Self> {
        Self::find_source(artifacts, policy, canonicalizer).map(Self::from_artifact)
    }

    /// The artifact [`Glossary::locate`] would load
    #[must_use]
    pub fn find_source<'a>(
        artifacts: &'a [Artifact],
        policy: &PolicyConfig,
        canonicalizer: &TypeCanonicalizer,
    ) -> Option<&'a Artifact> {
        artifacts
            .iter()
            .find(|a| canonicalizer.canonicalize(a.declared_type()) == policy.glossary_type)
    }

    /// Lookup term by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&GlossaryTerm> {
        self.terms.get(id)
    }

    /// Iterate terms in document order
    pub fn terms(&self) -> impl Iterator<Item = &GlossaryTerm> {
        self.terms.values()
    }

    /// Number of terms
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if glossary has no terms
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
