//! Cross-document reference extraction
//!
//! Walks an artifact body and pulls out every value held by a relationship
//! field, however deeply nested. Keys outside the vocabulary are recursed
//! into when they hold containers and ignored when they hold scalars.

use prov_artifact::{DocValue, StructuralPath};
use prov_config::PolicyConfig;
use serde::Serialize;
use std::collections::HashSet;

/// One edge extracted from an artifact body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Id of the artifact holding the reference
    pub source_id: String,

    /// Relationship field the value was found under
    pub field: String,

    /// Value as written (bare id or IRI)
    pub raw_target: String,

    /// Bare target id
    pub target_id: String,

    /// Where the value sits in the source body
    pub path: StructuralPath,

    /// Edge belongs to the provenance graph
    pub is_provenance: bool,
}

/// Extracts [`Reference`]s using the policy's relationship vocabulary
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    vocabulary: HashSet<String>,
    provenance_field: String,
}

impl ReferenceExtractor {
    /// Create extractor from policy
    #[must_use]
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            vocabulary: policy.relationship_fields.iter().cloned().collect(),
            provenance_field: policy.provenance_field.clone(),
        }
    }

    /// Extract every reference in `body`, in document order
    #[must_use]
    pub fn extract(&self, source_id: &str, body: &DocValue) -> Vec<Reference> {
        let mut refs = Vec::new();
        self.walk(source_id, body, &StructuralPath::root(), &mut refs);
        refs
    }

    /// Targets of the provenance edges in `body`
    #[must_use]
    pub fn provenance_targets(&self, source_id: &str, body: &DocValue) -> Vec<String> {
        self.extract(source_id, body)
            .into_iter()
            .filter(|r| r.is_provenance)
            .map(|r| r.target_id)
            .collect()
    }

    fn walk(
        &self,
        source_id: &str,
        value: &DocValue,
        path: &StructuralPath,
        refs: &mut Vec<Reference>,
    ) {
        match value {
            DocValue::Mapping(map) => {
                for (key, child) in map {
                    let child_path = path.key(key.as_str());
                    if self.vocabulary.contains(key) {
                        self.collect(source_id, key, child, &child_path, refs);
                    } else if child.is_container() {
                        self.walk(source_id, child, &child_path, refs);
                    }
                }
            }
            DocValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.is_container() {
                        self.walk(source_id, item, &path.index(i), refs);
                    }
                }
            }
            _ => {}
        }
    }

    fn collect(
        &self,
        source_id: &str,
        field: &str,
        value: &DocValue,
        path: &StructuralPath,
        refs: &mut Vec<Reference>,
    ) {
        let mut push = |raw: &str, path: StructuralPath| {
            refs.push(Reference {
                source_id: source_id.to_string(),
                field: field.to_string(),
                raw_target: raw.to_string(),
                target_id: normalize_target(raw).to_string(),
                path,
                is_provenance: field == self.provenance_field,
            });
        };

        match value {
            DocValue::String(raw) => push(raw, path.clone()),
            DocValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Some(raw) = item.as_str() {
                        push(raw, path.index(i));
                    }
                }
            }
            _ => {}
        }
    }
}

/// Reduce an IRI-shaped reference to its final path segment
///
/// `https://example.org/artifacts/bg-001` → `bg-001`,
/// `urn:x#bg-001` → `bg-001`, `bg-001` → `bg-001`. A trailing separator is
/// ignored.
#[must_use]
pub fn normalize_target(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(['/', '#']);
    trimmed
        .rsplit(['/', '#'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(trimmed)
}
