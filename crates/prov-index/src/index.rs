//! Corpus index
//!
//! Provides [`CorpusIndex`]: id → {canonical type, location}, built once per
//! validation run. Existence checks and provenance checks both need the full
//! map, so building it is a hard barrier before either can start.

use indexmap::IndexMap;
use prov_artifact::{Artifact, Location};
use prov_config::TypeCanonicalizer;
use serde::Serialize;

/// What the index knows about one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Alias-resolved type used for policy lookups
    pub canonical_type: String,

    /// Storage handle of the artifact
    pub location: Location,
}

impl IndexEntry {
    /// Create entry
    #[inline]
    #[must_use]
    pub fn new(canonical_type: impl Into<String>, location: impl Into<Location>) -> Self {
        Self {
            canonical_type: canonical_type.into(),
            location: location.into(),
        }
    }
}

/// An artifact hidden by a later artifact with the same id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowedArtifact {
    /// Shared id
    pub id: String,

    /// Location of the artifact that lost
    pub location: Location,

    /// Location of the artifact now in the index
    pub kept: Location,
}

/// Map from artifact id to index entry, in first-seen scan order
///
/// # Invariants
/// - At most one entry per id; a later artifact with the same id replaces
///   the earlier one
/// - Every replaced artifact is remembered so it can be reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusIndex {
    entries: IndexMap<String, IndexEntry>,

    #[serde(skip)]
    shadowed: Vec<(String, Location)>,
}

impl CorpusIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan artifacts once and index every usable id
    ///
    /// Artifacts without a usable id are skipped here; reporting them is up
    /// to the caller.
    #[must_use]
    pub fn build(artifacts: &[Artifact], canonicalizer: &TypeCanonicalizer) -> Self {
        let mut index = Self::new();
        let mut skipped = 0usize;

        for artifact in artifacts {
            let Some(id) = artifact.id() else {
                skipped += 1;
                continue;
            };
            let canonical_type = canonicalizer.canonicalize(artifact.declared_type());
            index.insert(id, IndexEntry::new(canonical_type, artifact.location().clone()));
        }

        tracing::debug!(
            indexed = index.len(),
            skipped,
            duplicates = index.shadowed.len(),
            "built corpus index"
        );
        index
    }

    /// Insert entry, replacing (and remembering) any previous entry for `id`
    pub fn insert(&mut self, id: impl Into<String>, entry: IndexEntry) {
        let id = id.into();
        if let Some(previous) = self.entries.insert(id.clone(), entry) {
            tracing::warn!(
                id = %id,
                shadowed = %previous.location,
                "duplicate artifact id, later scan wins"
            );
            self.shadowed.push((id, previous.location));
        }
    }

    /// Lookup entry by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Check if id is indexed
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Canonical type of an indexed id
    #[inline]
    #[must_use]
    pub fn canonical_type(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.canonical_type.as_str())
    }

    /// Iterate entries in first-seen scan order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Artifacts hidden by a later artifact with the same id, in scan order
    #[must_use]
    pub fn shadowed(&self) -> Vec<ShadowedArtifact> {
        self.shadowed
            .iter()
            .filter_map(|(id, location)| {
                self.entries.get(id).map(|kept| ShadowedArtifact {
                    id: id.clone(),
                    location: location.clone(),
                    kept: kept.location.clone(),
                })
            })
            .collect()
    }

    /// Number of indexed ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prov_artifact::DocValue;
    use prov_config::PolicyConfig;
    use serde_json::json;

    fn artifact(location: &str, body: serde_json::Value) -> Artifact {
        Artifact::new(location, DocValue::from(body))
    }

    fn canonicalizer() -> TypeCanonicalizer {
        TypeCanonicalizer::new(&PolicyConfig::default())
    }

    #[test]
    fn indexes_id_type_and_location() {
        let artifacts = vec![
            artifact("bg.json", json!({"id": "bg-001", "@type": "BusinessGoal"})),
            artifact("us.json", json!({"id": "us-001", "@type": "UserStory"})),
        ];
        let index = CorpusIndex::build(&artifacts, &canonicalizer());

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("bg-001"),
            Some(&IndexEntry::new("business-goal", "bg.json"))
        );
        assert_eq!(index.canonical_type("us-001"), Some("user-story"));
    }

    #[test]
    fn skips_artifacts_without_usable_id() {
        let artifacts = vec![
            artifact("a.json", json!({"@type": "BusinessGoal"})),
            artifact("b.json", json!({"id": "", "@type": "BusinessGoal"})),
            artifact("c.json", json!({"id": 7, "@type": "BusinessGoal"})),
        ];
        assert!(CorpusIndex::build(&artifacts, &canonicalizer()).is_empty());
    }

    #[test]
    fn later_duplicate_wins_and_earlier_is_remembered() {
        let artifacts = vec![
            artifact("first.json", json!({"id": "x", "@type": "BusinessGoal"})),
            artifact("other.json", json!({"id": "y", "@type": "Roadmap"})),
            artifact("second.json", json!({"id": "x", "@type": "UserStory"})),
        ];
        let index = CorpusIndex::build(&artifacts, &canonicalizer());

        assert_eq!(index.len(), 2);
        assert_eq!(index.canonical_type("x"), Some("user-story"));
        assert_eq!(
            index.shadowed(),
            vec![ShadowedArtifact {
                id: "x".to_string(),
                location: Location::new("first.json"),
                kept: Location::new("second.json"),
            }]
        );
        // first-seen order is kept for the surviving id
        let ids: Vec<_> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }

    #[test]
    fn serializes_as_id_map() {
        let mut index = CorpusIndex::new();
        index.insert("bg-001", IndexEntry::new("business-goal", "bg.json"));
        assert_eq!(
            serde_json::to_value(&index).unwrap(),
            json!({"entries": {"bg-001": {"canonicalType": "business-goal", "location": "bg.json"}}})
        );
    }
}
