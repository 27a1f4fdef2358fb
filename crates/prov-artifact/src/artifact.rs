//! Corpus artifacts
//!
//! An [`Artifact`] is one parsed corpus document: an opaque location handle
//! plus a weakly-typed body. Identity (`id`) and declared type are read out
//! of the body once, at construction, using [`IdentityFields`].

use crate::value::DocValue;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Declared type recorded when a body carries no type field
pub const UNKNOWN_TYPE: &str = "unknown";

/// Names of the body fields that carry identity
///
/// Type fields are consulted in order; the first non-empty string wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityFields {
    /// Field holding the artifact id
    pub id_field: String,

    /// Fields holding the declared type, in priority order
    pub type_fields: Vec<String>,
}

impl Default for IdentityFields {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            type_fields: vec!["@type".to_string(), "type".to_string()],
        }
    }
}

/// Opaque handle back to storage (typically a file path)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Create location from any string-like handle
    #[inline]
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Get handle as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Location {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One corpus document
///
/// # Invariants
/// - Immutable after construction; re-scanning builds a new artifact
/// - `id` is `Some` only for a non-empty string id field
/// - Cheap to clone (body is shared)
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    id: Option<String>,
    declared_type: String,
    location: Location,
    body: Arc<DocValue>,
}

impl Artifact {
    /// Create artifact using the default identity fields (`id`, `@type`/`type`)
    #[inline]
    #[must_use]
    pub fn new(location: impl Into<Location>, body: DocValue) -> Self {
        Self::with_identity(location, body, &IdentityFields::default())
    }

    /// Create artifact reading identity from the given fields
    #[must_use]
    pub fn with_identity(
        location: impl Into<Location>,
        body: DocValue,
        fields: &IdentityFields,
    ) -> Self {
        let id = body.get_str(&fields.id_field).map(str::to_string);
        let declared_type = fields
            .type_fields
            .iter()
            .find_map(|field| body.get_str(field))
            .unwrap_or(UNKNOWN_TYPE)
            .to_string();

        Self {
            id,
            declared_type,
            location: location.into(),
            body: Arc::new(body),
        }
    }

    /// Artifact id, if the body carries a usable one
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Declared type as written (arbitrary casing/spelling)
    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Storage handle
    #[inline]
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Parsed body
    #[inline]
    #[must_use]
    pub fn body(&self) -> &DocValue {
        &self.body
    }

    /// Check if both handles refer to the same parsed document
    ///
    /// Clones share their body, separately built artifacts never do, even
    /// when location and content are equal.
    #[inline]
    #[must_use]
    pub fn same_document(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> DocValue {
        DocValue::from(value)
    }

    #[test]
    fn reads_id_and_at_type() {
        let artifact = Artifact::new(
            "bg-001.json",
            body(json!({"id": "bg-001", "@type": "BusinessGoal"})),
        );
        assert_eq!(artifact.id(), Some("bg-001"));
        assert_eq!(artifact.declared_type(), "BusinessGoal");
        assert_eq!(artifact.location().as_str(), "bg-001.json");
    }

    #[test]
    fn same_document_follows_identity_not_equality() {
        let first = Artifact::new("", body(json!({"id": "x"})));
        let twin = Artifact::new("", body(json!({"id": "x"})));

        assert_eq!(first, twin);
        assert!(!first.same_document(&twin));
        assert!(first.same_document(&first.clone()));
    }

    #[test]
    fn at_type_takes_priority_over_type() {
        let artifact = Artifact::new(
            "x.json",
            body(json!({"id": "x", "type": "data-dictionary", "@type": "DataDictionary"})),
        );
        assert_eq!(artifact.declared_type(), "DataDictionary");
    }

    #[test]
    fn falls_back_to_plain_type_field() {
        let artifact = Artifact::new("x.json", body(json!({"id": "x", "type": "roadmap"})));
        assert_eq!(artifact.declared_type(), "roadmap");
    }

    #[test]
    fn missing_type_is_unknown() {
        let artifact = Artifact::new("x.json", body(json!({"id": "x"})));
        assert_eq!(artifact.declared_type(), UNKNOWN_TYPE);
    }

    #[test]
    fn unusable_ids_are_none() {
        for value in [json!({}), json!({"id": ""}), json!({"id": 42}), json!({"id": ["a"]})] {
            let artifact = Artifact::new("x.json", body(value));
            assert_eq!(artifact.id(), None);
        }
    }

    #[test]
    fn non_mapping_body_has_no_identity() {
        let artifact = Artifact::new("x.json", body(json!(["a", "b"])));
        assert_eq!(artifact.id(), None);
        assert_eq!(artifact.declared_type(), UNKNOWN_TYPE);
    }

    #[test]
    fn custom_identity_fields() {
        let fields = IdentityFields {
            id_field: "docId".to_string(),
            type_fields: vec!["kind".to_string()],
        };
        let artifact = Artifact::with_identity(
            "x.json",
            body(json!({"docId": "d-1", "kind": "Roadmap", "id": "ignored"})),
            &fields,
        );
        assert_eq!(artifact.id(), Some("d-1"));
        assert_eq!(artifact.declared_type(), "Roadmap");
    }
}
