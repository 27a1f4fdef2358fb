//! Provenance Index
//!
//! Corpus-wide identity map and cross-document reference extraction.
//!
//! # Overview
//!
//! - **CorpusIndex**: id → {canonical type, location}, built once per run
//! - **ReferenceExtractor**: recursive walk pulling typed references out of
//!   arbitrarily nested bodies
//!
//! # Example
//!
//! ```rust
//! use prov_artifact::{Artifact, DocValue};
//! use prov_config::{PolicyConfig, TypeCanonicalizer};
//! use prov_index::{CorpusIndex, ReferenceExtractor};
//!
//! let policy = PolicyConfig::default();
//! let artifacts = vec![
//!     Artifact::new("bg.json", DocValue::from(serde_json::json!({
//!         "id": "bg-001", "@type": "BusinessGoal"
//!     }))),
//!     Artifact::new("us.json", DocValue::from(serde_json::json!({
//!         "id": "us-001", "@type": "UserStory",
//!         "traceability": { "derivedFrom": ["bg-001"] }
//!     }))),
//! ];
//!
//! let index = CorpusIndex::build(&artifacts, &TypeCanonicalizer::new(&policy));
//! let refs = ReferenceExtractor::new(&policy).extract("us-001", artifacts[1].body());
//!
//! assert_eq!(refs.len(), 1);
//! assert_eq!(index.canonical_type(&refs[0].target_id), Some("business-goal"));
//! ```

#![warn(missing_docs)]

pub mod index;
pub mod reference;

// Re-exports
pub use index::{CorpusIndex, IndexEntry, ShadowedArtifact};
pub use reference::{normalize_target, Reference, ReferenceExtractor};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for index operations
    pub use crate::{CorpusIndex, IndexEntry, Reference, ReferenceExtractor};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use proptest::prelude::*;
    use prov_artifact::{Artifact, DocValue};
    use prov_config::{PolicyConfig, TypeCanonicalizer};
    use serde_json::json;

    proptest! {
        #[test]
        fn every_unique_id_is_indexed(ids in proptest::collection::hash_set("[a-z]{1,6}-[0-9]{3}", 0..20)) {
            let policy = PolicyConfig::default();
            let artifacts: Vec<Artifact> = ids
                .iter()
                .map(|id| Artifact::new(format!("{id}.json"), DocValue::from(json!({"id": id, "@type": "UserStory"}))))
                .collect();

            let index = CorpusIndex::build(&artifacts, &TypeCanonicalizer::new(&policy));

            prop_assert_eq!(index.len(), ids.len());
            for id in &ids {
                let entry = index.get(id).unwrap();
                prop_assert_eq!(entry.canonical_type.as_str(), "user-story");
                prop_assert_eq!(entry.location.as_str(), format!("{id}.json"));
            }
            prop_assert!(index.shadowed().is_empty());
        }
    }

    #[test]
    fn extracted_targets_resolve_through_index() {
        let policy = PolicyConfig::default();
        let artifacts = vec![
            Artifact::new("pc.json", DocValue::from(json!({"id": "pc-001", "@type": "PM-CHARTER"}))),
            Artifact::new(
                "rr.json",
                DocValue::from(json!({
                    "id": "rr-001",
                    "@type": "RiskRegister",
                    "risks": [{"affectedArtifacts": ["pc-001", "ghost"]}]
                })),
            ),
        ];

        let index = CorpusIndex::build(&artifacts, &TypeCanonicalizer::new(&policy));
        let refs = ReferenceExtractor::new(&policy).extract("rr-001", artifacts[1].body());

        let resolved: Vec<_> = refs.iter().map(|r| index.canonical_type(&r.target_id)).collect();
        assert_eq!(resolved, vec![Some("project-charter"), None]);
    }
}
