//! Provenance Artifact System
//!
//! Weakly-typed corpus documents with structural addressing.
//!
//! # Core Concepts
//!
//! - [`DocValue`]: Tagged union over scalars, sequences and key-ordered mappings
//! - [`Artifact`]: One corpus document (id, declared type, location, body)
//! - [`StructuralPath`]: Pointer-style address of a value inside a body
//!
//! # Example
//!
//! ```rust
//! use prov_artifact::{Artifact, DocValue};
//!
//! let body = DocValue::from(serde_json::json!({
//!     "id": "us-001",
//!     "@type": "UserStory",
//!     "traceability": { "derivedFrom": ["bg-001"] }
//! }));
//! let artifact = Artifact::new("us-001.json", body);
//!
//! assert_eq!(artifact.id(), Some("us-001"));
//! assert_eq!(artifact.declared_type(), "UserStory");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod artifact;
mod path;
mod value;

// Re-exports
pub use artifact::{Artifact, IdentityFields, Location, UNKNOWN_TYPE};
pub use path::{PathSegment, StructuralPath};
pub use value::{DocValue, Mapping};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn artifact_body_and_paths_agree() {
        let artifact = Artifact::new(
            "risk-register.json",
            DocValue::from(json!({
                "id": "rr-001",
                "@type": "RiskRegister",
                "risks": [{"id": "RISK-001", "affectedArtifacts": ["pc-001"]}]
            })),
        );

        let path = StructuralPath::single("risks")
            .index(0)
            .key("affectedArtifacts")
            .index(0);
        assert_eq!(path.to_string(), "/risks[0].affectedArtifacts[0]");

        let risks = artifact.body().get("risks").and_then(DocValue::as_sequence);
        assert_eq!(risks.map(<[DocValue]>::len), Some(1));
    }
}
