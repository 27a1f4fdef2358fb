//! Provenance Core
//!
//! Corpus-wide referential and provenance validation for typed artifacts.
//!
//! # Overview
//!
//! - **Existence**: every reference names an indexed artifact
//! - **Provenance rules**: which canonical types may derive from which
//! - **Cycles**: provenance chains must not loop back on themselves
//! - **Terminology**: term references agree with the glossary
//! - **Validator**: sequences the phases and decides pass/fail
//!
//! Findings are [`ValidationIssue`] data, never Rust errors. The corpus is
//! valid iff no issue has [`Severity::Error`].
//!
//! # Example
//!
//! ```rust
//! use prov_artifact::{Artifact, DocValue};
//! use prov_core::{IssueKind, Validator};
//! use serde_json::json;
//!
//! let artifacts = vec![
//!     Artifact::new("bg.json", DocValue::from(json!({"id": "bg-001", "@type": "BusinessGoal"}))),
//!     Artifact::new("us.json", DocValue::from(json!({
//!         "id": "us-001",
//!         "@type": "UserStory",
//!         "traceability": { "derivedFrom": ["bg-001", "roadmap-999"] }
//!     }))),
//! ];
//!
//! let report = Validator::default().validate(&artifacts);
//!
//! assert!(!report.is_valid());
//! let kinds: Vec<_> = report.issues().map(|i| i.kind).collect();
//! assert_eq!(kinds, vec![IssueKind::MissingReference]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cycles;
pub mod existence;
pub mod issue;
pub mod provenance;
pub mod terminology;
pub mod validator;

// Re-exports for convenience
pub use cycles::{DetectedCycle, ProvenanceEdge, ProvenanceGraph};
pub use existence::check_existence;
pub use issue::{IssueKind, IssueSummary, Severity, ValidationIssue};
pub use provenance::{ProvenanceRuleEngine, RuleViolation};
pub use terminology::TerminologyReconciler;
pub use validator::{
    ArtifactReport, CorpusContext, GlossarySource, ValidationReport, Validator, ValidatorOptions,
    UNKNOWN_SOURCE,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for validating a corpus
    pub use crate::issue::{IssueKind, Severity, ValidationIssue};
    pub use crate::validator::{ValidationReport, Validator, ValidatorOptions};
    pub use prov_artifact::{Artifact, DocValue, Location};
    pub use prov_config::{Glossary, GlossaryTerm, PolicyConfig, ProvenanceRule};
    pub use prov_index::CorpusIndex;
}
