//! Provenance Configuration Layer
//!
//! Immutable inputs every validation component is constructed from.
//!
//! # Core Operations
//!
//! - **Policy**: Load [`PolicyConfig`] (relationship vocabulary, alias table,
//!   provenance rules) from JSON, YAML or TOML
//! - **Canonicalize**: Map declared type spellings to canonical types
//! - **Glossary**: Load the optional data dictionary
//! - **Ingress**: Parse document text into `Artifact`s
//!
//! # Example
//!
//! ```rust
//! use prov_config::{PolicyConfig, ProvenanceRule, TypeCanonicalizer};
//!
//! let policy = PolicyConfig::from_yaml_str(
//!     "rules:\n  user-story:\n    inputs: [business-goal]\n",
//! )
//! .unwrap();
//! let canonicalizer = TypeCanonicalizer::new(&policy);
//!
//! let story = canonicalizer.canonicalize("UserStory");
//! assert_eq!(story, "user-story");
//! assert!(policy.rule_for(&story).is_some_and(|r| r.permits("business-goal")));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod canonical;
pub mod error;
pub mod glossary;
pub mod parsers;
pub mod policy;

// Re-exports for convenience
pub use canonical::TypeCanonicalizer;
pub use error::{ConfigError, ConfigResult, ParseError};
pub use glossary::{Glossary, GlossaryTerm};
pub use policy::{PolicyConfig, ProvenanceRule};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with policy and glossary configuration
    pub use crate::canonical::TypeCanonicalizer;
    pub use crate::error::{ConfigError, ParseError};
    pub use crate::glossary::{Glossary, GlossaryTerm};
    pub use crate::parsers::{default_parsers, DocumentParser, JsonParser, YamlParser};
    pub use crate::policy::{PolicyConfig, ProvenanceRule};
    pub use prov_artifact::{Artifact, DocValue, Location};
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::parsers::default_parsers;
    use std::path::Path;

    #[test]
    fn parsed_glossary_is_located_by_canonical_type() {
        let policy = PolicyConfig::default();
        let canonicalizer = TypeCanonicalizer::new(&policy);
        let registry = default_parsers();

        let dictionary = registry
            .parse(
                Path::new("dictionary.yaml"),
                "id: dd-001\ntype: DataDictionary\nterms:\n  - id: term-order-001\n    canonicalName: Order\n",
                &policy.identity,
            )
            .unwrap();

        let glossary = Glossary::locate(&[dictionary], &policy, &canonicalizer).unwrap();
        assert_eq!(glossary.get("term-order-001").map(|t| t.name.as_str()), Some("Order"));
    }
}
