//! Testing utilities for the provenance workspace
//!
//! Shared fixtures: artifact builders, glossary documents, a small policy,
//! and tracing set-up for test runs.

#![allow(missing_docs)]

use prov_artifact::{Artifact, DocValue};
use prov_config::{PolicyConfig, ProvenanceRule};
use serde_json::{json, Value};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honouring `RUST_LOG` (idempotent)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Artifact at `location` from a JSON body
pub fn artifact(location: &str, body: Value) -> Artifact {
    Artifact::new(location, DocValue::from(body))
}

/// Builder for artifact fixtures
#[derive(Debug, Clone)]
pub struct ArtifactBuilder {
    location: String,
    body: serde_json::Map<String, Value>,
}

impl ArtifactBuilder {
    /// Artifact with `id` and `@type`, stored at `<id>.json`
    pub fn new(id: &str, declared_type: &str) -> Self {
        let mut body = serde_json::Map::new();
        body.insert("id".to_string(), json!(id));
        body.insert("@type".to_string(), json!(declared_type));
        Self {
            location: format!("{id}.json"),
            body,
        }
    }

    /// Artifact with a type but no id
    pub fn without_id(location: &str, declared_type: &str) -> Self {
        let mut body = serde_json::Map::new();
        body.insert("@type".to_string(), json!(declared_type));
        Self {
            location: location.to_string(),
            body,
        }
    }

    /// Override location
    pub fn at(mut self, location: &str) -> Self {
        self.location = location.to_string();
        self
    }

    /// Set `traceability.derivedFrom`
    pub fn derived_from(self, targets: &[&str]) -> Self {
        self.field("traceability", json!({ "derivedFrom": targets }))
    }

    /// Set an arbitrary top-level field
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.body.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Artifact {
        artifact(&self.location, Value::Object(self.body))
    }
}

/// Shorthand for `ArtifactBuilder::new(id, ty).derived_from(from).build()`
pub fn derived(id: &str, declared_type: &str, from: &[&str]) -> Artifact {
    ArtifactBuilder::new(id, declared_type).derived_from(from).build()
}

/// Data dictionary artifact `dd-001` holding `terms`
pub fn dictionary(terms: Value) -> Artifact {
    ArtifactBuilder::new("dd-001", "data-dictionary")
        .at("data-dictionary.json")
        .field("terms", terms)
        .build()
}

/// Small three-level policy: charter → goal → story, plus a free-form log
pub fn sample_policy() -> PolicyConfig {
    PolicyConfig::default()
        .without_tables()
        .with_rule("charter", ProvenanceRule::Root)
        .with_rule("goal", ProvenanceRule::allow(["charter"]))
        .with_rule("story", ProvenanceRule::allow(["goal"]))
        .with_rule("log", ProvenanceRule::ContinuousInputs)
        .with_aliases("story", ["STORY"])
}

/// Linear provenance chain `n0 ← n1 ← … ← n{len-1}` of unruled `Note`s
pub fn chain(len: usize) -> Vec<Artifact> {
    (0..len)
        .map(|i| {
            let id = format!("n{i}");
            if i == 0 {
                ArtifactBuilder::new(&id, "Note").build()
            } else {
                derived(&id, "Note", &[&format!("n{}", i - 1)])
            }
        })
        .collect()
}
