//! Static validation policy
//!
//! [`PolicyConfig`] is the immutable configuration object handed to every
//! component: relationship vocabulary, provenance field, glossary marker
//! fields, the type-alias table and per-type provenance rules.
//!
//! Loaded once from declarative data (JSON, YAML or TOML); omitted fields
//! fall back to the built-in artifact policy.

use crate::error::{ConfigError, ConfigResult};
use prov_artifact::IdentityFields;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Which artifact types a given type may derive from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRule", into = "RawRule")]
pub enum ProvenanceRule {
    /// Starting point of a chain: must not declare any provenance edge
    Root,

    /// May derive only from the listed canonical types
    AllowList(BTreeSet<String>),

    /// Accepts provenance edges from any type
    ContinuousInputs,
}

impl ProvenanceRule {
    /// Build an allow-list rule; an empty list yields [`ProvenanceRule::Root`]
    #[must_use]
    pub fn allow<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = inputs.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::Root
        } else {
            Self::AllowList(set)
        }
    }

    /// Check whether an edge to `input_type` is permitted
    #[must_use]
    pub fn permits(&self, input_type: &str) -> bool {
        match self {
            Self::Root => false,
            Self::AllowList(allowed) => allowed.contains(input_type),
            Self::ContinuousInputs => true,
        }
    }
}

/// Declarative rule shape: `{ "inputs": [..] }` or `{ "continuousInputs": true }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawRule {
    inputs: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    continuous_inputs: bool,
}

impl From<RawRule> for ProvenanceRule {
    fn from(raw: RawRule) -> Self {
        if raw.continuous_inputs {
            Self::ContinuousInputs
        } else {
            Self::allow(raw.inputs)
        }
    }
}

impl From<ProvenanceRule> for RawRule {
    fn from(rule: ProvenanceRule) -> Self {
        match rule {
            ProvenanceRule::Root => Self::default(),
            ProvenanceRule::AllowList(allowed) => Self {
                inputs: allowed.into_iter().collect(),
                continuous_inputs: false,
            },
            ProvenanceRule::ContinuousInputs => Self {
                inputs: Vec::new(),
                continuous_inputs: true,
            },
        }
    }
}

/// Validation policy shared by all components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyConfig {
    /// Body fields carrying artifact identity
    pub identity: IdentityFields,

    /// Fields whose string values are cross-document references
    pub relationship_fields: Vec<String>,

    /// The one relationship field that forms provenance edges
    pub provenance_field: String,

    /// Field marking a glossary term reference site
    pub term_reference_field: String,

    /// Data type field at a term reference site
    pub data_type_field: String,

    /// Constraint mapping field at a term reference site
    pub constraints_field: String,

    /// Canonical type of the glossary (data dictionary) artifact
    pub glossary_type: String,

    /// Canonical type → accepted non-canonical spellings
    pub type_aliases: BTreeMap<String, Vec<String>>,

    /// Canonical type → provenance rule
    pub rules: BTreeMap<String, ProvenanceRule>,
}

impl PolicyConfig {
    /// Built-in policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load policy from a file, dispatching on extension
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::UnsupportedFormat` for unknown extensions
    /// - syntax or semantic errors from the matching loader
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;

        let config = match ext.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "toml" => Self::from_toml_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::debug!(
            path = %path.display(),
            rules = config.rules.len(),
            aliases = config.type_aliases.len(),
            "loaded policy"
        );
        Ok(config)
    }

    /// Load policy from JSON text
    ///
    /// # Errors
    /// Returns error on malformed JSON or an inconsistent policy
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load policy from YAML text
    ///
    /// # Errors
    /// Returns error on malformed YAML or an inconsistent policy
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load policy from TOML text
    ///
    /// # Errors
    /// Returns error on malformed TOML or an inconsistent policy
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check semantic consistency of the tables
    ///
    /// # Errors
    /// - `ConfigError::EmptyField` if a required field name is empty
    /// - `ConfigError::ProvenanceFieldNotInVocabulary`
    /// - `ConfigError::DuplicateAlias` if two canonical types claim one alias
    pub fn validate(&self) -> ConfigResult<()> {
        if self.identity.id_field.is_empty() {
            return Err(ConfigError::EmptyField("identity.idField"));
        }
        if self.identity.type_fields.is_empty() {
            return Err(ConfigError::EmptyField("identity.typeFields"));
        }
        if self.provenance_field.is_empty() {
            return Err(ConfigError::EmptyField("provenanceField"));
        }
        if self.term_reference_field.is_empty() {
            return Err(ConfigError::EmptyField("termReferenceField"));
        }
        if !self.is_relationship_field(&self.provenance_field) {
            return Err(ConfigError::ProvenanceFieldNotInVocabulary(
                self.provenance_field.clone(),
            ));
        }

        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for (canonical, aliases) in &self.type_aliases {
            for alias in aliases {
                if let Some(first) = claimed.insert(alias.as_str(), canonical.as_str()) {
                    if first != canonical.as_str() {
                        return Err(ConfigError::DuplicateAlias {
                            alias: alias.clone(),
                            first: first.to_string(),
                            second: canonical.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Check if a field belongs to the relationship vocabulary
    #[inline]
    #[must_use]
    pub fn is_relationship_field(&self, field: &str) -> bool {
        self.relationship_fields.iter().any(|f| f == field)
    }

    /// Check if a field is the provenance field
    #[inline]
    #[must_use]
    pub fn is_provenance_field(&self, field: &str) -> bool {
        self.provenance_field == field
    }

    /// Provenance rule for a canonical type
    #[inline]
    #[must_use]
    pub fn rule_for(&self, canonical_type: &str) -> Option<&ProvenanceRule> {
        self.rules.get(canonical_type)
    }

    /// With a different relationship vocabulary
    #[must_use]
    pub fn with_relationship_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationship_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// With an added or replaced provenance rule
    #[must_use]
    pub fn with_rule(mut self, canonical_type: impl Into<String>, rule: ProvenanceRule) -> Self {
        self.rules.insert(canonical_type.into(), rule);
        self
    }

    /// With added aliases for a canonical type
    #[must_use]
    pub fn with_aliases<I, S>(mut self, canonical_type: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_aliases
            .entry(canonical_type.into())
            .or_default()
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Policy with no rules and no aliases, keeping field names
    #[must_use]
    pub fn without_tables(mut self) -> Self {
        self.rules.clear();
        self.type_aliases.clear();
        self
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            identity: IdentityFields::default(),
            relationship_fields: DEFAULT_RELATIONSHIP_FIELDS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
            provenance_field: "derivedFrom".to_string(),
            term_reference_field: "termReference".to_string(),
            data_type_field: "dataType".to_string(),
            constraints_field: "constraints".to_string(),
            glossary_type: "data-dictionary".to_string(),
            type_aliases: DEFAULT_ALIASES
                .iter()
                .map(|(canonical, aliases)| {
                    (
                        (*canonical).to_string(),
                        aliases.iter().map(|a| (*a).to_string()).collect(),
                    )
                })
                .collect(),
            rules: default_rules(),
        }
    }
}

const DEFAULT_RELATIONSHIP_FIELDS: &[&str] = &[
    "derivedFrom",
    "satisfies",
    "relatedDocuments",
    "affectedArtifacts",
    "relatedDecisions",
    "parentId",
    "childIds",
    "dependsOn",
    "blocks",
    "relates",
];

const DEFAULT_ALIASES: &[(&str, &[&str])] = &[
    ("project-charter", &["PM-CHARTER"]),
    ("roadmap", &["PM-ROADMAP"]),
    ("risk-register", &["PM-RISK", "RiskLog"]),
    ("business-goal", &["BIZ-GOAL"]),
    ("user-story", &["BIZ-STORY"]),
    ("use-case", &["BIZ-USECASE", "REQ-USECASE"]),
    (
        "functional-requirements",
        &["REQ-FUNCTIONAL", "functional-requirement"],
    ),
    (
        "non-functional-requirements",
        &["REQ-NONFUNCTIONAL", "non-functional-requirement"],
    ),
    ("conceptual-data-model", &["DATA-CONCEPTUAL"]),
    ("logical-data-model", &["DATA-LOGICAL"]),
    ("data-dictionary", &["DATA-DICT", "DATA-DICTIONARY"]),
    (
        "ui-ux-specification",
        &["UIUXSpecification", "u-i-u-x-specification", "DESIGN-UIUX"],
    ),
    ("system-architecture", &["ARCH-SYSTEM"]),
    (
        "architecture-decision-record",
        &["ADR", "a-d-r", "ARCH-ADR"],
    ),
    ("test-plan", &["QA-TESTPLAN"]),
];

fn default_rules() -> BTreeMap<String, ProvenanceRule> {
    let allow: &[(&str, &[&str])] = &[
        ("project-charter", &[]),
        ("roadmap", &["project-charter", "business-goal"]),
        ("business-goal", &["project-charter"]),
        ("user-story", &["business-goal"]),
        ("use-case", &["business-goal", "user-story"]),
        (
            "functional-requirements",
            &["business-goal", "use-case", "user-story"],
        ),
        (
            "non-functional-requirements",
            &["business-goal", "functional-requirements"],
        ),
        ("conceptual-data-model", &["functional-requirements", "use-case"]),
        ("data-dictionary", &["conceptual-data-model"]),
        ("logical-data-model", &["conceptual-data-model", "data-dictionary"]),
        ("data-model", &["conceptual-data-model", "data-dictionary"]),
        (
            "ui-ux-specification",
            &["functional-requirements", "use-case", "user-story"],
        ),
        (
            "system-architecture",
            &["functional-requirements", "non-functional-requirements"],
        ),
        (
            "test-plan",
            &["functional-requirements", "non-functional-requirements"],
        ),
    ];

    let mut rules: BTreeMap<String, ProvenanceRule> = allow
        .iter()
        .map(|(ty, inputs)| ((*ty).to_string(), ProvenanceRule::allow(inputs.iter().copied())))
        .collect();

    for continuous in ["risk-register", "architecture-decision-record"] {
        rules.insert(continuous.to_string(), ProvenanceRule::ContinuousInputs);
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn default_policy_is_valid() {
        assert!(PolicyConfig::default().validate().is_ok());
    }

    #[test]
    fn default_rule_shapes() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.rule_for("project-charter"), Some(&ProvenanceRule::Root));
        assert_eq!(
            policy.rule_for("risk-register"),
            Some(&ProvenanceRule::ContinuousInputs)
        );
        assert!(policy.rule_for("user-story").unwrap().permits("business-goal"));
        assert!(!policy.rule_for("user-story").unwrap().permits("roadmap"));
        assert_eq!(policy.rule_for("no-such-type"), None);
    }

    #[test]
    fn empty_allow_list_is_root() {
        assert_eq!(ProvenanceRule::allow(Vec::<String>::new()), ProvenanceRule::Root);
        assert!(!ProvenanceRule::Root.permits("anything"));
        assert!(ProvenanceRule::ContinuousInputs.permits("anything"));
    }

    #[test]
    fn json_rules_use_declarative_shape() {
        let policy = PolicyConfig::from_json_str(
            r#"{
                "rules": {
                    "charter": { "inputs": [] },
                    "story": { "inputs": ["goal"] },
                    "log": { "continuousInputs": true, "inputs": ["ignored"] }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(policy.rule_for("charter"), Some(&ProvenanceRule::Root));
        assert_eq!(policy.rule_for("story"), Some(&ProvenanceRule::allow(["goal"])));
        assert_eq!(policy.rule_for("log"), Some(&ProvenanceRule::ContinuousInputs));
        // omitted fields keep built-in defaults
        assert_eq!(policy.provenance_field, "derivedFrom");
        assert!(policy.is_relationship_field("satisfies"));
    }

    #[test]
    fn yaml_policy_loads() {
        let policy = PolicyConfig::from_yaml_str(
            "relationshipFields: [derivedFrom, uses]\n\
             typeAliases:\n  goal: [GOAL]\n\
             rules:\n  story:\n    inputs: [goal]\n",
        )
        .unwrap();

        assert!(policy.is_relationship_field("uses"));
        assert!(!policy.is_relationship_field("satisfies"));
        assert_eq!(policy.type_aliases.get("goal"), Some(&vec!["GOAL".to_string()]));
    }

    #[test]
    fn toml_policy_loads() {
        let policy = PolicyConfig::from_toml_str(
            r#"
            provenanceField = "derivedFrom"

            [rules.story]
            inputs = ["goal"]

            [rules.adr]
            continuousInputs = true
            "#,
        )
        .unwrap();

        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rule_for("adr"), Some(&ProvenanceRule::ContinuousInputs));
    }

    #[test]
    fn rejects_provenance_field_outside_vocabulary() {
        let result = PolicyConfig::from_json_str(
            r#"{ "relationshipFields": ["satisfies"], "provenanceField": "derivedFrom" }"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::ProvenanceFieldNotInVocabulary(f)) if f == "derivedFrom"
        ));
    }

    #[test]
    fn rejects_alias_claimed_twice() {
        let policy = PolicyConfig::default()
            .without_tables()
            .with_aliases("a", ["X"])
            .with_aliases("b", ["X"]);
        assert!(matches!(
            policy.validate(),
            Err(ConfigError::DuplicateAlias { alias, .. }) if alias == "X"
        ));
    }

    #[test]
    fn rejects_empty_id_field() {
        let mut policy = PolicyConfig::default();
        policy.identity.id_field.clear();
        assert!(matches!(policy.validate(), Err(ConfigError::EmptyField(_))));
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "rules:\n  story:\n    inputs: [goal]").unwrap();

        let policy = PolicyConfig::from_path(file.path()).unwrap();
        assert_eq!(policy.rule_for("story"), Some(&ProvenanceRule::allow(["goal"])));
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = PolicyConfig::from_path(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PolicyConfig::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn rules_serialize_back_to_declarative_shape() {
        let policy = PolicyConfig::default()
            .without_tables()
            .with_rule("charter", ProvenanceRule::Root)
            .with_rule("log", ProvenanceRule::ContinuousInputs);
        let json = serde_json::to_value(&policy.rules).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "charter": { "inputs": [] },
                "log": { "inputs": [], "continuousInputs": true }
            })
        );
    }
}
