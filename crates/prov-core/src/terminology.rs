//! Terminology reconciliation
//!
//! Cross-checks term reference sites against the glossary:
//! 1. unknown term id → `missing-term-reference`
//! 2. deprecated term → `deprecated-term-used`
//! 3. site data type differs from the glossary → `term-type-mismatch`
//! 4. glossary constraint stricter than the site → `term-constraint-violation`
//!
//! Independently, the document's string values are scanned for glossary
//! synonyms (`synonym-used`). Keys, ids and term references are not prose
//! and are left out of the scan. Without a glossary nothing is reported.

use crate::issue::{IssueKind, ValidationIssue};
use prov_artifact::{DocValue, Mapping, StructuralPath};
use prov_config::{Glossary, GlossaryTerm, PolicyConfig};

/// Reconciles one artifact body against an optional glossary
#[derive(Debug, Clone)]
pub struct TerminologyReconciler {
    id_field: String,
    term_field: String,
    data_type_field: String,
    constraints_field: String,
}

impl TerminologyReconciler {
    /// Create reconciler using the policy's marker field names
    #[must_use]
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            id_field: policy.identity.id_field.clone(),
            term_field: policy.term_reference_field.clone(),
            data_type_field: policy.data_type_field.clone(),
            constraints_field: policy.constraints_field.clone(),
        }
    }

    /// All terminology issues for one body
    #[must_use]
    pub fn reconcile(
        &self,
        source_id: &str,
        body: &DocValue,
        glossary: Option<&Glossary>,
    ) -> Vec<ValidationIssue> {
        let Some(glossary) = glossary else {
            return Vec::new();
        };

        let mut issues = Vec::new();
        self.walk(source_id, body, &StructuralPath::root(), glossary, &mut issues);
        issues.extend(self.synonym_issues(source_id, body, glossary));
        issues
    }

    fn walk(
        &self,
        source_id: &str,
        value: &DocValue,
        path: &StructuralPath,
        glossary: &Glossary,
        issues: &mut Vec<ValidationIssue>,
    ) {
        match value {
            DocValue::Mapping(site) => {
                if let Some(term_id) = site.get(&self.term_field).and_then(DocValue::as_str) {
                    let site_path = path.key(self.term_field.as_str());
                    self.check_site(source_id, term_id, site, &site_path, glossary, issues);
                }
                for (key, child) in site {
                    if child.is_container() {
                        self.walk(source_id, child, &path.key(key.as_str()), glossary, issues);
                    }
                }
            }
            DocValue::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if item.is_container() {
                        self.walk(source_id, item, &path.index(i), glossary, issues);
                    }
                }
            }
            _ => {}
        }
    }

    fn check_site(
        &self,
        source_id: &str,
        term_id: &str,
        site: &Mapping,
        path: &StructuralPath,
        glossary: &Glossary,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let issue = |kind, message: String| {
            ValidationIssue::new(kind, source_id, path.clone(), message)
                .with_referenced(term_id)
                .with_field(self.term_field.as_str())
        };

        let Some(term) = glossary.get(term_id) else {
            issues.push(issue(
                IssueKind::MissingTermReference,
                format!("Term \"{term_id}\" is not defined in the data dictionary"),
            ));
            return;
        };

        if term.deprecated {
            let hint = term
                .replaced_by
                .as_deref()
                .map(|r| format!(", use \"{r}\" instead"))
                .unwrap_or_default();
            issues.push(issue(
                IssueKind::DeprecatedTermUsed,
                format!("Term \"{term_id}\" ({}) is deprecated{hint}", term.name),
            ));
        }

        let site_type = site.get(&self.data_type_field).and_then(DocValue::as_str);
        if let (Some(site_type), Some(term_type)) = (site_type, term.data_type.as_deref()) {
            if site_type != term_type {
                issues.push(issue(
                    IssueKind::TermTypeMismatch,
                    format!(
                        "Data type \"{site_type}\" does not match term \"{term_id}\" ({}) which declares \"{term_type}\"",
                        term.name
                    ),
                ));
            }
        }

        if let Some(declared) = site.get(&self.constraints_field).and_then(DocValue::as_mapping) {
            for violated in stricter_constraints(term, declared) {
                issues.push(issue(
                    IssueKind::TermConstraintViolation,
                    format!(
                        "Term \"{term_id}\" ({}) requires {violated}: true, but this field declares otherwise",
                        term.name
                    ),
                ));
            }
        }
    }

    /// One `synonym-used` issue per synonym found in a prose string value
    fn synonym_issues(&self, source_id: &str, body: &DocValue, glossary: &Glossary) -> Vec<ValidationIssue> {
        let mut prose = Vec::new();
        self.collect_prose(body, &mut prose);

        glossary
            .terms()
            .flat_map(|term| term.synonyms.iter().map(move |s| (term, s)))
            .filter(|(_, synonym)| prose.iter().any(|text| text.contains(synonym.as_str())))
            .map(|(term, synonym)| {
                ValidationIssue::new(
                    IssueKind::SynonymUsed,
                    source_id,
                    StructuralPath::root(),
                    format!(
                        "\"{synonym}\" is a synonym of \"{}\", consider using the canonical term",
                        term.name
                    ),
                )
                .with_referenced(term.id.as_str())
            })
            .collect()
    }

    fn collect_prose<'a>(&self, value: &'a DocValue, prose: &mut Vec<&'a str>) {
        match value {
            DocValue::String(text) => prose.push(text),
            DocValue::Sequence(items) => {
                for item in items {
                    self.collect_prose(item, prose);
                }
            }
            DocValue::Mapping(map) => {
                for (key, child) in map {
                    if *key != self.id_field && *key != self.term_field {
                        self.collect_prose(child, prose);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Glossary constraints set to `true` that the site does not also set to `true`
fn stricter_constraints<'a>(term: &'a GlossaryTerm, site: &'a Mapping) -> impl Iterator<Item = &'a str> {
    term.constraints
        .iter()
        .filter(|(_, required)| **required)
        .filter(move |(name, _)| site.get(name.as_str()).and_then(DocValue::as_bool) != Some(true))
        .map(|(name, _)| name.as_str())
}
