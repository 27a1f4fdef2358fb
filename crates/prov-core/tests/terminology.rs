//! Terminology reconciliation through the validator

use pretty_assertions::assert_eq;
use prov_core::prelude::*;
use prov_test_utils::{dictionary, init_tracing, ArtifactBuilder};
use serde_json::json;

fn order_dictionary() -> Artifact {
    dictionary(json!([
        { "id": "term-order-001", "term": "Order", "dataType": "object", "synonyms": ["注文", "オーダー"] },
        { "id": "term-order-id-001", "term": "OrderId", "dataType": "string" },
        {
            "id": "term-email-001",
            "term": "Email",
            "dataType": "string",
            "constraints": { "required": true, "unique": true }
        },
        { "id": "term-old-field-001", "term": "OldField", "deprecated": true, "replacedBy": "term-new-field-001" },
        { "id": "term-new-field-001", "term": "NewField" }
    ]))
}

fn model(entities: serde_json::Value) -> Artifact {
    ArtifactBuilder::new("cdm-001", "ConceptualDataModel")
        .field("entities", entities)
        .build()
}

fn kinds(report: &ValidationReport) -> Vec<IssueKind> {
    report.issues().map(|i| i.kind).collect()
}

fn validate(artifacts: &[Artifact]) -> ValidationReport {
    init_tracing();
    Validator::default().validate(artifacts)
}

#[test]
fn dictionary_is_discovered_by_type() {
    let report = validate(&[
        order_dictionary(),
        model(json!([
            { "name": "Order", "termReference": "term-order-001" },
            { "name": "Customer", "termReference": "term-customer-999" }
        ])),
    ]);

    assert_eq!(kinds(&report), vec![IssueKind::MissingTermReference]);
    let issue = report.issues().next().unwrap();
    assert_eq!(issue.source_id, "cdm-001");
    assert_eq!(issue.referenced_id.as_deref(), Some("term-customer-999"));
    assert!(!report.is_valid());
}

#[test]
fn deprecated_term_is_a_warning_only() {
    let report = validate(&[
        order_dictionary(),
        model(json!([{ "name": "x", "termReference": "term-old-field-001" }])),
    ]);

    assert_eq!(kinds(&report), vec![IssueKind::DeprecatedTermUsed]);
    assert!(report.issues().next().unwrap().message.contains("term-new-field-001"));
    assert!(report.is_valid());
}

#[test]
fn type_mismatch_and_constraints_at_nested_sites() {
    let report = validate(&[
        order_dictionary(),
        model(json!([{
            "name": "User",
            "attributes": [
                { "name": "orderId", "dataType": "integer", "termReference": "term-order-id-001" },
                {
                    "name": "email",
                    "dataType": "string",
                    "termReference": "term-email-001",
                    "constraints": { "required": false, "unique": false }
                }
            ]
        }])),
    ]);

    assert_eq!(
        kinds(&report),
        vec![
            IssueKind::TermTypeMismatch,
            IssueKind::TermConstraintViolation,
            IssueKind::TermConstraintViolation,
        ]
    );
    let paths: Vec<_> = report.issues().map(|i| i.path.to_string()).collect();
    assert_eq!(
        paths,
        vec![
            "/entities[0].attributes[0].termReference",
            "/entities[0].attributes[1].termReference",
            "/entities[0].attributes[1].termReference",
        ]
    );
}

#[test]
fn synonym_usage_is_informational() {
    let report = validate(&[
        order_dictionary(),
        model(json!([{ "name": "注文", "termReference": "term-order-001" }])),
    ]);

    let synonyms: Vec<_> = report.issues_with(Severity::Info).collect();
    assert_eq!(synonyms.len(), 1);
    assert_eq!(synonyms[0].kind, IssueKind::SynonymUsed);
    assert!(synonyms[0].message.contains("注文"));
    assert!(synonyms[0].message.contains("Order"));
    assert!(report.is_valid());
}

#[test]
fn no_dictionary_means_no_terminology_issues() {
    let report = validate(&[model(json!([{ "termReference": "term-anything" }]))]);
    assert!(report.is_valid());
    assert_eq!(report.summary().total(), 0);
}

#[test]
fn skip_terminology_ignores_the_dictionary() {
    let validator = Validator::with_options(
        PolicyConfig::default(),
        ValidatorOptions::new().skip_terminology(),
    );
    let report = validator.validate(&[
        order_dictionary(),
        model(json!([{ "termReference": "term-nonexistent-999" }])),
    ]);
    assert!(report.is_valid());
    assert_eq!(report.summary().total(), 0);
}

#[test]
fn provided_glossary_overrides_discovery() {
    let glossary = Glossary::from_terms([GlossaryTerm::new("term-only-001", "Only")]);
    let validator = Validator::with_options(
        PolicyConfig::default(),
        ValidatorOptions::new().with_glossary(glossary),
    );
    let report = validator.validate(&[
        order_dictionary(),
        model(json!([
            { "termReference": "term-only-001" },
            { "termReference": "term-order-001" }
        ])),
    ]);

    // dictionary in the corpus is ignored; its own body is now reconciled too
    let missing: Vec<_> = report
        .issues()
        .filter(|i| i.kind == IssueKind::MissingTermReference)
        .map(|i| i.referenced_id.as_deref())
        .collect();
    assert_eq!(missing, vec![Some("term-order-001")]);
}
