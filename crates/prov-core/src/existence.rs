//! Existence checking
//!
//! Every reference, provenance or not, must name an indexed artifact.

use crate::issue::{IssueKind, ValidationIssue};
use prov_index::{CorpusIndex, Reference};

/// Report a reference whose target is not in the index
#[must_use]
pub fn check_existence(reference: &Reference, index: &CorpusIndex) -> Option<ValidationIssue> {
    if index.contains(&reference.target_id) {
        return None;
    }

    Some(
        ValidationIssue::new(
            IssueKind::MissingReference,
            reference.source_id.as_str(),
            reference.path.clone(),
            format!("Referenced document \"{}\" does not exist", reference.target_id),
        )
        .with_referenced(reference.target_id.as_str())
        .with_field(reference.field.as_str()),
    )
}
