//! Provenance rule engine
//!
//! Decides whether an artifact of one canonical type may derive from an
//! artifact of another. Only edges whose target is indexed reach this
//! engine; missing targets are an existence problem, not a type problem.

use crate::issue::{IssueKind, ValidationIssue};
use prov_config::{PolicyConfig, ProvenanceRule};
use prov_index::Reference;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Why a provenance edge was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// Source type is a chain root and must not derive from anything
    RootDerives,

    /// Target type is outside the source type's allow-list
    NotAllowed {
        /// Types the source may derive from
        allowed: BTreeSet<String>,
    },
}

/// Evaluates provenance edges against the policy's rule table
#[derive(Debug, Clone)]
pub struct ProvenanceRuleEngine {
    policy: Arc<PolicyConfig>,
}

impl ProvenanceRuleEngine {
    /// Create engine over a shared policy
    #[inline]
    #[must_use]
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self { policy }
    }

    /// Evaluate one edge between canonical types
    ///
    /// # Errors
    /// Returns the violated rule; unknown source types always pass
    pub fn evaluate(&self, source_type: &str, target_type: &str) -> Result<(), RuleViolation> {
        match self.policy.rule_for(source_type) {
            None | Some(ProvenanceRule::ContinuousInputs) => Ok(()),
            Some(ProvenanceRule::Root) => Err(RuleViolation::RootDerives),
            Some(ProvenanceRule::AllowList(allowed)) if allowed.contains(target_type) => Ok(()),
            Some(ProvenanceRule::AllowList(allowed)) => Err(RuleViolation::NotAllowed {
                allowed: allowed.clone(),
            }),
        }
    }

    /// Check a resolved provenance reference
    ///
    /// `declared_type` is the source type as written, used in messages;
    /// `source_type` and `target_type` are canonical. Non-provenance
    /// references always pass.
    #[must_use]
    pub fn check(
        &self,
        reference: &Reference,
        declared_type: &str,
        source_type: &str,
        target_type: &str,
    ) -> Option<ValidationIssue> {
        if !reference.is_provenance {
            return None;
        }

        let message = match self.evaluate(source_type, target_type).err()? {
            RuleViolation::RootDerives => format!(
                "{declared_type} should not have {} references (starting point artifact)",
                reference.field
            ),
            RuleViolation::NotAllowed { allowed } => format!(
                "{declared_type} can only derive from [{}], but found {target_type}",
                allowed.into_iter().collect::<Vec<_>>().join(", ")
            ),
        };

        Some(
            ValidationIssue::new(
                IssueKind::InvalidInputType,
                reference.source_id.as_str(),
                reference.path.clone(),
                message,
            )
            .with_referenced(reference.target_id.as_str())
            .with_field(reference.field.as_str()),
        )
    }
}
