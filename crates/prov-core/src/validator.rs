//! Validation orchestrator
//!
//! Sequences the checks over a corpus:
//!
//! ```text
//! artifacts ─→ prepare (index + glossary) ─→ check_artifact × N (parallel) ─→ finish (duplicates + cycles)
//! ```
//!
//! The index is complete before any per-artifact check starts. Per-artifact
//! checks share only immutable state, so they run on a bounded worker pool
//! and their reports are kept in scan order. Cycle detection runs once over
//! the provenance edges of every report handed to [`Validator::finish`].

use crate::cycles::{ProvenanceEdge, ProvenanceGraph};
use crate::existence::check_existence;
use crate::issue::{IssueKind, IssueSummary, Severity, ValidationIssue};
use crate::provenance::ProvenanceRuleEngine;
use crate::terminology::TerminologyReconciler;
use prov_artifact::{Artifact, Location, StructuralPath, UNKNOWN_TYPE};
use prov_config::{Glossary, PolicyConfig, TypeCanonicalizer};
use prov_index::{CorpusIndex, ReferenceExtractor};
use rayon::prelude::*;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Source id reported for artifacts without a usable id
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Where the glossary comes from
#[derive(Debug, Clone, Default)]
pub enum GlossarySource {
    /// First corpus artifact of the policy's glossary type
    #[default]
    Discover,

    /// Supplied by the caller
    Provided(Arc<Glossary>),

    /// Terminology reconciliation switched off
    Disabled,
}

/// Orchestrator options
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
    workers: Option<NonZeroUsize>,
    glossary: GlossarySource,
}

impl ValidatorOptions {
    /// Default options: worker per available core, glossary discovered
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the per-artifact worker pool (0 means available parallelism)
    #[inline]
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = NonZeroUsize::new(workers);
        self
    }

    /// Use this glossary instead of discovering one
    #[inline]
    #[must_use]
    pub fn with_glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = GlossarySource::Provided(Arc::new(glossary));
        self
    }

    /// Switch terminology reconciliation off
    #[inline]
    #[must_use]
    pub fn skip_terminology(mut self) -> Self {
        self.glossary = GlossarySource::Disabled;
        self
    }

    /// Effective worker count
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }

    /// Glossary source
    #[inline]
    #[must_use]
    pub fn glossary(&self) -> &GlossarySource {
        &self.glossary
    }
}

/// Corpus-wide state built before any per-artifact check
#[derive(Debug, Clone)]
pub struct CorpusContext {
    index: CorpusIndex,
    glossary: Option<Arc<Glossary>>,
    glossary_source: Option<Artifact>,
}

impl CorpusContext {
    /// Corpus index
    #[inline]
    #[must_use]
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    /// Loaded glossary, if any
    #[inline]
    #[must_use]
    pub fn glossary(&self) -> Option<&Glossary> {
        self.glossary.as_deref()
    }
}

/// Result of checking one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactReport {
    /// Artifact id, if usable
    pub id: Option<String>,

    /// Storage handle
    pub location: Location,

    /// Issues in check order
    pub issues: Vec<ValidationIssue>,

    #[serde(skip)]
    provenance: Vec<ProvenanceEdge>,
}

impl ArtifactReport {
    /// Check if artifact has no error-severity issue
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_error)
    }

    /// Provenance edges found in this artifact
    #[inline]
    #[must_use]
    pub fn provenance_edges(&self) -> &[ProvenanceEdge] {
        &self.provenance
    }
}

/// Corpus-wide validation result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    valid: bool,
    summary: IssueSummary,
    artifacts: Vec<ArtifactReport>,
    corpus_issues: Vec<ValidationIssue>,
    index: CorpusIndex,
}

impl ValidationReport {
    /// Corpus is valid iff no issue has error severity
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Issue counts per severity
    #[inline]
    #[must_use]
    pub fn summary(&self) -> IssueSummary {
        self.summary
    }

    /// Per-artifact reports in scan order
    #[inline]
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactReport] {
        &self.artifacts
    }

    /// Issues not tied to one artifact's checks (duplicates, cycles)
    #[inline]
    #[must_use]
    pub fn corpus_issues(&self) -> &[ValidationIssue] {
        &self.corpus_issues
    }

    /// Every issue: per-artifact issues in scan order, then corpus issues
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.artifacts
            .iter()
            .flat_map(|a| a.issues.iter())
            .chain(self.corpus_issues.iter())
    }

    /// Issues of one severity
    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues().filter(move |i| i.severity == severity)
    }

    /// Corpus index built for this run
    #[inline]
    #[must_use]
    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    /// Take the index for reuse by other phases
    #[inline]
    #[must_use]
    pub fn into_index(self) -> CorpusIndex {
        self.index
    }
}

/// Corpus validator
///
/// Construct once per policy; every run is a pure function of the artifacts
/// and the policy.
#[derive(Debug, Clone)]
pub struct Validator {
    policy: Arc<PolicyConfig>,
    options: ValidatorOptions,
    canonicalizer: TypeCanonicalizer,
    extractor: ReferenceExtractor,
    rules: ProvenanceRuleEngine,
    terminology: TerminologyReconciler,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl Validator {
    /// Create validator with default options
    #[must_use]
    pub fn new(policy: PolicyConfig) -> Self {
        Self::with_options(policy, ValidatorOptions::default())
    }

    /// Create validator with options
    #[must_use]
    pub fn with_options(policy: PolicyConfig, options: ValidatorOptions) -> Self {
        let policy = Arc::new(policy);
        Self {
            canonicalizer: TypeCanonicalizer::new(&policy),
            extractor: ReferenceExtractor::new(&policy),
            rules: ProvenanceRuleEngine::new(Arc::clone(&policy)),
            terminology: TerminologyReconciler::new(&policy),
            policy,
            options,
        }
    }

    /// Policy in use
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Validate a whole corpus
    #[must_use]
    pub fn validate(&self, artifacts: &[Artifact]) -> ValidationReport {
        let span = tracing::info_span!("validate", artifacts = artifacts.len());
        let _guard = span.enter();

        let context = self.prepare(artifacts);
        let reports = self.check_all(&context, artifacts);
        self.finish(context, reports)
    }

    /// Build the index and load the glossary
    #[must_use]
    pub fn prepare(&self, artifacts: &[Artifact]) -> CorpusContext {
        let index = CorpusIndex::build(artifacts, &self.canonicalizer);

        let (glossary, glossary_source) = match &self.options.glossary {
            GlossarySource::Disabled => (None, None),
            GlossarySource::Provided(glossary) => (Some(Arc::clone(glossary)), None),
            GlossarySource::Discover => {
                match Glossary::find_source(artifacts, &self.policy, &self.canonicalizer) {
                    Some(artifact) => (
                        Some(Arc::new(Glossary::from_artifact(artifact))),
                        Some(artifact.clone()),
                    ),
                    None => {
                        tracing::debug!("no glossary in corpus, terminology checks skipped");
                        (None, None)
                    }
                }
            }
        };

        CorpusContext {
            index,
            glossary,
            glossary_source,
        }
    }

    /// Run every per-artifact check on one artifact
    #[must_use]
    pub fn check_artifact(&self, context: &CorpusContext, artifact: &Artifact) -> ArtifactReport {
        let location = artifact.location().clone();

        let Some(id) = artifact.id() else {
            tracing::warn!(location = %location, "artifact has no usable id, skipping");
            let issue = ValidationIssue::new(
                IssueKind::InvalidFormat,
                UNKNOWN_SOURCE,
                StructuralPath::single(self.policy.identity.id_field.as_str()),
                format!(
                    "Document must have a valid string \"{}\" field",
                    self.policy.identity.id_field
                ),
            )
            .with_field(self.policy.identity.id_field.as_str())
            .with_location(location.clone());

            return ArtifactReport {
                id: None,
                location,
                issues: vec![issue],
                provenance: Vec::new(),
            };
        };

        let source_type = self.canonicalizer.canonicalize(artifact.declared_type());
        let references = self.extractor.extract(id, artifact.body());
        let mut issues = Vec::new();

        for reference in &references {
            if let Some(missing) = check_existence(reference, &context.index) {
                issues.push(missing);
                continue;
            }
            let target_type = context.index.canonical_type(&reference.target_id).unwrap_or(UNKNOWN_TYPE);
            issues.extend(self.rules.check(
                reference,
                artifact.declared_type(),
                &source_type,
                target_type,
            ));
        }

        let is_glossary = context
            .glossary_source
            .as_ref()
            .is_some_and(|g| g.same_document(artifact));
        if !is_glossary {
            issues.extend(
                self.terminology
                    .reconcile(id, artifact.body(), context.glossary()),
            );
        }

        for issue in &mut issues {
            issue.location = Some(location.clone());
        }

        tracing::debug!(
            id,
            canonical_type = %source_type,
            references = references.len(),
            issues = issues.len(),
            "checked artifact"
        );

        ArtifactReport {
            id: Some(id.to_string()),
            location,
            issues,
            provenance: references
                .into_iter()
                .filter(|r| r.is_provenance)
                .map(|r| ProvenanceEdge::new(r.target_id, r.path))
                .collect(),
        }
    }

    /// Run corpus-level checks over the reports collected so far
    #[must_use]
    pub fn finish(&self, context: CorpusContext, reports: Vec<ArtifactReport>) -> ValidationReport {
        let mut corpus_issues: Vec<ValidationIssue> = context
            .index
            .shadowed()
            .into_iter()
            .map(|dup| {
                ValidationIssue::new(
                    IssueKind::DuplicateId,
                    dup.id.as_str(),
                    StructuralPath::single(self.policy.identity.id_field.as_str()),
                    format!(
                        "Duplicate id \"{}\": {} is shadowed by {}",
                        dup.id, dup.location, dup.kept
                    ),
                )
                .with_referenced(dup.id.as_str())
                .with_location(dup.location)
            })
            .collect();

        let graph: ProvenanceGraph = reports
            .iter()
            .filter_map(|r| r.id.as_deref().map(|id| (id, r.provenance.clone())))
            .collect();
        corpus_issues.extend(graph.cycle_issues(&self.policy.provenance_field));

        let summary = IssueSummary::from_issues(
            reports
                .iter()
                .flat_map(|r| r.issues.iter())
                .chain(corpus_issues.iter()),
        );
        let valid = summary.errors == 0;

        tracing::info!(
            artifacts = reports.len(),
            errors = summary.errors,
            warnings = summary.warnings,
            infos = summary.infos,
            valid,
            "validation finished"
        );

        ValidationReport {
            valid,
            summary,
            artifacts: reports,
            corpus_issues,
            index: context.index,
        }
    }

    fn check_all(&self, context: &CorpusContext, artifacts: &[Artifact]) -> Vec<ArtifactReport> {
        let workers = self.options.workers();
        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| {
                artifacts
                    .par_iter()
                    .map(|a| self.check_artifact(context, a))
                    .collect()
            }),
            Err(err) => {
                tracing::warn!(%err, workers, "worker pool unavailable, checking sequentially");
                artifacts
                    .iter()
                    .map(|a| self.check_artifact(context, a))
                    .collect()
            }
        }
    }
}
