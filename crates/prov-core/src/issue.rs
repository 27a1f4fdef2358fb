//! Validation issues
//!
//! Every finding is a [`ValidationIssue`]: plain data, never mutated after
//! creation. Severity is fixed by the issue kind.

use prov_artifact::{Location, StructuralPath};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// How much an issue matters
///
/// Ordered `Info < Warning < Error`. Only errors make a corpus invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suggestion
    Info,

    /// Defect that does not block
    Warning,

    /// Defect that makes the corpus invalid
    Error,
}

impl Severity {
    /// Lower-case name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Artifact has no usable id
    InvalidFormat,

    /// Referenced id is not in the corpus index
    MissingReference,

    /// Provenance edge violates the source type's rule
    InvalidInputType,

    /// Provenance chain loops back on itself
    CircularReference,

    /// Two artifacts declare the same id
    DuplicateId,

    /// Term reference names no glossary term
    MissingTermReference,

    /// Reference site data type differs from the glossary
    TermTypeMismatch,

    /// Glossary constraint is stricter than the reference site
    TermConstraintViolation,

    /// Referenced term is deprecated
    DeprecatedTermUsed,

    /// Document text uses a synonym instead of the canonical term
    SynonymUsed,
}

impl IssueKind {
    /// Severity attached to every issue of this kind
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::InvalidFormat
            | Self::MissingReference
            | Self::InvalidInputType
            | Self::MissingTermReference
            | Self::TermTypeMismatch => Severity::Error,
            Self::CircularReference
            | Self::DuplicateId
            | Self::TermConstraintViolation
            | Self::DeprecatedTermUsed => Severity::Warning,
            Self::SynonymUsed => Severity::Info,
        }
    }

    /// Kebab-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid-format",
            Self::MissingReference => "missing-reference",
            Self::InvalidInputType => "invalid-input-type",
            Self::CircularReference => "circular-reference",
            Self::DuplicateId => "duplicate-id",
            Self::MissingTermReference => "missing-term-reference",
            Self::TermTypeMismatch => "term-type-mismatch",
            Self::TermConstraintViolation => "term-constraint-violation",
            Self::DeprecatedTermUsed => "deprecated-term-used",
            Self::SynonymUsed => "synonym-used",
        }
    }
}

impl Display for IssueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// What went wrong
    pub kind: IssueKind,

    /// Always `kind.severity()`
    pub severity: Severity,

    /// Artifact the issue is reported against
    pub source_id: String,

    /// Id the issue is about (reference target, term id, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_id: Option<String>,

    /// Field that carried the offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Where in the source body
    pub path: StructuralPath,

    /// Human-readable description
    pub message: String,

    /// Storage handle of the source artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ValidationIssue {
    /// Create issue; severity follows from `kind`
    #[must_use]
    pub fn new(
        kind: IssueKind,
        source_id: impl Into<String>,
        path: StructuralPath,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            source_id: source_id.into(),
            referenced_id: None,
            field: None,
            path,
            message: message.into(),
            location: None,
        }
    }

    /// With referenced id
    #[inline]
    #[must_use]
    pub fn with_referenced(mut self, id: impl Into<String>) -> Self {
        self.referenced_id = Some(id.into());
        self
    }

    /// With field name
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// With source location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Check if issue blocks validity
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} at {}: {}",
            self.severity, self.kind, self.source_id, self.path, self.message
        )
    }
}

/// Issue counts per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    /// Error count
    pub errors: usize,

    /// Warning count
    pub warnings: usize,

    /// Info count
    pub infos: usize,
}

impl IssueSummary {
    /// Count issues by severity
    #[must_use]
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a ValidationIssue>) -> Self {
        issues
            .into_iter()
            .fold(Self::default(), |mut acc, issue| {
                match issue.severity {
                    Severity::Error => acc.errors += 1,
                    Severity::Warning => acc.warnings += 1,
                    Severity::Info => acc.infos += 1,
                }
                acc
            })
    }

    /// Total issue count
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}
