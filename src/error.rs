//! Error types for slide validation.
//!
//! Validation fails closed: a single issue anywhere rejects the document,
//! and the error carries every issue that was found.

use crate::schema::FieldPath;
use thiserror::Error;

/// Which allowlist an issue violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allowlist {
    ElementType,
    StyleKey,
}

/// What went wrong at a single location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueKind {
    /// Element type not in the element allowlist
    #[error("Invalid element type {0:?}")]
    InvalidElementType(String),

    /// Style key not in the style allowlist
    #[error("Invalid style key {0:?}")]
    InvalidStyleKey(String),

    /// Required field is absent
    #[error("Required")]
    Missing,

    /// Field present with the wrong JSON type
    #[error("expected {expected}, received {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    /// String outside a fixed enum
    #[error("invalid value {value:?}, expected one of: {}", .allowed.join(", "))]
    NotInEnum {
        value: String,
        allowed: &'static [&'static str],
    },

    /// Element nesting deeper than the configured limit
    #[error("element nesting exceeds {0} levels")]
    TooDeep(usize),
}

impl IssueKind {
    pub fn allowlist(&self) -> Option<Allowlist> {
        match self {
            IssueKind::InvalidElementType(_) => Some(Allowlist::ElementType),
            IssueKind::InvalidStyleKey(_) => Some(Allowlist::StyleKey),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {kind}")]
pub struct ValidationIssue {
    pub path: FieldPath,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: FieldPath, kind: IssueKind) -> Self {
        Self { path, kind }
    }
}

/// The whole document was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("slide rejected ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn first(&self) -> Option<&ValidationIssue> {
        self.issues.first()
    }

    /// Issue recorded at exactly this path, if any.
    pub fn at(&self, path: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.path.to_string() == path)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
