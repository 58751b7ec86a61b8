// ============================================================================
// domain/error.rs - REGISTRY RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

use crate::domain::schema::Violation;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (the CLI re-renders them)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("project document failed validation: {}", summarize(.violations))]
    Validation { violations: Vec<Violation> },

    #[error("project document is malformed: {reason}")]
    Malformed { reason: String },

    #[error("site URL '{url}' does not produce a usable site ID")]
    EmptySiteId { url: String },

    #[error("more than one default site: {}", .site_ids.join(", "))]
    MultipleDefaults { site_ids: Vec<String> },

    #[error("unknown project type '{project_type}'")]
    UnknownProjectType {
        project_type: String,
        known: Vec<String>,
    },

    // ========================================================================
    // Conflict Errors (409-level equivalent)
    // ========================================================================
    #[error("site ID '{site_id}' already exists in the project")]
    DuplicateSite { site_id: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("site ID '{site_id}' does not exist in the project")]
    SiteNotFound { site_id: String },
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Validation { violations } => {
                let mut out = vec!["Fix the following fields in project/project.yml:".into()];
                out.extend(violations.iter().map(|v| format!("  • {v}")));
                out
            }
            Self::Malformed { .. } => vec![
                "Check project/project.yml is a YAML mapping".into(),
            ],
            Self::EmptySiteId { .. } => vec![
                "Use the site's host name, e.g. www.nidirect.gov.uk".into(),
            ],
            Self::MultipleDefaults { .. } => vec![
                "Keep `default: true` on one site in project/project.yml".into(),
                "Or pick one with: maestro site:default <SITE_ID>".into(),
            ],
            Self::UnknownProjectType { known, .. } if known.is_empty() => vec![
                "No project types are provided by the hosting package".into(),
                "Install the hosting package with: composer install".into(),
            ],
            Self::UnknownProjectType { known, .. } => {
                let mut out = vec!["Known project types:".into()];
                out.extend(known.iter().map(|t| format!("  • {t}")));
                out
            }
            Self::DuplicateSite { site_id } => vec![
                format!("A site with ID '{site_id}' is already registered"),
                format!("Edit it instead: maestro site:edit {site_id}"),
            ],
            Self::SiteNotFound { .. } => vec![
                "List the registered sites with: maestro project:info".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. }
            | Self::Malformed { .. }
            | Self::EmptySiteId { .. }
            | Self::MultipleDefaults { .. }
            | Self::UnknownProjectType { .. } => ErrorCategory::Validation,
            Self::DuplicateSite { .. } => ErrorCategory::Conflict,
            Self::SiteNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
}
