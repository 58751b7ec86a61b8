//! Application layer errors.
//!
//! These errors represent failures in orchestration, not registry rules.
//! Registry rule violations are `DomainError` from `crate::domain`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::{ErrorCategory, MaestroError};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// No project document at the canonical location.
    #[error("project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// `project:create` against a location that already has a project.
    #[error("a project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// A rename target directory is already on disk, e.g. left behind by
    /// `site:remove`.
    #[error("cannot rename site: {path} already exists")]
    RenameTargetExists { path: PathBuf },

    /// Build requested for a project without sites.
    #[error("this project does not have any sites defined")]
    NoSites,

    /// The hosting resource package is not installed.
    #[error("hosting resources not found at {path}")]
    MissingDependency { path: PathBuf },

    /// The project-level build configuration file is absent.
    #[error("build configuration not found at {path}")]
    MissingConfig { path: PathBuf },

    /// A hosting provider's build step failed; the run was aborted.
    #[error("{provider} build failed: {source}")]
    ProviderBuild {
        provider: String,
        #[source]
        source: Box<MaestroError>,
    },

    /// Filesystem operation failed. `kind` is the underlying I/O error kind.
    #[error("filesystem error at {path}: {reason}")]
    Filesystem {
        path: PathBuf,
        kind: io::ErrorKind,
        reason: String,
    },

    /// A file could not be converted to or from a structured document.
    #[error("could not {action} {path}: {reason}")]
    Document {
        path: PathBuf,
        action: &'static str,
        reason: String,
    },

    /// Storage access failed (lock poisoned, etc.).
    #[error("storage is unavailable")]
    StorageLockError,
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, err: &io::Error, operation: &str) -> Self {
        Self::Filesystem {
            path: path.into(),
            kind: err.kind(),
            reason: format!("failed to {operation}: {err}"),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectNotFound { .. } => vec![
                "Run this command from inside a project directory".into(),
                "Or create a project first: maestro project:create".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Edit the existing project file: {}", path.display()),
                "Add sites to it with: maestro site:add".into(),
            ],
            Self::RenameTargetExists { path } => vec![
                format!("Move or delete {} and try again", path.display()),
            ],
            Self::NoSites => vec![
                "Add some sites using: maestro site:add".into(),
                "Then run: maestro project:build".into(),
            ],
            Self::MissingDependency { .. } => vec![
                "The hosting package is installed by composer".into(),
                "Run: composer install".into(),
            ],
            Self::MissingConfig { path } => vec![
                format!("Create {} in the project root", path.display()),
            ],
            Self::ProviderBuild { source, .. } => {
                let mut out = vec!["No instructions were produced; fix the error and rebuild".into()];
                out.extend(source.suggestions());
                out
            }
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::Document { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
            ],
            Self::StorageLockError => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectExists { .. } | Self::RenameTargetExists { .. } => {
                ErrorCategory::Conflict
            }
            Self::NoSites => ErrorCategory::Precondition,
            Self::MissingDependency { .. } | Self::MissingConfig { .. } => {
                ErrorCategory::Configuration
            }
            Self::ProviderBuild { .. } => ErrorCategory::Internal,
            Self::Filesystem { .. } | Self::StorageLockError => ErrorCategory::Internal,
            Self::Document { .. } => ErrorCategory::Validation,
        }
    }
}
