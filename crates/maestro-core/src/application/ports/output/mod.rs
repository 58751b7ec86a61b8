//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `maestro-adapters` crate provides implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::ProjectLayout;
use crate::domain::Project;
use crate::error::MaestroResult;

/// Structured file contents exchanged with [`Storage`].
///
/// The variant is chosen by the file extension: `.yml`/`.yaml` files are
/// YAML trees, `.env` files are flat key/value maps, everything else is text.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Yaml(serde_yaml::Value),
    Env(BTreeMap<String, String>),
    Text(String),
}

impl Document {
    pub fn as_yaml(&self) -> Option<&serde_yaml::Value> {
        match self {
            Self::Yaml(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_env(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Env(vars) => Some(vars),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_yaml(self) -> Option<serde_yaml::Value> {
        match self {
            Self::Yaml(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_env(self) -> Option<BTreeMap<String, String>> {
        match self {
            Self::Env(vars) => Some(vars),
            _ => None,
        }
    }
}

/// Which entries [`Storage::list_entries`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFilter {
    All,
    Files,
    Directories,
}

impl EntryFilter {
    pub fn accepts(self, is_dir: bool) -> bool {
        match self {
            Self::All => true,
            Self::Files => !is_dir,
            Self::Directories => is_dir,
        }
    }
}

/// Port for project-root-relative file operations.
///
/// Implemented by:
/// - `maestro_adapters::storage::LocalStorage` (production)
/// - `maestro_adapters::storage::MemoryStorage` (testing)
///
/// Relative paths resolve against the project root. Absolute paths are used
/// as-is.
#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read and decode a file.
    fn read(&self, path: &Path) -> MaestroResult<Document>;

    /// Encode and write a file, creating parent directories.
    fn write(&self, path: &Path, document: &Document) -> MaestroResult<()>;

    /// Copy a single file.
    fn copy(&self, from: &Path, to: &Path) -> MaestroResult<()>;

    /// Recursively copy a directory, merging into `to` if it exists.
    fn copy_directory(&self, from: &Path, to: &Path) -> MaestroResult<()>;

    /// Remove a file, symlink or directory tree. Missing paths are ignored.
    fn delete(&self, path: &Path) -> MaestroResult<()>;

    /// Create a directory and all parent directories.
    fn create_directory(&self, path: &Path) -> MaestroResult<()>;

    /// Immediate children of `path`, sorted by name.
    fn list_entries(&self, path: &Path, filter: EntryFilter) -> MaestroResult<Vec<PathBuf>>;

    /// Create (or replace) a symlink at `link` pointing to `target`.
    fn link(&self, target: &Path, link: &Path) -> MaestroResult<()>;
}

/// Outcome of one provider's build step.
pub type BuildStepResult = MaestroResult<()>;

/// A pluggable hosting target.
///
/// Providers are registered explicitly with `HostingRegistry`; the order of
/// registration is the order of the build.
pub trait HostingProvider: Send {
    /// Stable provider name, also the name of its resource directory.
    fn name(&self) -> &str;

    /// Whether this provider applies to `project`.
    ///
    /// The default checks for the provider's resource directory under the
    /// hosting package.
    fn is_enabled(&self, project: &Project, layout: &ProjectLayout, storage: &dyn Storage) -> bool {
        storage.exists(&layout.provider_resources(&project.project_type, self.name()))
    }

    /// Generate the provider's artifacts and record operator instructions.
    fn build(&mut self, project: &Project, storage: &dyn Storage) -> BuildStepResult;

    /// Instructions accumulated by the last `build`.
    fn instructions(&self) -> &[String];
}

/// Snapshot of a registered provider for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostingProviderDescriptor {
    pub name: String,
    pub enabled: bool,
    pub instructions: Vec<String>,
}
