//! Project-root-relative locations used by the registry and the build.
//!
//! A [`ProjectLayout`] is built once by the caller (the CLI derives it from
//! its configuration) and passed into every service constructor.

use std::path::PathBuf;

use crate::domain::SiteId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Directory holding the project document and per-site directories.
    pub project_dir: PathBuf,
    /// The persisted project document.
    pub project_file: PathBuf,
    /// Parent of the per-site deployment symlinks.
    pub web_sites_dir: PathBuf,
    /// Installed hosting resource package.
    pub hosting_package: PathBuf,
    /// Project-level build configuration that must exist before a build.
    pub build_config: PathBuf,
    /// Generated site status document.
    pub status_file: PathBuf,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("project"),
            project_file: PathBuf::from("project/project.yml"),
            web_sites_dir: PathBuf::from("web/sites"),
            hosting_package: PathBuf::from("vendor/dof-dss/maestro-hosting"),
            build_config: PathBuf::from("maestro.yml"),
            status_file: PathBuf::from("project/README.md"),
        }
    }
}

impl ProjectLayout {
    pub fn config_dir(&self) -> PathBuf {
        self.project_dir.join("config")
    }

    pub fn sites_dir(&self) -> PathBuf {
        self.project_dir.join("sites")
    }

    /// `project/config/<site_id>`
    pub fn site_config_dir(&self, id: &SiteId) -> PathBuf {
        self.config_dir().join(id.as_str())
    }

    /// `project/sites/<site_id>`
    pub fn site_source_dir(&self, id: &SiteId) -> PathBuf {
        self.sites_dir().join(id.as_str())
    }

    /// `web/sites/<site_id>`
    pub fn site_link(&self, id: &SiteId) -> PathBuf {
        self.web_sites_dir.join(id.as_str())
    }

    /// Directory whose subdirectories name the known project types.
    pub fn hosting_resources(&self) -> PathBuf {
        self.hosting_package.join("resources")
    }

    /// Resources of one provider for one project type. A provider is enabled
    /// exactly when this directory exists.
    pub fn provider_resources(&self, project_type: &str, provider: &str) -> PathBuf {
        self.hosting_resources().join(project_type).join(provider)
    }

    /// The directories that belong to a site and move with it on rename.
    pub fn site_directories(&self, id: &SiteId) -> [PathBuf; 2] {
        [self.site_config_dir(id), self.site_source_dir(id)]
    }
}
