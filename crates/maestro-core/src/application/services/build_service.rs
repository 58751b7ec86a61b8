//! Build Service - runs every enabled hosting provider for a project.
//!
//! One run goes through these steps:
//! 1. Preconditions: sites present, hosting package installed, build config present
//! 2. Each registered provider in order: skip if disabled, otherwise build
//! 3. Link each site's source directory into the web root
//! 4. Write the site status document
//!
//! Any failure ends the run. Instructions from providers that already built
//! are discarded.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError, HostingRegistry, ProjectLayout,
        ports::{Document, HostingProviderDescriptor, Storage},
    },
    domain::Project,
    error::MaestroResult,
};

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Operator instructions, in provider order.
    pub instructions: Vec<String>,
    /// Every registered provider, enabled or not.
    pub providers: Vec<HostingProviderDescriptor>,
    /// Where the status document was written.
    pub status_file: PathBuf,
}

impl BuildReport {
    pub fn built_providers(&self) -> impl Iterator<Item = &HostingProviderDescriptor> {
        self.providers.iter().filter(|p| p.enabled)
    }
}

pub struct BuildService {
    storage: Arc<dyn Storage>,
    layout: ProjectLayout,
    hosting: HostingRegistry,
}

impl BuildService {
    pub fn new(storage: Arc<dyn Storage>, layout: ProjectLayout, hosting: HostingRegistry) -> Self {
        Self {
            storage,
            layout,
            hosting,
        }
    }

    pub fn hosting(&self) -> &HostingRegistry {
        &self.hosting
    }

    /// Build all enabled hosting providers for `project`.
    #[instrument(skip_all, fields(project = %project.name, providers = self.hosting.len()))]
    pub fn build(&mut self, project: &Project) -> MaestroResult<BuildReport> {
        self.check_preconditions(project)?;

        let storage = self.storage.as_ref();
        let mut instructions = Vec::new();
        let mut providers = Vec::with_capacity(self.hosting.len());

        for provider in self.hosting.providers_mut() {
            let name = provider.name().to_string();

            if !provider.is_enabled(project, &self.layout, storage) {
                debug!(provider = %name, "Provider not enabled, skipping");
                providers.push(HostingProviderDescriptor {
                    name,
                    enabled: false,
                    instructions: Vec::new(),
                });
                continue;
            }

            info!(provider = %name, "Building");
            provider
                .build(project, storage)
                .map_err(|e| ApplicationError::ProviderBuild {
                    provider: name.clone(),
                    source: Box::new(e),
                })?;

            let produced = provider.instructions().to_vec();
            instructions.extend(produced.iter().cloned());
            providers.push(HostingProviderDescriptor {
                name,
                enabled: true,
                instructions: produced,
            });
        }

        self.link_sites(project)?;

        let status = render_status(project, Local::now());
        storage.write(&self.layout.status_file, &Document::Text(status))?;
        info!(path = %self.layout.status_file.display(), "Status document written");

        Ok(BuildReport {
            instructions,
            providers,
            status_file: self.layout.status_file.clone(),
        })
    }

    fn check_preconditions(&self, project: &Project) -> MaestroResult<()> {
        if !project.has_sites() {
            return Err(ApplicationError::NoSites.into());
        }

        if !self.storage.exists(&self.layout.hosting_package) {
            return Err(ApplicationError::MissingDependency {
                path: self.layout.hosting_package.clone(),
            }
            .into());
        }

        if !self.storage.exists(&self.layout.build_config) {
            return Err(ApplicationError::MissingConfig {
                path: self.layout.build_config.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Point `web/sites/<id>` at each site's source directory that exists.
    fn link_sites(&self, project: &Project) -> MaestroResult<()> {
        for id in project.sites().keys() {
            let source = self.layout.site_source_dir(id);
            if self.storage.exists(&source) {
                self.storage.link(&source, &self.layout.site_link(id))?;
            }
        }
        Ok(())
    }
}

/// Markdown status table for the project's sites.
pub fn render_status(project: &Project, generated: DateTime<Local>) -> String {
    let mut out = format!("# {} ({})\n\n", project.name, project.id);
    out.push_str("| Site | ID | URL | Status | Default |\n");
    out.push_str("| ---- | -- | --- | ------ | ------- |\n");

    for (id, site) in project.sites() {
        let marker = if site.default { "yes" } else { "" };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            site.name, id, site.url, site.status, marker
        ));
    }

    out.push_str(&format!(
        "\nLast updated: {}\n",
        generated.format("%Y-%m-%d %H:%M:%S")
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockStorage;
    use crate::domain::{Site, SiteStatus};
    use chrono::TimeZone;

    fn project_with_site() -> Project {
        let mut project = Project::new("Unity Sites", "abc123", "drupal");
        let (id, site) = Site::new("Utility Regulator", "uregni.gov.uk");
        project.insert_site(id, site.with_default(true)).unwrap();
        let (id, site) = Site::new("NI Direct", "nidirect.gov.uk");
        project
            .insert_site(id, site.with_status(SiteStatus::Production))
            .unwrap();
        project
    }

    #[test]
    fn zero_sites_touches_nothing() {
        let mut storage = MockStorage::new();
        storage.expect_exists().never();
        storage.expect_write().never();

        let mut service =
            BuildService::new(Arc::new(storage), ProjectLayout::default(), HostingRegistry::new());
        let err = service
            .build(&Project::new("Unity", "abc", "drupal"))
            .unwrap_err();

        assert!(matches!(err.as_application(), Some(ApplicationError::NoSites)));
    }

    #[test]
    fn missing_package_precedes_missing_config() {
        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(false);
        storage.expect_write().never();

        let mut service =
            BuildService::new(Arc::new(storage), ProjectLayout::default(), HostingRegistry::new());
        let err = service.build(&project_with_site()).unwrap_err();

        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingDependency { .. })
        ));
    }

    #[test]
    fn missing_build_config_fails() {
        let layout = ProjectLayout::default();
        let package = layout.hosting_package.clone();

        let mut storage = MockStorage::new();
        storage
            .expect_exists()
            .returning(move |path| path == package.as_path());
        storage.expect_write().never();

        let mut service = BuildService::new(Arc::new(storage), layout, HostingRegistry::new());
        let err = service.build(&project_with_site()).unwrap_err();

        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingConfig { .. })
        ));
    }

    #[test]
    fn status_table_lists_every_site() {
        let generated = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let status = render_status(&project_with_site(), generated);

        assert!(status.starts_with("# Unity Sites (abc123)\n"));
        assert!(status.contains("| Site | ID | URL | Status | Default |"));
        assert!(status.contains("| NI Direct | nidirect_gov_uk | nidirect.gov.uk | production |  |"));
        assert!(status.contains("| Utility Regulator | uregni_gov_uk | uregni.gov.uk | development | yes |"));
        assert!(status.trim_end().ends_with("Last updated: 2024-03-01 09:30:00"));
    }
}
