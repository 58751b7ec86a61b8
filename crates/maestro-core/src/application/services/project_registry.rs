//! Project Registry - owns the loaded project and persists every mutation.
//!
//! Every mutating operation follows the same sequence:
//! 1. Apply the change to a copy of the project
//! 2. Validate the copy against the schema
//! 3. Write the validated document
//! 4. Replace the in-memory project
//!
//! A failure at any step leaves both the document and the in-memory project
//! untouched.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, ProjectLayout,
        ports::{Document, Storage},
        services::hosting_registry::known_project_types,
    },
    domain::{DomainValidator as validator, Project, Schema, Site, SiteId},
    error::MaestroResult,
};

pub struct ProjectRegistry {
    storage: Arc<dyn Storage>,
    layout: ProjectLayout,
    schema: Schema,
    project: Project,
}

impl std::fmt::Debug for ProjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectRegistry")
            .field("layout", &self.layout)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl ProjectRegistry {
    /// Create a new project document and its directory skeleton.
    ///
    /// Fails if a project document already exists or if the project type is
    /// not provided by the installed hosting package.
    #[instrument(skip_all, fields(project = %project.name, project_type = %project.project_type))]
    pub fn create(
        storage: Arc<dyn Storage>,
        layout: ProjectLayout,
        schema: Schema,
        project: Project,
    ) -> MaestroResult<Self> {
        if storage.exists(&layout.project_file) {
            return Err(ApplicationError::ProjectExists {
                path: layout.project_file.clone(),
            }
            .into());
        }

        let known = known_project_types(storage.as_ref(), &layout)?;
        validator::validate_project_type(&project.project_type, &known)?;

        let document = validator::validate_project(&project, &schema)?;

        for dir in [layout.project_dir.clone(), layout.config_dir(), layout.sites_dir()] {
            storage.create_directory(&dir)?;
        }
        storage.write(&layout.project_file, &Document::Yaml(document))?;

        info!(path = %layout.project_file.display(), "Project created");
        Ok(Self {
            storage,
            layout,
            schema,
            project,
        })
    }

    /// Load and validate the project document.
    #[instrument(skip_all, fields(path = %layout.project_file.display()))]
    pub fn load(storage: Arc<dyn Storage>, layout: ProjectLayout, schema: Schema) -> MaestroResult<Self> {
        let project = Self::read_project(storage.as_ref(), &layout, &schema)?;
        debug!(sites = project.sites().len(), "Project loaded");
        Ok(Self {
            storage,
            layout,
            schema,
            project,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn sites(&self) -> &std::collections::BTreeMap<SiteId, Site> {
        self.project.sites()
    }

    pub fn site(&self, id: &SiteId) -> Option<&Site> {
        self.project.site(id)
    }

    pub fn site_exists(&self, id: &SiteId) -> bool {
        self.project.site_exists(id)
    }

    /// Validate and persist `project`, replacing the loaded one.
    #[instrument(skip_all)]
    pub fn save(&mut self, project: Project) -> MaestroResult<()> {
        self.persist(project)
    }

    #[instrument(skip(self, site), fields(site_id = %id))]
    pub fn add_site(&mut self, id: SiteId, site: Site) -> MaestroResult<()> {
        let mut candidate = self.project.clone();
        candidate.insert_site(id, site)?;
        self.persist(candidate)?;
        info!("Site added");
        Ok(())
    }

    /// Replace an existing site. The caller decides the `default` flag.
    #[instrument(skip(self, site), fields(site_id = %id))]
    pub fn update_site(&mut self, id: &SiteId, site: Site) -> MaestroResult<()> {
        let mut candidate = self.project.clone();
        candidate.replace_site(id, site)?;
        self.persist(candidate)?;
        info!("Site updated");
        Ok(())
    }

    /// Remove a site entry. Its directories are left on disk.
    #[instrument(skip(self), fields(site_id = %id))]
    pub fn remove_site(&mut self, id: &SiteId) -> MaestroResult<Site> {
        let mut candidate = self.project.clone();
        let removed = candidate.remove_site(id)?;
        self.persist(candidate)?;
        info!("Site removed");
        Ok(removed)
    }

    /// Make `id` the single default site with one validated write.
    #[instrument(skip(self), fields(site_id = %id))]
    pub fn set_default(&mut self, id: &SiteId) -> MaestroResult<()> {
        let mut candidate = self.project.clone();
        candidate.set_default(id)?;
        self.persist(candidate)?;
        info!("Default site changed");
        Ok(())
    }

    /// Store `site` under `new_id`, moving the site's directories with it.
    ///
    /// The site's directories are copied to their new-id locations first;
    /// the rename is refused if any of those already exists. A failed copy
    /// removes what this call copied and leaves the document untouched.
    /// Once every copy succeeds the document is written, then the old
    /// directories and deployment symlink are removed. Paths that could not
    /// be removed are returned; the registry no longer refers to them.
    #[instrument(skip(self, site), fields(from = %old_id, to = %new_id))]
    pub fn rename_site(
        &mut self,
        old_id: &SiteId,
        new_id: SiteId,
        site: Site,
    ) -> MaestroResult<Vec<PathBuf>> {
        if *old_id == new_id {
            let mut site = site;
            site.default = self.project.site(old_id).is_some_and(|s| s.default);
            self.update_site(old_id, site)?;
            return Ok(Vec::new());
        }

        let mut candidate = self.project.clone();
        candidate.rekey_site(old_id, new_id.clone(), site)?;
        let document = validator::validate_project(&candidate, &self.schema)?;

        let moves = self.planned_moves(old_id, &new_id)?;
        self.copy_site_directories(&moves)?;

        self.storage
            .write(&self.layout.project_file, &Document::Yaml(document))?;
        self.project = candidate;
        info!("Site renamed");

        let mut stale: Vec<PathBuf> = moves.into_iter().map(|(from, _)| from).collect();
        let link = self.layout.site_link(old_id);
        if self.storage.exists(&link) {
            stale.push(link);
        }
        Ok(self.remove_stale(stale))
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn read_project(storage: &dyn Storage, layout: &ProjectLayout, schema: &Schema) -> MaestroResult<Project> {
        let path = &layout.project_file;
        if !storage.exists(path) {
            return Err(ApplicationError::ProjectNotFound { path: path.clone() }.into());
        }

        let document = storage
            .read(path)?
            .into_yaml()
            .ok_or_else(|| ApplicationError::Document {
                path: path.clone(),
                action: "decode",
                reason: "expected a YAML document".into(),
            })?;

        Ok(validator::parse_project(document, schema)?)
    }

    fn persist(&mut self, candidate: Project) -> MaestroResult<()> {
        let document = validator::validate_project(&candidate, &self.schema)?;
        self.storage
            .write(&self.layout.project_file, &Document::Yaml(document))?;
        self.project = candidate;
        Ok(())
    }

    /// Existing old-id directories paired with their new-id locations.
    fn planned_moves(&self, old_id: &SiteId, new_id: &SiteId) -> MaestroResult<Vec<(PathBuf, PathBuf)>> {
        let moves: Vec<(PathBuf, PathBuf)> = self
            .layout
            .site_directories(old_id)
            .into_iter()
            .zip(self.layout.site_directories(new_id))
            .filter(|(from, _)| self.storage.exists(from))
            .collect();

        if let Some((_, to)) = moves.iter().find(|(_, to)| self.storage.exists(to)) {
            return Err(ApplicationError::RenameTargetExists { path: to.clone() }.into());
        }
        Ok(moves)
    }

    fn copy_site_directories(&self, moves: &[(PathBuf, PathBuf)]) -> MaestroResult<()> {
        let mut copied = Vec::with_capacity(moves.len());
        for (from, to) in moves {
            debug!(from = %from.display(), to = %to.display(), "Copying site directory");
            copied.push(to);
            if let Err(e) = self.storage.copy_directory(from, to) {
                warn!("Directory copy failed, attempting rollback");
                self.rollback(&copied);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Best-effort removal of partially copied directories. Every path was
    /// absent before the copy started.
    fn rollback(&self, copied: &[&PathBuf]) {
        for path in copied {
            if let Err(e) = self.storage.delete(path) {
                warn!(
                    error = %e,
                    path = %path.display(),
                    "Rollback failed"
                );
            }
        }
    }

    /// Delete `paths`, returning the ones that could not be removed.
    fn remove_stale(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths
            .into_iter()
            .filter(|path| match self.storage.delete(path) {
                Ok(()) => false,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Old site path left in place");
                    true
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockStorage;
    use crate::error::MaestroError;

    fn schema() -> Schema {
        Schema::builtin().unwrap()
    }

    #[test]
    fn load_missing_document_is_not_found() {
        let mut storage = MockStorage::new();
        storage.expect_exists().times(1).return_const(false);
        storage.expect_read().never();

        let err = ProjectRegistry::load(Arc::new(storage), ProjectLayout::default(), schema())
            .unwrap_err();

        assert!(matches!(
            err,
            MaestroError::Application(ApplicationError::ProjectNotFound { .. })
        ));
    }

    #[test]
    fn load_rejects_non_yaml_document() {
        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(true);
        storage
            .expect_read()
            .returning(|_| Ok(Document::Text("project_name: x".into())));

        let err = ProjectRegistry::load(Arc::new(storage), ProjectLayout::default(), schema())
            .unwrap_err();

        assert!(matches!(
            err,
            MaestroError::Application(ApplicationError::Document { .. })
        ));
    }

    fn valid_document() -> serde_yaml::Value {
        serde_yaml::from_str(
            "project_name: Unity\nproject_id: abc\nproject_type: drupal\nsites: {}\n",
        )
        .unwrap()
    }

    #[test]
    fn rejected_candidate_is_never_written() {
        let document = valid_document();
        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(true);
        storage
            .expect_read()
            .returning(move |_| Ok(Document::Yaml(document.clone())));
        storage.expect_write().never();

        let mut registry =
            ProjectRegistry::load(Arc::new(storage), ProjectLayout::default(), schema()).unwrap();
        // Tighten the schema so the next candidate fails validation.
        registry.schema = Schema::from_yaml_str(
            "root:\n  type: object\n  children:\n    project_name: {type: text}\n    project_id: {type: text}\n    project_type: {type: choice, allowed: [wordpress]}\n    sites: {type: map}\n",
        )
        .unwrap();

        let (id, site) = Site::new("Example", "example.gov.uk");
        let err = registry.add_site(id.clone(), site).unwrap_err();

        assert!(matches!(
            err.as_domain(),
            Some(crate::domain::DomainError::Validation { .. })
        ));
        assert!(!registry.site_exists(&id));
    }

    #[test]
    fn set_default_writes_once() {
        let document: serde_yaml::Value = serde_yaml::to_value({
            let mut project = Project::new("Unity", "abc", "drupal");
            for url in ["a.example", "b.example", "c.example"] {
                let (id, site) = Site::new(url, url);
                project.insert_site(id, site).unwrap();
            }
            project
        })
        .unwrap();

        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(true);
        storage
            .expect_read()
            .returning(move |_| Ok(Document::Yaml(document.clone())));
        storage.expect_write().times(1).returning(|_, _| Ok(()));

        let mut registry =
            ProjectRegistry::load(Arc::new(storage), ProjectLayout::default(), schema()).unwrap();
        registry.set_default(&SiteId::new("b_example")).unwrap();

        let defaults: Vec<_> = registry
            .sites()
            .iter()
            .filter(|(_, s)| s.default)
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(defaults, vec!["b_example"]);
    }
}
