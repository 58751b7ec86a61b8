use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::site::Site, error::DomainError, value_objects::SiteId};

/// The top-level registry of one hosting deployment.
///
/// Field names match the persisted `project/project.yml` document. All
/// mutators are pure: persistence and validation happen in
/// `application::ProjectRegistry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "project_name")]
    pub name: String,
    #[serde(rename = "project_id")]
    pub id: String,
    #[serde(rename = "project_type")]
    pub project_type: String,
    #[serde(default)]
    pub sites: BTreeMap<SiteId, Site>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        project_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            project_type: project_type.into(),
            sites: BTreeMap::new(),
        }
    }

    pub fn sites(&self) -> &BTreeMap<SiteId, Site> {
        &self.sites
    }

    pub fn site(&self, id: &SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn site_exists(&self, id: &SiteId) -> bool {
        self.sites.contains_key(id)
    }

    pub fn has_sites(&self) -> bool {
        !self.sites.is_empty()
    }

    /// The site flagged as default, if any.
    pub fn default_site(&self) -> Option<(&SiteId, &Site)> {
        self.sites.iter().find(|(_, site)| site.default)
    }

    /// Add a new site. A site flagged `default` takes the flag from every
    /// other site.
    pub fn insert_site(&mut self, id: SiteId, site: Site) -> Result<(), DomainError> {
        require_usable_id(&id, &site)?;
        if self.site_exists(&id) {
            return Err(DomainError::DuplicateSite {
                site_id: id.to_string(),
            });
        }
        let default = site.default;
        self.sites.insert(id.clone(), site);
        if default {
            self.clear_defaults_except(&id);
        }
        Ok(())
    }

    /// Replace an existing site, including its `default` flag. Setting the
    /// flag clears it on every other site.
    pub fn replace_site(&mut self, id: &SiteId, site: Site) -> Result<(), DomainError> {
        let slot = self.sites.get_mut(id).ok_or_else(|| DomainError::SiteNotFound {
            site_id: id.to_string(),
        })?;
        let default = site.default;
        *slot = site;
        if default {
            self.clear_defaults_except(id);
        }
        Ok(())
    }

    pub fn remove_site(&mut self, id: &SiteId) -> Result<Site, DomainError> {
        self.sites.remove(id).ok_or_else(|| DomainError::SiteNotFound {
            site_id: id.to_string(),
        })
    }

    /// Make `id` the only default site.
    pub fn set_default(&mut self, id: &SiteId) -> Result<(), DomainError> {
        if !self.site_exists(id) {
            return Err(DomainError::SiteNotFound {
                site_id: id.to_string(),
            });
        }
        for (site_id, site) in &mut self.sites {
            site.default = site_id == id;
        }
        Ok(())
    }

    /// Check the rules a document can break but the mutators never do:
    /// every site key is a usable id and at most one site is the default.
    pub fn check_integrity(&self) -> Result<(), DomainError> {
        for (id, site) in &self.sites {
            require_usable_id(id, site)?;
        }
        let defaults: Vec<String> = self
            .sites
            .iter()
            .filter(|(_, site)| site.default)
            .map(|(id, _)| id.to_string())
            .collect();
        if defaults.len() > 1 {
            return Err(DomainError::MultipleDefaults { site_ids: defaults });
        }
        Ok(())
    }

    fn clear_defaults_except(&mut self, id: &SiteId) {
        for (site_id, site) in &mut self.sites {
            if site_id != id {
                site.default = false;
            }
        }
    }

    /// Move a site to a new key, keeping the old entry's `default` flag.
    pub fn rekey_site(
        &mut self,
        old_id: &SiteId,
        new_id: SiteId,
        mut site: Site,
    ) -> Result<(), DomainError> {
        require_usable_id(&new_id, &site)?;
        if old_id != &new_id && self.site_exists(&new_id) {
            return Err(DomainError::DuplicateSite {
                site_id: new_id.to_string(),
            });
        }
        let previous = self.remove_site(old_id)?;
        site.default = previous.default;
        self.sites.insert(new_id, site);
        Ok(())
    }
}

/// The id doubles as a directory name, so an empty one would address the
/// parent directory.
fn require_usable_id(id: &SiteId, site: &Site) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::EmptySiteId {
            url: site.url.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str, default: bool) -> (SiteId, Site) {
        let (id, site) = Site::new(url, url);
        (id, site.with_default(default))
    }

    fn project_with(sites: &[(&str, bool)]) -> Project {
        let mut project = Project::new("Unity", "abc123", "drupal");
        for (url, default) in sites {
            let (id, site) = site(url, *default);
            project.sites.insert(id, site);
        }
        project
    }

    fn defaults(project: &Project) -> Vec<&str> {
        project
            .sites()
            .iter()
            .filter(|(_, s)| s.default)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    #[test]
    fn insert_rejects_duplicates_and_keeps_original() {
        let mut project = project_with(&[("x", false)]);
        let (id, mut replacement) = site("x", false);
        replacement.name = "changed".into();

        let err = project.insert_site(id.clone(), replacement).unwrap_err();

        assert!(matches!(err, DomainError::DuplicateSite { .. }));
        assert_eq!(project.sites().len(), 1);
        assert_eq!(project.site(&id).unwrap().name, "x");
    }

    #[test]
    fn replace_requires_existing() {
        let mut project = project_with(&[]);
        let (id, site) = site("a", false);
        assert!(matches!(
            project.replace_site(&id, site),
            Err(DomainError::SiteNotFound { .. })
        ));
    }

    #[test]
    fn remove_requires_existing() {
        let mut project = project_with(&[("a", false)]);
        assert!(project.remove_site(&SiteId::new("a")).is_ok());
        assert!(matches!(
            project.remove_site(&SiteId::new("a")),
            Err(DomainError::SiteNotFound { .. })
        ));
    }

    #[test]
    fn set_default_moves_flag() {
        let mut project = project_with(&[("a", true), ("b", false)]);
        project.set_default(&SiteId::new("b")).unwrap();
        assert_eq!(defaults(&project), vec!["b"]);
        assert!(!project.site(&SiteId::new("a")).unwrap().default);
    }

    #[test]
    fn set_default_leaves_exactly_one() {
        let starts: [&[(&str, bool)]; 3] = [
            &[("a", false), ("b", false), ("c", false)],
            &[("a", true), ("b", false), ("c", false)],
            &[("a", true), ("b", true), ("c", true)],
        ];
        for start in starts {
            for target in ["a", "b", "c"] {
                let mut project = project_with(start);
                project.set_default(&SiteId::new(target)).unwrap();
                assert_eq!(defaults(&project), vec![target]);
            }
        }
    }

    #[test]
    fn set_default_unknown_site_is_error() {
        let mut project = project_with(&[("a", true)]);
        assert!(project.set_default(&SiteId::new("zzz")).is_err());
        assert_eq!(defaults(&project), vec!["a"]);
    }

    #[test]
    fn rekey_preserves_default() {
        let mut project = project_with(&[("old.example", true)]);
        let (new_id, site) = Site::new("New", "new.example");

        project
            .rekey_site(&SiteId::new("old_example"), new_id.clone(), site)
            .unwrap();

        assert!(!project.site_exists(&SiteId::new("old_example")));
        assert!(project.site(&new_id).unwrap().default);
    }

    #[test]
    fn rekey_refuses_to_clobber() {
        let mut project = project_with(&[("a", false), ("b", false)]);
        let (_, site) = Site::new("B", "b");
        assert!(matches!(
            project.rekey_site(&SiteId::new("a"), SiteId::new("b"), site),
            Err(DomainError::DuplicateSite { .. })
        ));
        assert_eq!(project.sites().len(), 2);
    }

    #[test]
    fn insert_default_takes_the_flag() {
        let mut project = project_with(&[("a", true), ("b", false)]);
        let (id, site) = site("c", true);

        project.insert_site(id, site).unwrap();

        assert_eq!(defaults(&project), vec!["c"]);
    }

    #[test]
    fn replace_with_default_clears_others() {
        let mut project = project_with(&[("a", true), ("b", false)]);
        let (id, site) = site("b", true);

        project.replace_site(&id, site).unwrap();

        assert_eq!(defaults(&project), vec!["b"]);
    }

    #[test]
    fn replace_without_default_keeps_others() {
        let mut project = project_with(&[("a", true), ("b", false)]);
        let (id, site) = site("b", false);

        project.replace_site(&id, site).unwrap();

        assert_eq!(defaults(&project), vec!["a"]);
    }

    #[test]
    fn empty_id_is_rejected() {
        let mut project = project_with(&[("a", false)]);
        let (id, site) = Site::new("Dots", "...");
        assert!(id.is_empty());

        assert!(matches!(
            project.insert_site(id, site.clone()),
            Err(DomainError::EmptySiteId { .. })
        ));
        assert!(matches!(
            project.rekey_site(&SiteId::new("a"), SiteId::new(""), site),
            Err(DomainError::EmptySiteId { .. })
        ));
        assert_eq!(project.sites().len(), 1);
        assert!(project.site_exists(&SiteId::new("a")));
    }

    #[test]
    fn integrity_flags_two_defaults() {
        let project = project_with(&[("a", true), ("b", true), ("c", false)]);
        match project.check_integrity() {
            Err(DomainError::MultipleDefaults { site_ids }) => assert_eq!(site_ids, ["a", "b"]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(project_with(&[("a", true), ("b", false)]).check_integrity().is_ok());
    }

    #[test]
    fn integrity_flags_empty_key() {
        let mut project = project_with(&[("a", false)]);
        let (_, site) = Site::new("Dots", "...");
        project.sites.insert(SiteId::new(""), site);
        assert!(matches!(
            project.check_integrity(),
            Err(DomainError::EmptySiteId { .. })
        ));
    }
}
