use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{SiteId, SiteStatus};

/// Cron schedule applied to new sites.
pub const DEFAULT_CRON_SPEC: &str = "10 * * * *";

/// One deployable site within a project.
///
/// The site identifier is not stored here: it is the key under which the
/// site lives in [`Project::sites`](super::Project::sites).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub url: String,
    pub status: SiteStatus,
    pub default: bool,
    pub www: bool,
    pub database: String,
    pub cron_spec: String,
    pub cron_cmd: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solr: Option<String>,
}

impl Site {
    /// Create a site for `url`, deriving every id-bound field.
    ///
    /// Returns the derived identifier alongside the site.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> (SiteId, Self) {
        let url = normalize_url(&url.into());
        let id = SiteId::derive(&url);

        let site = Self {
            name: name.into(),
            database: id.to_string(),
            cron_spec: DEFAULT_CRON_SPEC.to_string(),
            cron_cmd: default_cron_cmd(&id),
            url,
            status: SiteStatus::default(),
            default: false,
            www: false,
            solr: None,
        };

        (id, site)
    }

    pub fn with_status(mut self, status: SiteStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_www(mut self, www: bool) -> Self {
        self.www = www;
        self
    }

    /// Request (or drop) a search index named after the site.
    pub fn with_solr(mut self, enabled: bool) -> Self {
        self.solr = enabled.then(|| self.database.clone());
        self
    }

    pub fn with_cron_spec(mut self, spec: impl Into<String>) -> Self {
        self.cron_spec = spec.into();
        self
    }

    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    /// Point the site at a new url, re-deriving the id-bound fields.
    ///
    /// A custom cron command is kept; the default one follows the new id.
    pub fn relocate(mut self, url: impl Into<String>) -> (SiteId, Self) {
        let old_id = SiteId::new(self.database.clone());
        self.url = normalize_url(&url.into());
        let id = SiteId::derive(&self.url);

        self.database = id.to_string();
        if self.solr.is_some() {
            self.solr = Some(id.to_string());
        }
        if self.cron_cmd == default_cron_cmd(&old_id) {
            self.cron_cmd = default_cron_cmd(&id);
        }

        (id, self)
    }

    pub fn requires_solr(&self) -> bool {
        self.solr.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The drush cron command for a site's docroot.
pub fn default_cron_cmd(id: &SiteId) -> String {
    format!("cd web/sites/{id} ; drush core-cron")
}

/// Strip any scheme and trailing slash: sites are stored as bare hosts.
fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = url.split_once("://").map_or(url, |(_, rest)| rest);
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_site_derives_id_bound_fields() {
        let (id, site) = Site::new("Utility Regulator", "www.uregni.gov.uk");

        assert_eq!(id.as_str(), "www_uregni_gov_uk");
        assert_eq!(site.database, "www_uregni_gov_uk");
        assert_eq!(site.cron_spec, DEFAULT_CRON_SPEC);
        assert_eq!(site.cron_cmd, "cd web/sites/www_uregni_gov_uk ; drush core-cron");
        assert_eq!(site.status, SiteStatus::Development);
        assert!(!site.default);
        assert!(!site.www);
        assert!(site.solr.is_none());
    }

    #[test]
    fn new_site_strips_protocol_and_trailing_slash() {
        let (id, site) = Site::new("Example", "https://example.gov.uk/");
        assert_eq!(site.url, "example.gov.uk");
        assert_eq!(id.as_str(), "example_gov_uk");
    }

    #[test]
    fn solr_uses_site_id() {
        let (_, site) = Site::new("Example", "example.gov.uk");
        let site = site.with_solr(true);
        assert_eq!(site.solr.as_deref(), Some("example_gov_uk"));
        assert!(site.requires_solr());
        assert!(!site.with_solr(false).requires_solr());
    }

    #[test]
    fn relocate_follows_new_id() {
        let (_, site) = Site::new("Example", "old.example");
        let site = site.with_solr(true).with_default(true);

        let (id, moved) = site.relocate("new.example");

        assert_eq!(id.as_str(), "new_example");
        assert_eq!(moved.url, "new.example");
        assert_eq!(moved.database, "new_example");
        assert_eq!(moved.solr.as_deref(), Some("new_example"));
        assert_eq!(moved.cron_cmd, "cd web/sites/new_example ; drush core-cron");
        assert!(moved.default);
    }

    #[test]
    fn relocate_keeps_custom_cron_cmd() {
        let (_, mut site) = Site::new("Example", "old.example");
        site.cron_cmd = "drush cron".into();

        let (_, moved) = site.relocate("new.example");
        assert_eq!(moved.cron_cmd, "drush cron");
        assert!(moved.solr.is_none());
    }
}
