//! Domain value objects: SiteId, SiteStatus.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! `SiteId` is the only identifier the registry keys on; it is reused as the
//! database name, the Solr core name and the on-disk directory name, so the
//! derivation in [`SiteId::derive`] must stay deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── SiteId ────────────────────────────────────────────────────────────────────

/// Machine-safe site identifier (slug) derived from a site URL.
///
/// Invariant: only `[a-z0-9_]`, no leading, trailing or repeated `_` when
/// produced by [`SiteId::derive`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Derive the identifier for a site from its URL or name.
    ///
    /// Only the host portion is used: any scheme, credentials, port, path,
    /// query or fragment is dropped. The host is lower-cased and every run of
    /// characters outside `[a-z0-9]` collapses to a single `_`.
    ///
    /// ```
    /// use maestro_core::domain::SiteId;
    ///
    /// assert_eq!(SiteId::derive("old.example").as_str(), "old_example");
    /// assert_eq!(SiteId::derive("https://WWW.Uregni.gov.uk/").as_str(), "www_uregni_gov_uk");
    /// ```
    pub fn derive(url: &str) -> Self {
        let host = host_portion(url.trim());

        let mut slug = String::with_capacity(host.len());
        let mut pending_separator = false;

        for ch in host.chars() {
            if ch.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(ch.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }

        Self(slug)
    }

    /// Wrap an identifier that is already a slug (e.g. a map key read back
    /// from the project document or a CLI argument).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Strip everything around the host: `scheme://user@HOST:port/path?q#f`.
fn host_portion(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let rest = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
    rest.split(':').next().unwrap_or_default()
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SiteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SiteId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── SiteStatus ────────────────────────────────────────────────────────────────

/// Deployment status of a site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Development,
    Production,
}

impl SiteStatus {
    pub const ALL: [SiteStatus; 2] = [Self::Development, Self::Production];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown site status '{other}' (expected development or production)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_replaces_dots() {
        assert_eq!(SiteId::derive("old.example").as_str(), "old_example");
        assert_eq!(SiteId::derive("new.example").as_str(), "new_example");
    }

    #[test]
    fn derive_is_case_insensitive() {
        assert_eq!(
            SiteId::derive("Uregni.GOV.uk"),
            SiteId::derive("uregni.gov.uk")
        );
    }

    #[test]
    fn derive_is_deterministic() {
        let url = "daera-ni.gov.uk";
        assert_eq!(SiteId::derive(url), SiteId::derive(url));
    }

    #[test]
    fn derive_uses_host_only() {
        assert_eq!(
            SiteId::derive("https://admin@www.nidirect.gov.uk:8443/path?q=1#top").as_str(),
            "www_nidirect_gov_uk"
        );
    }

    #[test]
    fn derive_collapses_separators() {
        assert_eq!(SiteId::derive("my--site..example").as_str(), "my_site_example");
        assert_eq!(SiteId::derive("-edge.example-").as_str(), "edge_example");
        assert_eq!(SiteId::derive("My Site").as_str(), "my_site");
    }

    #[test]
    fn derive_is_stable_on_its_own_output() {
        let once = SiteId::derive("Some.Host-name.example");
        assert_eq!(SiteId::derive(once.as_str()), once);
    }

    #[test]
    fn derive_can_be_empty() {
        assert!(SiteId::derive("...").is_empty());
    }

    #[test]
    fn status_parses_aliases() {
        assert_eq!("prod".parse::<SiteStatus>().unwrap(), SiteStatus::Production);
        assert_eq!(
            "Development".parse::<SiteStatus>().unwrap(),
            SiteStatus::Development
        );
        assert!("staging".parse::<SiteStatus>().is_err());
    }
}
