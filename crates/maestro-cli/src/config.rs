//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the
//! [`ProjectLayout`] derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `MAESTRO_SHELL__ROOT`, `MAESTRO_DEFAULTS__CRON_SPEC`, ...
//! 3. Config file: `--config FILE`, else `config.toml` in the platform
//!    config directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use maestro_core::{application::ProjectLayout, domain::DEFAULT_CRON_SPEC};

use crate::error::{CliError, CliResult, IntoCli};

/// Marker file of a project root.
const ROOT_MARKER: &str = "composer.json";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the project lives.
    pub project: ProjectConfig,
    /// Where maestro itself is installed.
    pub shell: ShellConfig,
    /// Overrides for project-root-relative locations.
    pub layout: LayoutConfig,
    /// Values applied to new sites.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Install root; a `resources/schemas/maestro_project.yml` under it
    /// replaces the built-in schema.
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub project_dir: Option<PathBuf>,
    pub web_sites_dir: Option<PathBuf>,
    pub hosting_package: Option<PathBuf>,
    pub build_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub cron_spec: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            cron_spec: DEFAULT_CRON_SPEC.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("MAESTRO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|built| built.try_deserialize::<Self>())
            .map_err(|e| CliError::ConfigError {
                message: e.to_string(),
                source: Some(Box::new(e)),
            })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.maestro.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("uk.gov", "dof-dss", "maestro")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".maestro.toml"))
    }

    /// The project root: the `--root` flag, else the configured root, else
    /// the nearest ancestor of the working directory holding a
    /// `composer.json`, else the working directory itself.
    pub fn project_root(&self, flag: Option<&Path>) -> CliResult<PathBuf> {
        if let Some(root) = flag.or(self.project.root.as_deref()) {
            return Ok(root.to_path_buf());
        }

        let cwd = std::env::current_dir().with_cli_context(|| "reading the working directory")?;
        Ok(find_root(&cwd).unwrap_or(cwd))
    }

    /// The layout with configured overrides applied.
    ///
    /// Moving the project directory moves the document and status file with
    /// it.
    pub fn layout(&self) -> ProjectLayout {
        let mut layout = ProjectLayout::default();
        let overrides = &self.layout;

        if let Some(dir) = &overrides.project_dir {
            layout.project_file = dir.join("project.yml");
            layout.status_file = dir.join("README.md");
            layout.project_dir = dir.clone();
        }
        if let Some(dir) = &overrides.web_sites_dir {
            layout.web_sites_dir = dir.clone();
        }
        if let Some(dir) = &overrides.hosting_package {
            layout.hosting_package = dir.clone();
        }
        if let Some(file) = &overrides.build_config {
            layout.build_config = file.clone();
        }

        layout
    }
}

/// Nearest ancestor of `start` (inclusive) containing the root marker.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(ROOT_MARKER).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_cron_spec() {
        assert_eq!(AppConfig::default().defaults.cron_spec, "10 * * * *");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn default_layout_is_untouched() {
        assert_eq!(AppConfig::default().layout(), ProjectLayout::default());
    }

    #[test]
    fn project_dir_override_moves_document() {
        let mut cfg = AppConfig::default();
        cfg.layout.project_dir = Some(PathBuf::from("registry"));

        let layout = cfg.layout();
        assert_eq!(layout.project_file, PathBuf::from("registry/project.yml"));
        assert_eq!(layout.status_file, PathBuf::from("registry/README.md"));
        assert_eq!(layout.sites_dir(), PathBuf::from("registry/sites"));
    }

    #[test]
    fn config_file_is_layered_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("maestro.toml");
        fs::write(
            &path,
            "[shell]\nroot = \"/opt/maestro\"\n\n[defaults]\ncron_spec = \"0 3 * * *\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.shell.root, Some(PathBuf::from("/opt/maestro")));
        assert_eq!(cfg.defaults.cron_spec, "0 3 * * *");
        assert!(cfg.project.root.is_none());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let missing = PathBuf::from("/definitely/not/here/maestro.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn root_flag_wins() {
        let mut cfg = AppConfig::default();
        cfg.project.root = Some(PathBuf::from("/from/config"));

        let root = cfg.project_root(Some(Path::new("/from/flag"))).unwrap();
        assert_eq!(root, PathBuf::from("/from/flag"));
        assert_eq!(cfg.project_root(None).unwrap(), PathBuf::from("/from/config"));
    }

    #[test]
    fn root_is_found_by_composer_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("composer.json"), "{}").unwrap();
        let nested = dir.path().join("web/sites/a");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
