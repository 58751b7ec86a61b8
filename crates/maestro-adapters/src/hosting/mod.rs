//! Concrete hosting providers.
//!
//! Each provider reads its resources from
//! `<hosting package>/resources/<project type>/<provider name>` and is
//! enabled exactly when that directory exists.

mod lando;
mod platformsh;

use std::path::Path;

use serde::Serialize;

use maestro_core::{
    application::{ApplicationError, Document, HostingRegistry, ProjectLayout, Storage},
    error::MaestroResult,
};

pub use lando::Lando;
pub use platformsh::PlatformSh;

/// Registry with every built-in provider, in build order.
pub fn default_registry(layout: &ProjectLayout) -> HostingRegistry {
    HostingRegistry::new()
        .with(Box::new(Lando::new(layout.clone())))
        .with(Box::new(PlatformSh::new(layout.clone())))
}

/// Machine-safe application name for a project.
pub fn application_id(project_name: &str) -> String {
    project_name.replace(' ', "_").to_lowercase()
}

/// Serialize `value` and write it as YAML to `path`.
fn write_yaml<T: Serialize>(storage: &dyn Storage, path: &Path, value: &T) -> MaestroResult<()> {
    let document = serde_yaml::to_value(value).map_err(|e| ApplicationError::Document {
        path: path.to_path_buf(),
        action: "encode",
        reason: e.to_string(),
    })?;
    storage.write(path, &Document::Yaml(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_id_is_lowercase_with_underscores() {
        assert_eq!(application_id("Unity Sites"), "unity_sites");
        assert_eq!(application_id("NIDirect"), "nidirect");
    }

    #[test]
    fn default_registry_order() {
        let registry = default_registry(&ProjectLayout::default());
        assert_eq!(registry.names(), vec!["Lando", "PlatformSh"]);
    }
}
