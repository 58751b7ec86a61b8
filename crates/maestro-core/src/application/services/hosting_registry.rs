//! Registered hosting providers and the project types they support.

use tracing::debug;

use crate::{
    application::{
        ApplicationError, ProjectLayout,
        ports::{EntryFilter, HostingProvider, Storage},
    },
    domain::Project,
    error::MaestroResult,
};

/// Ordered set of hosting providers.
///
/// Registration order is build order.
#[derive(Default)]
pub struct HostingRegistry {
    providers: Vec<Box<dyn HostingProvider>>,
}

impl HostingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Box<dyn HostingProvider>) {
        debug!(provider = provider.name(), "Hosting provider registered");
        self.providers.push(provider);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, provider: Box<dyn HostingProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub(crate) fn providers_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn HostingProvider>> {
        self.providers.iter_mut()
    }
}

impl std::fmt::Debug for HostingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostingRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Project types provided by the installed hosting package.
///
/// Each directory under `<package>/resources` is one type.
pub fn known_project_types(storage: &dyn Storage, layout: &ProjectLayout) -> MaestroResult<Vec<String>> {
    let resources = layout.hosting_resources();
    if !storage.exists(&resources) {
        return Err(ApplicationError::MissingDependency {
            path: layout.hosting_package.clone(),
        }
        .into());
    }

    let types = storage
        .list_entries(&resources, EntryFilter::Directories)?
        .into_iter()
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    Ok(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{BuildStepResult, MockStorage};

    struct Named(&'static str);

    impl HostingProvider for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn build(&mut self, _: &Project, _: &dyn Storage) -> BuildStepResult {
            Ok(())
        }

        fn instructions(&self) -> &[String] {
            &[]
        }
    }

    #[test]
    fn registration_order_is_kept() {
        let registry = HostingRegistry::new()
            .with(Box::new(Named("Lando")))
            .with(Box::new(Named("PlatformSh")));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Lando", "PlatformSh"]);
    }

    #[test]
    fn project_types_are_resource_directories() {
        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(true);
        storage
            .expect_list_entries()
            .withf(|_, filter| *filter == EntryFilter::Directories)
            .returning(|path, _| {
                Ok(vec![path.join("drupal"), path.join("wordpress")])
            });

        let types = known_project_types(&storage, &ProjectLayout::default()).unwrap();
        assert_eq!(types, vec!["drupal", "wordpress"]);
    }

    #[test]
    fn missing_package_is_missing_dependency() {
        let mut storage = MockStorage::new();
        storage.expect_exists().return_const(false);
        storage.expect_list_entries().never();

        let err = known_project_types(&storage, &ProjectLayout::default()).unwrap_err();
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingDependency { .. })
        ));
    }
}
