//! Command handlers, one module per subcommand.
//!
//! Every handler receives the parsed arguments, a [`Workspace`] describing
//! the project on disk, and the [`OutputManager`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use maestro_adapters::{LocalStorage, default_registry};
use maestro_core::{
    application::{BuildService, ProjectLayout, ProjectRegistry, Storage},
    domain::{Schema, SiteId},
    error::MaestroError,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompt::Prompter,
};

pub mod completions;
pub mod project_build;
pub mod project_create;
pub mod project_info;
pub mod site_add;
pub mod site_default;
pub mod site_edit;
pub mod site_remove;

/// Schema location relative to the shell root.
const SCHEMA_RESOURCE: &str = "resources/schemas/maestro_project.yml";

/// Everything a command needs to reach the project on disk.
pub struct Workspace {
    pub root: PathBuf,
    pub layout: ProjectLayout,
    pub storage: Arc<dyn Storage>,
    pub schema: Schema,
    pub config: AppConfig,
    pub prompter: Prompter,
}

impl Workspace {
    pub fn open(config: AppConfig, root_flag: Option<&Path>, prompter: Prompter) -> CliResult<Self> {
        let root = config.project_root(root_flag)?;
        let schema = load_schema(config.shell.root.as_deref())?;
        debug!(root = %root.display(), "Using project root");

        Ok(Self {
            storage: Arc::new(LocalStorage::new(&root)),
            layout: config.layout(),
            root,
            schema,
            config,
            prompter,
        })
    }

    /// Load the project document.
    pub fn registry(&self) -> CliResult<ProjectRegistry> {
        ProjectRegistry::load(
            Arc::clone(&self.storage),
            self.layout.clone(),
            self.schema.clone(),
        )
        .with_cli_context(|| "loading the project")
    }

    /// A build over the built-in hosting providers.
    pub fn build_service(&self) -> BuildService {
        BuildService::new(
            Arc::clone(&self.storage),
            self.layout.clone(),
            default_registry(&self.layout),
        )
    }

    /// The site named on the command line, or one picked from the project.
    pub fn select_site(
        &self,
        registry: &ProjectRegistry,
        given: Option<String>,
        prompt: &str,
    ) -> CliResult<SiteId> {
        let ids: Vec<String> = registry.sites().keys().map(ToString::to_string).collect();
        let id = self.prompter.choose(given, prompt, &ids, "SITE_ID")?;
        Ok(SiteId::new(id))
    }
}

/// The shell's schema resource when present, else the built-in one.
fn load_schema(shell_root: Option<&Path>) -> CliResult<Schema> {
    if let Some(shell_root) = shell_root {
        let shell = LocalStorage::new(shell_root);
        let path = Path::new(SCHEMA_RESOURCE);
        if shell.exists(path) {
            debug!(path = %shell.resolve(path).display(), "Using shell schema");
            let document = shell
                .read(path)
                .with_cli_context(|| "reading the project schema")?;
            let value = document.into_yaml().ok_or_else(|| invalid_schema("not a YAML document"))?;
            return Schema::from_value(value).map_err(|e| invalid_schema(&e.to_string()));
        }
    }

    Schema::builtin().map_err(|e| invalid_schema(&e.to_string()))
}

fn invalid_schema(reason: &str) -> CliError {
    CliError::Core(MaestroError::Configuration {
        message: format!("project schema is invalid: {reason}"),
    })
}

/// Run a build after a mutating command when `--build` was given.
pub fn build_if_requested(
    build: bool,
    workspace: &Workspace,
    registry: &ProjectRegistry,
    output: &OutputManager,
) -> CliResult<()> {
    if build {
        project_build::run(workspace, registry.project(), output)?;
    }
    Ok(())
}
