//! Implementation of `maestro project:create`.

use std::sync::Arc;

use tracing::instrument;

use maestro_core::{
    application::{ProjectRegistry, known_project_types},
    domain::Project,
};

use crate::{
    cli::ProjectCreateArgs,
    commands::Workspace,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: ProjectCreateArgs, workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let prompter = workspace.prompter;
    let name = prompter.text(args.name, "Project name (human readable)", "NAME")?;
    let id = prompter.text(args.id, "Platform.sh project ID", "ID")?;
    let project_type = match args.project_type {
        Some(project_type) => project_type,
        None => {
            // An unreadable hosting package is reported by create() below.
            let known = known_project_types(workspace.storage.as_ref(), &workspace.layout)
                .unwrap_or_default();
            prompter.choose(None, "Project type", &known, "--type")?
        }
    };

    let registry = ProjectRegistry::create(
        Arc::clone(&workspace.storage),
        workspace.layout.clone(),
        workspace.schema.clone(),
        Project::new(name, id, project_type),
    )
    .with_cli_context(|| "creating the project")?;

    let project = registry.project();
    output.success(&format!(
        "Created project file {}",
        workspace.root.join(&workspace.layout.project_file).display()
    ))?;
    output.info(&format!(
        "{} ({}) is a {} project. Add sites with: maestro site:add",
        project.name, project.id, project.project_type
    ))?;
    Ok(())
}
