//! Implementation of `maestro project:build`.

use tracing::instrument;

use maestro_core::domain::Project;

use crate::{
    commands::Workspace,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let registry = workspace.registry()?;
    run(&workspace, registry.project(), &output)
}

/// Build `project` and report providers and instructions.
#[instrument(skip_all, fields(project = %project.id))]
pub fn run(workspace: &Workspace, project: &Project, output: &OutputManager) -> CliResult<()> {
    let mut build = workspace.build_service();

    let spinner = output.spinner("Building hosting environments");
    let result = build
        .build(project)
        .with_cli_context(|| "building hosting environments");
    spinner.finish_and_clear();
    let report = result?;

    output.header("## Hosting setup ##")?;
    for provider in &report.providers {
        if provider.enabled {
            output.success(&format!("{} configuration generated", provider.name))?;
        } else {
            output.detail(&format!(
                "{} skipped: no resources for project type '{}'",
                provider.name, project.project_type
            ))?;
        }
    }
    if report.built_providers().next().is_none() {
        output.warning(&format!(
            "No hosting provider supports project type '{}'",
            project.project_type
        ))?;
    }
    output.info(&format!(
        "Site status written to {}",
        report.status_file.display()
    ))?;

    output.print("")?;
    output.header("## Instructions ##")?;
    output.listing(&report.instructions)?;
    Ok(())
}
