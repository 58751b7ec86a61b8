//! Implementation of `maestro site:default`.

use tracing::instrument;

use crate::{
    cli::SiteDefaultArgs,
    commands::{Workspace, build_if_requested},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: SiteDefaultArgs, workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let mut registry = workspace.registry()?;
    let id = workspace.select_site(&registry, args.site_id, "Please select the default site")?;

    registry.set_default(&id)?;
    output.success(&format!("{id} is now the default site"))?;

    build_if_requested(args.build, &workspace, &registry, &output)
}
