//! Implementation of `maestro site:remove`.

use tracing::instrument;

use crate::{
    cli::SiteRemoveArgs,
    commands::{Workspace, build_if_requested},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: SiteRemoveArgs, workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let mut registry = workspace.registry()?;
    let id = workspace.select_site(&registry, args.site_id, "Please select a site to remove")?;

    let removed = registry.remove_site(&id)?;
    output.success(&format!("Removed site {id} ({})", removed.url))?;
    if removed.default {
        output.warning("The project no longer has a default site; pick one with: maestro site:default")?;
    }
    for dir in registry.layout().site_directories(&id) {
        if workspace.storage.exists(&dir) {
            output.detail(&format!("{} was left in place", dir.display()))?;
        }
    }

    build_if_requested(args.build, &workspace, &registry, &output)
}
