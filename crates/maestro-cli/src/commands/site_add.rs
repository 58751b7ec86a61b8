//! Implementation of `maestro site:add`.

use tracing::instrument;

use maestro_core::domain::Site;

use crate::{
    cli::SiteAddArgs,
    commands::{Workspace, build_if_requested},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: SiteAddArgs, workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let mut registry = workspace.registry()?;

    let prompter = workspace.prompter;
    let name = prompter.text(args.name, "Site name", "--name")?;
    let url = prompter.text(
        args.url,
        "Site URL (minus the protocol and trailing slash)",
        "--url",
    )?;

    let cron_spec = args
        .cron_spec
        .unwrap_or_else(|| workspace.config.defaults.cron_spec.clone());
    let (id, site) = Site::new(name, url);
    let site = site
        .with_status(args.status.into())
        .with_www(args.www)
        .with_solr(args.solr)
        .with_cron_spec(cron_spec)
        .with_default(args.default);

    registry.add_site(id.clone(), site)?;
    output.success(&format!("Added site {id}"))?;
    if args.default {
        output.info(&format!("{id} is now the default site"))?;
    }

    build_if_requested(args.build, &workspace, &registry, &output)
}
