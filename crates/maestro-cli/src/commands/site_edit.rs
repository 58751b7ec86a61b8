//! Implementation of `maestro site:edit`.
//!
//! A new URL that derives a different site ID renames the site: its
//! directories move to the new ID before the project file is written.

use tracing::instrument;

use maestro_core::{
    domain::{DomainError, Site, SiteId},
    error::MaestroError,
};

use crate::{
    cli::SiteEditArgs,
    commands::{Workspace, build_if_requested},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: SiteEditArgs, workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let mut registry = workspace.registry()?;
    let id = workspace.select_site(&registry, args.site_id.clone(), "Please select a site to edit")?;
    let current = registry
        .site(&id)
        .cloned()
        .ok_or_else(|| MaestroError::from(DomainError::SiteNotFound {
            site_id: id.to_string(),
        }))?;

    if args.is_empty() {
        output.warning(&format!("Nothing to change for {id}"))?;
        return build_if_requested(args.build, &workspace, &registry, &output);
    }

    let build = args.build;
    let (new_id, site) = apply(&id, current, args);

    if new_id == id {
        registry.update_site(&id, site)?;
        output.success(&format!("Updated site {id}"))?;
    } else {
        let stale = registry.rename_site(&id, new_id.clone(), site)?;
        output.success(&format!("Renamed site {id} to {new_id}"))?;
        for path in stale {
            output.warning(&format!("Could not remove {}; delete it by hand", path.display()))?;
        }
        output.info("Site directories moved; run project:build to recreate the web/sites link")?;
    }

    build_if_requested(build, &workspace, &registry, &output)
}

/// The edited site and the ID it will live under.
fn apply(id: &SiteId, mut site: Site, args: SiteEditArgs) -> (SiteId, Site) {
    if let Some(name) = args.name {
        site.name = name;
    }
    if let Some(status) = args.status {
        site.status = status.into();
    }
    if let Some(www) = args.www {
        site.www = www;
    }
    if let Some(spec) = args.cron_spec {
        site.cron_spec = spec;
    }

    let (new_id, site) = match args.url {
        Some(url) => site.relocate(url),
        None => (id.clone(), site),
    };

    match args.solr {
        Some(solr) => (new_id, site.with_solr(solr)),
        None => (new_id, site),
    }
}
