//! Implementation of `maestro project:info`.

use serde::Serialize;

use maestro_core::domain::Project;

use crate::{
    cli::OutputFormat,
    commands::Workspace,
    error::CliResult,
    output::OutputManager,
};

/// JSON shape of one site.
#[derive(Debug, Serialize)]
struct SiteView<'a> {
    id: &'a str,
    name: &'a str,
    url: &'a str,
    status: &'a str,
    default: bool,
    www: bool,
    solr: bool,
}

/// JSON shape of the whole project.
#[derive(Debug, Serialize)]
struct ProjectView<'a> {
    name: &'a str,
    id: &'a str,
    project_type: &'a str,
    sites: Vec<SiteView<'a>>,
}

impl<'a> From<&'a Project> for ProjectView<'a> {
    fn from(project: &'a Project) -> Self {
        Self {
            name: &project.name,
            id: &project.id,
            project_type: &project.project_type,
            sites: project
                .sites()
                .iter()
                .map(|(id, site)| SiteView {
                    id: id.as_str(),
                    name: &site.name,
                    url: &site.url,
                    status: site.status.as_str(),
                    default: site.default,
                    www: site.www,
                    solr: site.requires_solr(),
                })
                .collect(),
        }
    }
}

pub fn execute(workspace: Workspace, output: OutputManager) -> CliResult<()> {
    let registry = workspace.registry()?;
    let project = registry.project();

    if output.format() == OutputFormat::Json {
        return output.json(&ProjectView::from(project));
    }

    output.header(&format!("{} ({})", project.name, project.id))?;
    output.print(&format!("Type: {}", project.project_type))?;
    output.print("")?;

    if !project.has_sites() {
        output.warning("No sites defined. Add one with: maestro site:add")?;
        return Ok(());
    }
    for line in site_table(project) {
        output.print(&line)?;
    }
    Ok(())
}

/// Aligned table of the project's sites, header first.
fn site_table(project: &Project) -> Vec<String> {
    let rows: Vec<[String; 5]> = project
        .sites()
        .iter()
        .map(|(id, site)| {
            [
                id.to_string(),
                site.name.clone(),
                site.url.clone(),
                site.status.to_string(),
                if site.default { "*".into() } else { String::new() },
            ]
        })
        .collect();

    let header = ["ID", "Name", "URL", "Status", "Default"].map(String::from);
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .collect()
}
