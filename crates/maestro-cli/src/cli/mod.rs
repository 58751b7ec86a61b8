//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use maestro_core::domain::SiteStatus;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "maestro",
    bin_name = "maestro",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Multi-site project registry and hosting environment builder",
    long_about = "Maestro keeps the sites of a multi-site project in project/project.yml \
                  and generates the hosting configuration for every provider the \
                  installed hosting package supports.",
    after_help = "EXAMPLES:\n\
        \x20 maestro project:create \"Unity Sites\" abc123def --type drupal\n\
        \x20 maestro site:add --name \"NI Direct\" --url www.nidirect.gov.uk --solr\n\
        \x20 maestro site:default nidirect_gov_uk\n\
        \x20 maestro project:build",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the project document.
    #[command(
        name = "project:create",
        visible_alias = "pc",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 maestro project:create \"Unity Sites\" abc123def --type drupal\n\
            \x20 maestro pc                          # prompts for everything"
    )]
    ProjectCreate(ProjectCreateArgs),

    /// Run every enabled hosting provider.
    #[command(
        name = "project:build",
        visible_alias = "pb",
        about = "Build hosting environments for this project"
    )]
    ProjectBuild,

    /// Show the project and its sites.
    #[command(
        name = "project:info",
        visible_alias = "pi",
        about = "Show project details",
        after_help = "EXAMPLES:\n\
            \x20 maestro project:info\n\
            \x20 maestro project:info --output-format json"
    )]
    ProjectInfo,

    /// Register a new site.
    #[command(
        name = "site:add",
        visible_alias = "sa",
        about = "Add a new site to the project",
        after_help = "EXAMPLES:\n\
            \x20 maestro site:add --name \"Utility Regulator\" --url uregni.gov.uk\n\
            \x20 maestro site:add --name \"NI Direct\" --url nidirect.gov.uk --www --solr --build"
    )]
    SiteAdd(SiteAddArgs),

    /// Change an existing site.
    #[command(
        name = "site:edit",
        visible_alias = "se",
        about = "Edit a site in the project",
        after_help = "EXAMPLES:\n\
            \x20 maestro site:edit uregni_gov_uk --status production\n\
            \x20 maestro site:edit uregni_gov_uk --url www.uregni.gov.uk   # moves the site directories"
    )]
    SiteEdit(SiteEditArgs),

    /// Mark one site as the default.
    #[command(
        name = "site:default",
        visible_alias = "sd",
        about = "Designate a site as the default for the project"
    )]
    SiteDefault(SiteDefaultArgs),

    /// Remove a site entry.
    #[command(
        name = "site:remove",
        visible_alias = "sr",
        about = "Remove a site from the project"
    )]
    SiteRemove(SiteRemoveArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 maestro completions bash > ~/.local/share/bash-completion/completions/maestro\n\
            \x20 maestro completions zsh  > ~/.zfunc/_maestro\n\
            \x20 maestro completions fish > ~/.config/fish/completions/maestro.fish"
    )]
    Completions(CompletionsArgs),
}

// ── project:create ────────────────────────────────────────────────────────────

/// Arguments for `maestro project:create`.
#[derive(Debug, Args)]
pub struct ProjectCreateArgs {
    /// Human readable project name.
    #[arg(value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Platform.sh project ID.
    #[arg(value_name = "ID", help = "Platform.sh project ID")]
    pub id: Option<String>,

    /// Project type, one of the types shipped by the hosting package.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Project type (e.g. drupal)"
    )]
    pub project_type: Option<String>,
}

// ── site:add ──────────────────────────────────────────────────────────────────

/// Arguments for `maestro site:add`.
#[derive(Debug, Args)]
pub struct SiteAddArgs {
    /// Human readable site name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Site name")]
    pub name: Option<String>,

    /// Hostname without protocol or trailing slash.
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help = "Site URL (minus the protocol and trailing slash)"
    )]
    pub url: Option<String>,

    #[arg(
        short = 's',
        long = "status",
        value_enum,
        default_value = "development",
        help = "Site status"
    )]
    pub status: StatusArg,

    #[arg(long = "solr", help = "The site requires a Solr search index")]
    pub solr: bool,

    #[arg(long = "www", help = "Serve the site from www")]
    pub www: bool,

    #[arg(long = "default", help = "Make this the default site")]
    pub default: bool,

    /// Cron schedule; falls back to the configured default.
    #[arg(long = "cron-spec", value_name = "SPEC", help = "Cron schedule")]
    pub cron_spec: Option<String>,

    #[arg(long = "build", help = "Rebuild the project afterwards")]
    pub build: bool,
}

// ── site:edit ─────────────────────────────────────────────────────────────────

/// Arguments for `maestro site:edit`.
///
/// Every field left out keeps its current value.
#[derive(Debug, Args)]
pub struct SiteEditArgs {
    #[arg(value_name = "SITE_ID", help = "Site ID (e.g. uregni_gov_uk)")]
    pub site_id: Option<String>,

    #[arg(short = 'n', long = "name", value_name = "NAME", help = "New site name")]
    pub name: Option<String>,

    /// A different URL changes the site ID and moves its directories.
    #[arg(short = 'u', long = "url", value_name = "URL", help = "New site URL")]
    pub url: Option<String>,

    #[arg(short = 's', long = "status", value_enum, help = "New site status")]
    pub status: Option<StatusArg>,

    #[arg(
        long = "solr",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Enable or disable the Solr search index"
    )]
    pub solr: Option<bool>,

    #[arg(
        long = "www",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Serve the site from www"
    )]
    pub www: Option<bool>,

    #[arg(long = "cron-spec", value_name = "SPEC", help = "New cron schedule")]
    pub cron_spec: Option<String>,

    #[arg(long = "build", help = "Rebuild the project afterwards")]
    pub build: bool,
}

impl SiteEditArgs {
    /// `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.url.is_none()
            && self.status.is_none()
            && self.solr.is_none()
            && self.www.is_none()
            && self.cron_spec.is_none()
    }
}

// ── site:default / site:remove ────────────────────────────────────────────────

/// Arguments for `maestro site:default`.
#[derive(Debug, Args)]
pub struct SiteDefaultArgs {
    #[arg(value_name = "SITE_ID", help = "Site ID (e.g. uregni_gov_uk)")]
    pub site_id: Option<String>,

    #[arg(long = "build", help = "Rebuild the project afterwards")]
    pub build: bool,
}

/// Arguments for `maestro site:remove`.
#[derive(Debug, Args)]
pub struct SiteRemoveArgs {
    #[arg(value_name = "SITE_ID", help = "Site ID (e.g. uregni_gov_uk)")]
    pub site_id: Option<String>,

    #[arg(long = "build", help = "Rebuild the project afterwards")]
    pub build: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `maestro completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Site status as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum StatusArg {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<StatusArg> for SiteStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Development => SiteStatus::Development,
            StatusArg::Production => SiteStatus::Production,
        }
    }
}

impl std::fmt::Display for StatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(SiteStatus::from(*self).as_str())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_display() {
        assert_eq!(StatusArg::Development.to_string(), "development");
        assert_eq!(StatusArg::Production.to_string(), "production");
    }

    #[test]
    fn parse_project_create() {
        let cli = Cli::parse_from([
            "maestro",
            "project:create",
            "Unity Sites",
            "abc123",
            "--type",
            "drupal",
        ]);
        match cli.command {
            Commands::ProjectCreate(args) => {
                assert_eq!(args.name.as_deref(), Some("Unity Sites"));
                assert_eq!(args.id.as_deref(), Some("abc123"));
                assert_eq!(args.project_type.as_deref(), Some("drupal"));
            }
            other => panic!("expected project:create, got {other:?}"),
        }
    }

    #[test]
    fn aliases_resolve() {
        let cli = Cli::parse_from(["maestro", "pb"]);
        assert!(matches!(cli.command, Commands::ProjectBuild));

        let cli = Cli::parse_from(["maestro", "sd", "uregni_gov_uk"]);
        assert!(matches!(cli.command, Commands::SiteDefault(_)));
    }

    #[test]
    fn site_add_defaults_to_development() {
        let cli = Cli::parse_from(["maestro", "site:add", "--name", "A", "--url", "a.example"]);
        if let Commands::SiteAdd(args) = cli.command {
            assert_eq!(args.status, StatusArg::Development);
            assert!(!args.solr && !args.www && !args.default && !args.build);
        } else {
            panic!("expected site:add");
        }
    }

    #[test]
    fn status_aliases() {
        let cli = Cli::parse_from(["maestro", "site:edit", "a", "--status", "prod"]);
        if let Commands::SiteEdit(args) = cli.command {
            assert_eq!(args.status, Some(StatusArg::Production));
        } else {
            panic!("expected site:edit");
        }
    }

    #[test]
    fn edit_toggles_take_optional_values() {
        let cli = Cli::parse_from(["maestro", "site:edit", "a", "--solr", "--www", "false"]);
        if let Commands::SiteEdit(args) = cli.command {
            assert_eq!(args.solr, Some(true));
            assert_eq!(args.www, Some(false));
            assert!(!args.is_empty());
        } else {
            panic!("expected site:edit");
        }
    }

    #[test]
    fn edit_without_fields_is_empty() {
        let cli = Cli::parse_from(["maestro", "site:edit", "a"]);
        if let Commands::SiteEdit(args) = cli.command {
            assert!(args.is_empty());
        } else {
            panic!("expected site:edit");
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["maestro", "--quiet", "--verbose", "project:info"]);
        assert!(result.is_err());
    }

    #[test]
    fn root_is_global() {
        let cli = Cli::parse_from(["maestro", "project:info", "--root", "/srv/unity"]);
        assert_eq!(
            cli.global.root.as_deref(),
            Some(std::path::Path::new("/srv/unity"))
        );
    }
}
