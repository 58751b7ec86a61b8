//! # Maestro CLI
//!
//! Multi-site project registry and hosting environment builder.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults, file, environment).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                  |
//! |------|------------------------------------------|
//! |  0   | Success                                  |
//! |  1   | Failure (build, filesystem, configuration) |
//! |  2   | Invalid input                            |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    commands::Workspace,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
    prompt::Prompter,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

fn main() -> ExitCode {
    // Silently ignored if .env doesn't exist.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here and must exit 0.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(e, verbose, cli.global.no_color),
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let no_color = cli.global.no_color || config.output.no_color;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("Maestro completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, no_color),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let Cli { global, command } = cli;
    let open = || Workspace::open(config, global.root.as_deref(), Prompter::new(&global));

    match command {
        Commands::Completions(args) => commands::completions::execute(args),
        Commands::ProjectCreate(args) => commands::project_create::execute(args, open()?, output),
        Commands::ProjectBuild => commands::project_build::execute(open()?, output),
        Commands::ProjectInfo => commands::project_info::execute(open()?, output),
        Commands::SiteAdd(args) => commands::site_add::execute(args, open()?, output),
        Commands::SiteEdit(args) => commands::site_edit::execute(args, open()?, output),
        Commands::SiteDefault(args) => commands::site_default::execute(args, open()?, output),
        Commands::SiteRemove(args) => commands::site_remove::execute(args, open()?, output),
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
fn handle_error(err: CliError, verbose: bool, no_color: bool) -> ExitCode {
    err.log();

    // Written to stderr so the message appears even when stdout is redirected.
    let colored = !no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());
    eprint!("{}", err.render(verbose, colored));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
