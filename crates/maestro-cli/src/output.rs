//! Output management and formatting.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    verbose: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            // JSON output carries its own payload; status lines would corrupt it.
            quiet: args.quiet || resolved_format == OutputFormat::Json,
            verbose: args.verbose > 0,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Detail line shown only with `-v`.
    pub fn detail(&self, msg: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let line = if self.no_color {
            format!("  {msg}")
        } else {
            format!("  {}", msg.dimmed())
        };
        self.print(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Bulleted list, one line per item.
    pub fn listing(&self, items: &[String]) -> io::Result<()> {
        for item in items {
            self.print(&format!(" * {item}"))?;
        }
        Ok(())
    }

    /// Pretty JSON on stdout; never suppressed.
    pub fn json<T: Serialize>(&self, value: &T) -> Result<(), crate::error::CliError> {
        let rendered = serde_json::to_string_pretty(value)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        Ok(())
    }

    /// Spinner for long-running steps; hidden unless output is for a human.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color: false,
            config: None,
            root: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.quiet);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn json_format_implies_quiet() {
        let out = make_manager(false, OutputFormat::Json);
        assert!(out.quiet);
        assert!(out.spinner("building").is_hidden());
    }

    #[test]
    fn plain_format_has_no_color() {
        assert!(make_manager(false, OutputFormat::Plain).no_color);
        assert!(!make_manager(false, OutputFormat::Human).no_color);
    }

    #[test]
    fn config_can_disable_color() {
        let args = GlobalArgs {
            verbose: 0,
            quiet: false,
            no_color: false,
            config: None,
            root: None,
            output_format: OutputFormat::Human,
        };
        let mut config = AppConfig::default();
        config.output.no_color = true;
        assert!(OutputManager::new(&args, &config).no_color);
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, OutputFormat::Plain);
        assert_eq!(out.format(), OutputFormat::Plain);
    }
}
