//! Errors reported by the `maestro` binary.
//!
//! A [`CliError`] wraps everything a command can fail with. It knows the
//! exit code it maps to, the hints printed under the message, and how to
//! render itself on stderr.

use std::error::Error;
use std::fmt::Write as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use maestro_core::error::{ErrorCategory as CoreCategory, MaestroError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A value was given but cannot be used.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value was neither given on the command line nor prompted for.
    #[error("Missing required value: {argument}")]
    MissingArgument { argument: &'static str },

    /// `maestro.yml` or the user config file is unreadable or malformed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Core(#[from] MaestroError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// `--output-format json` could not serialize the result.
    #[error("Could not render JSON output")]
    Json(#[from] serde_json::Error),

    /// The user backed out of an interactive choice.
    #[error("Operation cancelled")]
    Cancelled,

    /// A prompt was needed but the binary was built without `interactive`.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

/// How a failure is reported and which exit code it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad arguments or a registry rule the user broke. Exits 2.
    UserError,
    /// The project or a file it needs is missing.
    NotFound,
    /// The project cannot be built in its current state.
    Failure,
    Configuration,
    Internal,
}

impl ErrorCategory {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::UserError => 2,
            Self::NotFound | Self::Failure | Self::Configuration | Self::Internal => 1,
        }
    }
}

impl CliError {
    /// Hints printed under the error message.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],
            Self::MissingArgument { argument } => vec![
                format!("Pass {argument} on the command line"),
                "Or run the command from a terminal to be prompted for it".into(),
            ],
            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use the MAESTRO_ prefix, e.g. MAESTRO_SHELL__ROOT".into(),
            ],
            Self::Core(core_err) => core_err.suggestions(),
            Self::IoError { .. } => vec!["Check that the project directory is writable".into()],
            Self::Json(_) => vec!["Retry with --output-format human".into()],
            Self::Cancelled => vec!["No changes were made".into()],
            Self::FeatureNotAvailable { feature } => vec![
                format!("Rebuild with prompts enabled: cargo install maestro-cli --features {feature}"),
                "Or pass every value on the command line".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::MissingArgument { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                // An unknown site ID is a bad argument; a missing project is not.
                CoreCategory::NotFound if core.as_domain().is_some() => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Precondition => ErrorCategory::Failure,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Json(_) => ErrorCategory::Internal,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }

    /// The stderr report: message, the cause chain when `verbose`, then hints.
    pub fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: &str, styled: fn(&str) -> String| {
            if colored { styled(text) } else { text.to_string() }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n{} {self}",
            paint("Error:", |s| s.red().bold().to_string())
        );

        if verbose {
            let mut cause = self.source();
            while let Some(err) = cause {
                let line = format!("  caused by: {err}");
                let _ = writeln!(out, "{}", paint(&line, |s| s.dimmed().to_string()));
                cause = err.source();
            }
        }

        let hints = self.suggestions();
        if !hints.is_empty() {
            let _ = writeln!(out, "\n{}", paint("Suggestions:", |s| s.yellow().bold().to_string()));
            for hint in &hints {
                let _ = writeln!(out, "  {hint}");
            }
        }

        if !verbose {
            let _ = writeln!(
                out,
                "\n{}",
                paint("Run again with -v for more details.", |s| s.dimmed().to_string())
            );
        }

        out
    }

    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, error = %self, "command failed")
            }
            _ => tracing::warn!(?category, error = %self, "command failed"),
        }
        if let Some(source) = self.source() {
            tracing::debug!(%source, "underlying cause");
        }
    }
}

/// Attach a description of what was being attempted when a foreign error is
/// lifted into a [`CliError`].
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, MaestroError> {
    /// Core errors already name the path or site involved, so the context
    /// only goes to the debug log.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| {
            tracing::debug!(context = %f().into(), "core operation failed");
            CliError::Core(e)
        })
    }
}
