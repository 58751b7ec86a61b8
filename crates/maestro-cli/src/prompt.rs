//! Interactive fallbacks for values missing from the command line.
//!
//! Prompts are only shown when both stdin and stderr are terminals and the
//! output is meant for a human. Everywhere else a missing value is an
//! input error, so scripted runs never block.

use std::io::{self, IsTerminal};

use crate::{
    cli::{GlobalArgs, OutputFormat},
    error::{CliError, CliResult},
};

#[derive(Debug, Clone, Copy)]
pub struct Prompter {
    interactive: bool,
}

impl Prompter {
    pub fn new(args: &GlobalArgs) -> Self {
        Self {
            interactive: !args.quiet
                && args.output_format != OutputFormat::Json
                && io::stdin().is_terminal()
                && io::stderr().is_terminal(),
        }
    }

    /// Never prompts.
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { interactive: false }
    }

    /// `given`, else an answer typed by the user.
    pub fn text(
        &self,
        given: Option<String>,
        prompt: &str,
        argument: &'static str,
    ) -> CliResult<String> {
        match given {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
            Some(_) => Err(CliError::InvalidInput {
                message: format!("{argument} must not be empty"),
                source: None,
            }),
            None if self.interactive => ask_text(prompt),
            None => Err(CliError::MissingArgument { argument }),
        }
    }

    /// `given`, else one of `choices` picked by the user.
    ///
    /// Escaping the menu cancels the command.
    pub fn choose(
        &self,
        given: Option<String>,
        prompt: &str,
        choices: &[String],
        argument: &'static str,
    ) -> CliResult<String> {
        match given {
            Some(value) => Ok(value),
            None if self.interactive && !choices.is_empty() => {
                let picked = ask_choice(prompt, choices)?.ok_or(CliError::Cancelled)?;
                choices.get(picked).cloned().ok_or(CliError::Cancelled)
            }
            None => Err(CliError::MissingArgument { argument }),
        }
    }
}

#[cfg(feature = "interactive")]
fn ask_text(prompt: &str) -> CliResult<String> {
    use dialoguer::{Input, theme::ColorfulTheme};

    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_failed)?;
    Ok(answer.trim().to_owned())
}

#[cfg(feature = "interactive")]
fn ask_choice(prompt: &str, choices: &[String]) -> CliResult<Option<usize>> {
    use dialoguer::{Select, theme::ColorfulTheme};

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(choices)
        .default(0)
        .interact_opt()
        .map_err(prompt_failed)
}

#[cfg(feature = "interactive")]
fn prompt_failed(err: dialoguer::Error) -> CliError {
    CliError::IoError {
        message: "failed to read interactive input".into(),
        source: io::Error::other(err.to_string()),
    }
}

#[cfg(not(feature = "interactive"))]
fn ask_text(_prompt: &str) -> CliResult<String> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(not(feature = "interactive"))]
fn ask_choice(_prompt: &str, _choices: &[String]) -> CliResult<Option<usize>> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}
