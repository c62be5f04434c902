//! `setup` command: write the `.env` file interactively.
//!
//! Every answer may be left blank. A blank token produces an empty `GITHUB_TOKEN=` line
//! to be filled in later; the other keys fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use repo_creator_core::{DEFAULT_DESCRIPTION, DEFAULT_SAFE_BRANCH_PATTERN};
use tracing::{info, instrument};

use crate::{
    config::{
        ENV_DEFAULT_DESCRIPTION, ENV_DEFAULT_PRIVATE, ENV_GITHUB_TOKEN, ENV_GITHUB_USERNAME,
        ENV_SAFE_BRANCH_PATTERN,
    },
    errors::Error,
};

#[cfg(test)]
#[path = "setup_cmd_tests.rs"]
mod tests;

/// What `setup` did with the environment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Written { path: PathBuf, token_missing: bool },
    /// The file existed and the user chose not to overwrite it.
    KeptExisting { path: PathBuf },
}

/// Values collected by the setup questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupValues {
    pub token: String,
    pub username: String,
    pub default_private: bool,
    pub default_description: String,
    pub safe_branch_pattern: String,
}

/// Asks the setup questions through `ask` and writes the answers to `env_file`.
///
/// `ask` prints a prompt and returns the trimmed answer.
#[instrument(skip(ask))]
pub fn run(
    env_file: &Path,
    ask: &dyn Fn(&str) -> Result<String, Error>,
) -> Result<SetupOutcome, Error> {
    if env_file.exists() {
        let answer = ask(&format!(
            "{} already exists. Overwrite it? [y/N]: ",
            env_file.display()
        ))?;
        if !is_yes(&answer) {
            info!("Keeping existing environment file {:?}", env_file);
            return Ok(SetupOutcome::KeptExisting {
                path: env_file.to_path_buf(),
            });
        }
    }

    let values = collect_values(ask)?;
    write_env_file(env_file, &values)?;

    Ok(SetupOutcome::Written {
        path: env_file.to_path_buf(),
        token_missing: values.token.is_empty(),
    })
}

/// Runs setup and prints what happened.
pub fn execute(env_file: &Path, ask: &dyn Fn(&str) -> Result<String, Error>) -> Result<(), Error> {
    match run(env_file, ask)? {
        SetupOutcome::Written {
            path,
            token_missing,
        } => {
            println!("{} {}", "✓ Wrote".green(), path.display());
            if token_missing {
                println!(
                    "{} Set {} in {} before running other commands.",
                    "⚠".yellow(),
                    ENV_GITHUB_TOKEN,
                    path.display()
                );
            }
        }
        SetupOutcome::KeptExisting { path } => {
            println!("Kept the existing {}", path.display());
        }
    }
    Ok(())
}

fn collect_values(ask: &dyn Fn(&str) -> Result<String, Error>) -> Result<SetupValues, Error> {
    let token = ask("GitHub personal access token (repo scope): ")?;
    let username = ask("GitHub username or organization (blank for the token's user): ")?;
    let default_private = is_yes(&ask("Create private repositories by default? [y/N]: ")?);

    let default_description = non_blank_or(
        ask(&format!("Default description [{}]: ", DEFAULT_DESCRIPTION))?,
        DEFAULT_DESCRIPTION,
    );
    let safe_branch_pattern = non_blank_or(
        ask(&format!(
            "Safe branch pattern [{}]: ",
            DEFAULT_SAFE_BRANCH_PATTERN
        ))?,
        DEFAULT_SAFE_BRANCH_PATTERN,
    );

    Ok(SetupValues {
        token,
        username,
        default_private,
        default_description,
        safe_branch_pattern,
    })
}

/// Renders the values as `KEY=VALUE` lines.
///
/// The description is quoted since it usually contains spaces.
pub fn render_env_file(values: &SetupValues) -> String {
    let mut content = String::from("# GitHub repository creator configuration\n");
    content.push_str(&format!("{}={}\n", ENV_GITHUB_TOKEN, values.token));
    if !values.username.is_empty() {
        content.push_str(&format!("{}={}\n", ENV_GITHUB_USERNAME, values.username));
    }
    content.push_str(&format!("{}={}\n", ENV_DEFAULT_PRIVATE, values.default_private));
    content.push_str(&format!(
        "{}=\"{}\"\n",
        ENV_DEFAULT_DESCRIPTION,
        values.default_description.replace('"', "\\\"")
    ));
    content.push_str(&format!(
        "{}={}\n",
        ENV_SAFE_BRANCH_PATTERN, values.safe_branch_pattern
    ));
    content
}

fn write_env_file(path: &Path, values: &SetupValues) -> Result<(), Error> {
    let write_error = |e: std::io::Error| Error::WriteFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    fs::write(path, render_env_file(values)).map_err(write_error)?;

    // The file holds the token.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    info!("Wrote environment file {:?}", path);
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn non_blank_or(answer: String, default: &str) -> String {
    if answer.trim().is_empty() {
        default.to_string()
    } else {
        answer.trim().to_string()
    }
}
