//! Configuration management for the repo-creator CLI.
//!
//! Settings come from the process environment, optionally seeded from a `.env` file. Values
//! already present in the environment take precedence over the file. The configuration
//! is resolved once at startup into an [`AppConfig`] that is passed to the commands.
//!
//! | Key | Required | Default |
//! |---|---|---|
//! | `GITHUB_TOKEN` | yes | |
//! | `GITHUB_USERNAME` | no | login of the token's user |
//! | `DEFAULT_PRIVATE` | no | `false` |
//! | `DEFAULT_DESCRIPTION` | no | `Created with GitHub Repo Creator` |
//! | `SAFE_BRANCH_PATTERN` | no | `safe` |

use std::path::Path;

use repo_creator_core::{
    ConfigurationError, CreatorSettings, OwnerName, PatternMatcher, ProtectionPolicy,
    RepoCreatorError, DEFAULT_DESCRIPTION, DEFAULT_SAFE_BRANCH_PATTERN,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::errors::Error;

/// Default name of the environment file.
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_GITHUB_USERNAME: &str = "GITHUB_USERNAME";
pub const ENV_DEFAULT_PRIVATE: &str = "DEFAULT_PRIVATE";
pub const ENV_DEFAULT_DESCRIPTION: &str = "DEFAULT_DESCRIPTION";
pub const ENV_SAFE_BRANCH_PATTERN: &str = "SAFE_BRANCH_PATTERN";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Resolved configuration of the CLI.
#[derive(Debug)]
pub struct AppConfig {
    /// Personal access token used for API calls and pushes
    pub token: SecretString,
    /// Account owning the repositories; the token's user when `None`
    pub username: Option<OwnerName>,
    pub default_private: bool,
    pub default_description: String,
    pub safe_branch_pattern: String,
}

impl AppConfig {
    /// Loads `env_file` (when it exists) into the environment, then reads the configuration.
    pub fn load(env_file: &Path) -> Result<Self, Error> {
        load_env_file(env_file)?;
        Self::from_env()
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a key lookup function.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `GITHUB_TOKEN` is missing or blank, when
    /// `GITHUB_USERNAME` is not a valid account name, or when `DEFAULT_PRIVATE` is not a
    /// boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = non_blank(ENV_GITHUB_TOKEN).ok_or_else(|| missing(ENV_GITHUB_TOKEN))?;

        let username = match non_blank(ENV_GITHUB_USERNAME) {
            Some(name) => Some(OwnerName::new(name.trim()).map_err(|e| {
                invalid(ENV_GITHUB_USERNAME, e.to_string())
            })?),
            None => None,
        };

        let default_private = match non_blank(ENV_DEFAULT_PRIVATE) {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                invalid(ENV_DEFAULT_PRIVATE, format!("'{}' is not a boolean", value))
            })?,
            None => false,
        };

        let default_description = non_blank(ENV_DEFAULT_DESCRIPTION)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let safe_branch_pattern = lookup(ENV_SAFE_BRANCH_PATTERN)
            .unwrap_or_else(|| DEFAULT_SAFE_BRANCH_PATTERN.to_string());
        if safe_branch_pattern.trim().is_empty() {
            warn!("{} is blank, no branch will match it", ENV_SAFE_BRANCH_PATTERN);
        }

        debug!(
            username = ?username,
            default_private = default_private,
            safe_branch_pattern = safe_branch_pattern,
            "Configuration resolved"
        );

        Ok(Self {
            token: SecretString::from(token.trim().to_string()),
            username,
            default_private,
            default_description,
            safe_branch_pattern,
        })
    }

    pub fn matcher(&self) -> PatternMatcher {
        PatternMatcher::new(self.safe_branch_pattern.clone())
    }

    /// Settings for the repository creator derived from this configuration.
    pub fn creator_settings(&self) -> CreatorSettings {
        CreatorSettings {
            owner: self.username.clone(),
            default_description: self.default_description.clone(),
            matcher: self.matcher(),
            policy: ProtectionPolicy::default(),
        }
    }
}

/// Loads `KEY=VALUE` pairs from `path` into the process environment.
///
/// Variables that are already set are left untouched. Returns `false` when the file does
/// not exist.
pub fn load_env_file(path: &Path) -> Result<bool, Error> {
    if !path.exists() {
        debug!("No environment file at {:?}", path);
        return Ok(false);
    }

    dotenvy::from_path(path).map_err(|e| Error::LoadEnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    info!("Loaded environment file {:?}", path);
    Ok(true)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn missing(key: &str) -> Error {
    RepoCreatorError::from(ConfigurationError::MissingValue {
        key: key.to_string(),
    })
    .into()
}

fn invalid(key: &str, reason: String) -> Error {
    RepoCreatorError::from(ConfigurationError::InvalidValue {
        key: key.to_string(),
        reason,
    })
    .into()
}
