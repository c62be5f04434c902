use repo_creator_core::{RepoCreatorError, ValidationError};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the repo-creator CLI application.
///
/// Failures of the repository operations themselves are carried in [`Error::Core`]; the
/// remaining variants cover the terminal and the local files the CLI reads and writes.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation of the core library failed.
    #[error(transparent)]
    Core(#[from] RepoCreatorError),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The `.env` file exists but could not be parsed.
    #[error("Failed to load environment file '{path}': {reason}")]
    LoadEnvFile { path: String, reason: String },

    /// A file could not be written.
    #[error("Failed to write '{path}': {reason}")]
    WriteFile { path: String, reason: String },

    /// Failed to render command output.
    #[error("Failed to format output: {0}")]
    Output(String),

    /// Failed to flush the standard output buffer.
    ///
    /// This error occurs when the CLI cannot write output to the terminal,
    /// typically due to broken pipes or terminal issues.
    #[error("Failed to flush the std out buffer.")]
    StdOutFlushFailed,

    /// Failed to read an answer from standard input.
    #[error("Failed to read from standard input.")]
    StdInReadFailed,
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Error::Core(value.into())
    }
}

impl Error {
    /// Returns a hint telling the user how to fix the error, if one is known.
    pub fn remediation_hint(&self) -> Option<&'static str> {
        match self {
            Error::Core(e) => e.remediation_hint(),
            Error::LoadEnvFile { .. } => {
                Some("Each line of the environment file must have the form KEY=VALUE.")
            }
            _ => None,
        }
    }
}
