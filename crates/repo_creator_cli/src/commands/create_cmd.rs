//! Repository creation command module.
//!
//! `create` writes the initial files into a local directory, creates the repository on
//! GitHub, pushes the directory and sets up branch protection.
//!
//! The files come from a JSON file map given with `--files`:
//!
//! ```json
//! {
//!     "README.md": "# my-project\n",
//!     "src/main.py": "print('hello')\n"
//! }
//! ```
//!
//! Without `--files` a README and a Python `.gitignore` are generated.

use std::path::PathBuf;

use clap::Args;
use github_client::{BranchClient, RepositoryClient};
use repo_creator_core::{
    ContentPublisher, CreateRepositoryRequest, CreationResult, FileSet, RepositoryCreator,
    RepositoryName, DEFAULT_SAFE_BRANCH,
};
use tracing::{debug, instrument};

use crate::{
    commands::{absolute_path, build_creator, safe_branch_arg},
    config::AppConfig,
    errors::Error,
    output,
};

#[cfg(test)]
#[path = "create_cmd_tests.rs"]
mod tests;

/// Command-line arguments for the create command.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the new repository.
    pub repo_name: String,

    /// Repository description. Falls back to DEFAULT_DESCRIPTION.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Make the repository private. Also enabled by DEFAULT_PRIVATE=true.
    #[arg(short, long)]
    pub private: bool,

    /// Directory the files are written to and pushed from.
    #[arg(short, long, default_value = ".")]
    pub local_path: PathBuf,

    /// JSON file mapping relative paths to file contents.
    #[arg(short, long)]
    pub files: Option<PathBuf>,

    /// Name of the empty branch created after the initial push.
    #[arg(long, default_value = DEFAULT_SAFE_BRANCH)]
    pub safe_branch: String,

    /// Do not create the empty safe branch.
    #[arg(long, conflicts_with = "safe_branch")]
    pub no_safe_branch: bool,
}

/// Validates the arguments and loads the file map.
///
/// Runs before any network call, so a bad name or unreadable file map never leaves a
/// half-created repository behind.
pub fn build_request(
    args: &CreateArgs,
    config: &AppConfig,
) -> Result<CreateRepositoryRequest, Error> {
    let name = RepositoryName::new(args.repo_name.as_str())?;
    let safe_branch = safe_branch_arg(&args.safe_branch, args.no_safe_branch)?;

    let files = match &args.files {
        Some(path) => Some(FileSet::load_json(path)?),
        None => None,
    };

    Ok(CreateRepositoryRequest {
        description: args.description.clone(),
        private: args.private || config.default_private,
        files,
        safe_branch,
        ..CreateRepositoryRequest::new(name, absolute_path(&args.local_path)?)
    })
}

/// Creates the repository with the given creator.
pub async fn run<C, P>(
    args: &CreateArgs,
    config: &AppConfig,
    creator: &RepositoryCreator<C, P>,
) -> Result<CreationResult, Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    let request = build_request(args, config)?;
    debug!(
        repo = %request.name,
        private = request.private,
        local_path = ?request.local_path,
        "Creating repository"
    );

    Ok(creator.create_with_files(request).await?)
}

/// Executes the create command and prints the result.
#[instrument(skip(config))]
pub async fn execute(args: &CreateArgs, config: &AppConfig) -> Result<(), Error> {
    let creator = build_creator(config)?;
    let result = run(args, config, &creator).await?;
    println!("{}", output::format_creation(&result, &config.safe_branch_pattern));
    Ok(())
}
