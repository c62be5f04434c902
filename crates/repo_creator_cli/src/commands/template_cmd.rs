//! `from-template` command: create a repository from an existing directory.
//!
//! The directory is pushed as it is. When it is already a git repository its history is
//! kept and a commit is only added for uncommitted changes.

use std::path::PathBuf;

use clap::Args;
use github_client::{BranchClient, RepositoryClient};
use repo_creator_core::{
    ContentPublisher, CreationResult, RepositoryCreator, RepositoryName,
    TemplateRepositoryRequest, DEFAULT_SAFE_BRANCH,
};
use tracing::instrument;

use crate::{
    commands::{absolute_path, build_creator, safe_branch_arg},
    config::AppConfig,
    errors::Error,
    output,
};

#[cfg(test)]
#[path = "template_cmd_tests.rs"]
mod tests;

/// Command-line arguments for the from-template command.
#[derive(Args, Debug)]
pub struct FromTemplateArgs {
    /// Name of the new repository.
    pub repo_name: String,

    /// Directory whose content becomes the initial content of the repository.
    pub template_path: PathBuf,

    /// Repository description. Falls back to DEFAULT_DESCRIPTION.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Make the repository private. Also enabled by DEFAULT_PRIVATE=true.
    #[arg(short, long)]
    pub private: bool,

    /// Name of the empty branch created after the initial push.
    #[arg(long, default_value = DEFAULT_SAFE_BRANCH)]
    pub safe_branch: String,

    /// Do not create the empty safe branch.
    #[arg(long, conflicts_with = "safe_branch")]
    pub no_safe_branch: bool,
}

pub fn build_request(
    args: &FromTemplateArgs,
    config: &AppConfig,
) -> Result<TemplateRepositoryRequest, Error> {
    let name = RepositoryName::new(args.repo_name.as_str())?;
    let safe_branch = safe_branch_arg(&args.safe_branch, args.no_safe_branch)?;

    Ok(TemplateRepositoryRequest {
        description: args.description.clone(),
        private: args.private || config.default_private,
        safe_branch,
        ..TemplateRepositoryRequest::new(name, absolute_path(&args.template_path)?)
    })
}

pub async fn run<C, P>(
    args: &FromTemplateArgs,
    config: &AppConfig,
    creator: &RepositoryCreator<C, P>,
) -> Result<CreationResult, Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    let request = build_request(args, config)?;
    Ok(creator.create_from_directory(request).await?)
}

/// Executes the from-template command and prints the result.
#[instrument(skip(config))]
pub async fn execute(args: &FromTemplateArgs, config: &AppConfig) -> Result<(), Error> {
    let creator = build_creator(config)?;
    let result = run(args, config, &creator).await?;
    println!("{}", output::format_creation(&result, &config.safe_branch_pattern));
    Ok(())
}
