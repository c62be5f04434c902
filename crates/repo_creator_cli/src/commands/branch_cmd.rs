//! `create-branch` command.
//!
//! Creates a branch from the tip of another branch. A new branch whose name matches the
//! safe branch pattern is protected straight away.

use clap::Args;
use github_client::{BranchClient, RepositoryClient};
use repo_creator_core::{
    BranchCreationResult, BranchName, ContentPublisher, RepositoryCreator, RepositoryName,
    DEFAULT_BRANCH,
};
use tracing::instrument;

use crate::{commands::build_creator, config::AppConfig, errors::Error, output};

#[cfg(test)]
#[path = "branch_cmd_tests.rs"]
mod tests;

/// Command-line arguments for the create-branch command.
#[derive(Args, Debug)]
pub struct CreateBranchArgs {
    /// Repository to create the branch in.
    pub repo_name: String,

    /// Name of the new branch.
    pub branch_name: String,

    /// Branch whose tip the new branch starts from.
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub from: String,
}

/// Creates the branch and returns `owner/repo` with the result.
pub async fn run<C, P>(
    args: &CreateBranchArgs,
    creator: &RepositoryCreator<C, P>,
) -> Result<(String, BranchCreationResult), Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    let repo = RepositoryName::new(args.repo_name.as_str())?;
    let branch = BranchName::new(args.branch_name.as_str())?;
    let from = BranchName::new(args.from.as_str())?;

    let result = creator.create_branch(&repo, &branch, &from).await?;
    Ok((format!("{}/{}", result.owner, repo), result))
}

#[instrument(skip(config))]
pub async fn execute(args: &CreateBranchArgs, config: &AppConfig) -> Result<(), Error> {
    let creator = build_creator(config)?;
    let (full_name, result) = run(args, &creator).await?;
    println!("{}", output::format_branch_creation(&full_name, &result));
    Ok(())
}
