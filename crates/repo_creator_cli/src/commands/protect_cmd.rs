//! Branch protection commands.
//!
//! `protect-safe-branches` reconciles every branch of a repository against the safe branch
//! pattern. Branches that fail are listed in the report; only a failure to reach the
//! repository at all is returned as an error.
//!
//! `protect` applies the protection policy to one branch regardless of the pattern.

use clap::Args;
use github_client::{BranchClient, RepositoryClient};
use repo_creator_core::{
    BranchName, ContentPublisher, ReconciliationReport, RepositoryCreator, RepositoryName,
    DEFAULT_BRANCH,
};
use tracing::{info, instrument};

use crate::{
    commands::build_creator,
    config::AppConfig,
    errors::Error,
    output::{self, OutputFormat},
};

#[cfg(test)]
#[path = "protect_cmd_tests.rs"]
mod tests;

/// Command-line arguments for the protect-safe-branches command.
#[derive(Args, Debug)]
pub struct ProtectSafeBranchesArgs {
    /// Repository whose branches are reconciled.
    pub repo_name: String,

    /// Format of the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Command-line arguments for the protect command.
#[derive(Args, Debug)]
pub struct ProtectArgs {
    /// Repository containing the branch.
    pub repo_name: String,

    /// Branch to protect.
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    pub branch: String,
}

/// Reconciles the branches of the repository named in `args`.
pub async fn run_safe_branches<C, P>(
    args: &ProtectSafeBranchesArgs,
    creator: &RepositoryCreator<C, P>,
) -> Result<(String, ReconciliationReport), Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    let repo = RepositoryName::new(args.repo_name.as_str())?;
    let (owner, report) = creator.protect_safe_branches(&repo).await?;

    info!(
        newly_protected = report.newly_protected(),
        failed = report.failed(),
        "Reconciliation finished"
    );
    Ok((format!("{}/{}", owner, repo), report))
}

/// Executes protect-safe-branches and prints the report.
///
/// Succeeds even when individual branches failed; those are part of the report.
#[instrument(skip(config))]
pub async fn execute_safe_branches(
    args: &ProtectSafeBranchesArgs,
    config: &AppConfig,
) -> Result<ReconciliationReport, Error> {
    let creator = build_creator(config)?;
    let (full_name, report) = run_safe_branches(args, &creator).await?;
    let pattern = &config.safe_branch_pattern;
    println!(
        "{}",
        output::format_reconciliation(&full_name, pattern, &report, args.format)?
    );
    Ok(report)
}

/// Protects the branch named in `args` and returns `owner/repo`.
pub async fn run_protect<C, P>(
    args: &ProtectArgs,
    creator: &RepositoryCreator<C, P>,
) -> Result<String, Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    let repo = RepositoryName::new(args.repo_name.as_str())?;
    let branch = BranchName::new(args.branch.as_str())?;
    let owner = creator.protect_branch(&repo, &branch).await?;
    Ok(format!("{}/{}", owner, repo))
}

#[instrument(skip(config))]
pub async fn execute_protect(args: &ProtectArgs, config: &AppConfig) -> Result<(), Error> {
    let creator = build_creator(config)?;
    let full_name = run_protect(args, &creator).await?;
    println!("{}", output::format_protection(&full_name, &args.branch));
    Ok(())
}
