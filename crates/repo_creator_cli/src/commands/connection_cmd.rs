//! `test` command: verify that the token works.

use github_client::{BranchClient, RepositoryClient};
use repo_creator_core::{ConnectionReport, ContentPublisher, RepositoryCreator};
use tracing::instrument;

use crate::{commands::build_creator, config::AppConfig, errors::Error, output};

#[cfg(test)]
#[path = "connection_cmd_tests.rs"]
mod tests;

pub async fn run<C, P>(creator: &RepositoryCreator<C, P>) -> Result<ConnectionReport, Error>
where
    C: RepositoryClient + BranchClient,
    P: ContentPublisher,
{
    Ok(creator.check_connection().await?)
}

/// Prints the authenticated user and their most recently updated repositories.
#[instrument(skip(config))]
pub async fn execute(config: &AppConfig) -> Result<(), Error> {
    let creator = build_creator(config)?;
    let report = run(&creator).await?;
    println!("{}", output::format_connection(&report));
    Ok(())
}
