use std::io;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod errors;
mod output;

#[cfg(test)]
mod test_support;

use commands::{
    branch_cmd::CreateBranchArgs,
    create_cmd::CreateArgs,
    protect_cmd::{ProtectArgs, ProtectSafeBranchesArgs},
    template_cmd::FromTemplateArgs,
};
use config::{AppConfig, DEFAULT_ENV_FILE};
use errors::Error;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// GitHub Repo Creator: create repositories and keep their safe branches protected
#[derive(Parser, Debug)]
#[command(name = "repo-creator")]
#[command(
    about = "Create GitHub repositories and keep their safe branches protected",
    long_about = None
)]
struct Cli {
    /// Environment file with the GitHub token and defaults
    #[arg(long, global = true, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a repository from a JSON file map or the default files
    Create(CreateArgs),

    /// Create a repository from an existing directory
    FromTemplate(FromTemplateArgs),

    /// Write the environment file interactively
    Setup,

    /// Protect every branch whose name contains the safe branch pattern
    ProtectSafeBranches(ProtectSafeBranchesArgs),

    /// Create a branch and protect it if it matches the safe branch pattern
    CreateBranch(CreateBranchArgs),

    /// Protect a single branch
    Protect(ProtectArgs),

    /// Check the GitHub token
    Test,

    /// Show the CLI version
    Version,
}

impl Commands {
    /// Returns true if the command talks to GitHub and therefore needs a token.
    fn needs_config(&self) -> bool {
        !matches!(self, Commands::Setup | Commands::Version)
    }
}

fn ask_user_for_value(request: &str) -> Result<String, Error> {
    print!("{}", request);

    io::stdout().flush().map_err(|_| Error::StdOutFlushFailed)?;

    let mut temp = String::new();
    io::stdin()
        .read_line(&mut temp)
        .map_err(|_| Error::StdInReadFailed)?;
    Ok(temp.trim().to_string())
}

fn version_text() -> String {
    format!(
        "repo-creator version {}",
        option_env!("REPO_CREATOR_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
    )
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config = if cli.command.needs_config() {
        Some(AppConfig::load(&cli.env_file)?)
    } else {
        None
    };

    match (&cli.command, config) {
        (Commands::Setup, _) => commands::setup_cmd::execute(&cli.env_file, &ask_user_for_value),
        (Commands::Version, _) => {
            println!("{}", version_text());
            Ok(())
        }
        (Commands::Create(args), Some(config)) => {
            commands::create_cmd::execute(args, &config).await
        }
        (Commands::FromTemplate(args), Some(config)) => {
            commands::template_cmd::execute(args, &config).await
        }
        (Commands::ProtectSafeBranches(args), Some(config)) => {
            // Per-branch failures are part of the printed report and do not change the
            // exit code.
            commands::protect_cmd::execute_safe_branches(args, &config)
                .await
                .map(|_| ())
        }
        (Commands::CreateBranch(args), Some(config)) => {
            commands::branch_cmd::execute(args, &config).await
        }
        (Commands::Protect(args), Some(config)) => {
            commands::protect_cmd::execute_protect(args, &config).await
        }
        (Commands::Test, Some(config)) => commands::connection_cmd::execute(&config).await,
        (command, None) => Err(Error::InvalidArguments(format!(
            "{:?} requires a configuration",
            command
        ))),
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("REPO_CREATOR_LOG"))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        error!("Command failed: {e}");
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
