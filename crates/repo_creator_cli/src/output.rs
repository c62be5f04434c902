//! Terminal output for the repo-creator commands.
//!
//! Every function renders into a `String`; the commands decide where it is printed.

use clap::ValueEnum;
use colored::Colorize;
use repo_creator_core::{
    BranchCreationResult, BranchOutcome, ConnectionReport, CreationResult, ReconciliationReport,
    SafeBranchOutcome,
};

use crate::errors::Error;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Renders a reconciliation report in the requested format.
pub fn format_reconciliation(
    full_name: &str,
    pattern: &str,
    report: &ReconciliationReport,
    format: OutputFormat,
) -> Result<String, Error> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| Error::Output(e.to_string()))
        }
        OutputFormat::Pretty => Ok(format_reconciliation_pretty(full_name, pattern, report)),
    }
}

fn format_reconciliation_pretty(
    full_name: &str,
    pattern: &str,
    report: &ReconciliationReport,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} (pattern: \"{}\")\n",
        "Branch protection for".bold(),
        full_name.bold().bright_cyan(),
        pattern
    ));

    if report.results().is_empty() {
        output.push_str(&format!("  {}\n", "(no branches)".dimmed()));
    }

    for result in report.results() {
        output.push_str(&format!("  {}\n", branch_line(&result.branch, &result.outcome)));
    }

    output.push('\n');
    output.push_str(&summary_line(report));
    output.push('\n');

    let failures = report.failures();
    if !failures.is_empty() {
        output.push_str(&format!("\n{}:\n", "Failures".red().bold()));
        for failure in failures {
            if let BranchOutcome::Failed { reason } = &failure.outcome {
                output.push_str(&format!("  {} {}: {}\n", "✗".red(), failure.branch, reason));
            }
        }
    }

    output
}

fn branch_line(branch: &str, outcome: &BranchOutcome) -> String {
    match outcome {
        BranchOutcome::NewlyProtected => {
            format!("{} {} {}", "✓".green(), branch.bold(), "newly protected".green())
        }
        BranchOutcome::AlreadyProtected => {
            format!("{} {} {}", "✓".green(), branch, "already protected".dimmed())
        }
        BranchOutcome::SkippedNoMatch => {
            format!("{} {} {}", "-".dimmed(), branch.dimmed(), "skipped (no match)".dimmed())
        }
        BranchOutcome::Failed { reason } => {
            format!("{} {} {} {}", "✗".red(), branch.bold(), "failed:".red(), reason)
        }
    }
}

fn summary_line(report: &ReconciliationReport) -> String {
    format!(
        "{} {} newly protected, {} already protected, {} skipped, {} failed",
        "Summary:".bold(),
        report.newly_protected(),
        report.already_protected(),
        report.skipped(),
        report.failed()
    )
}

/// Renders the result of `create` and `from-template`.
pub fn format_creation(result: &CreationResult, pattern: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "✓ Success!".green().bold()));
    output.push_str(&format!("{}: {}\n", "Repository".bold(), result.repository.html_url()));
    output.push_str(&format!("{}: {}\n", "Clone URL".bold(), result.repository.clone_url()));
    output.push_str(&format!(
        "{}: {}\n",
        "Local path".bold(),
        result.local_path.display()
    ));
    output.push_str(&format!(
        "{}: {} ({} files)\n",
        "Pushed commit".bold(),
        result.publish.commit_sha,
        result.file_count
    ));

    output.push_str(&format!("\n{}\n", "Branch protection:".bold()));
    output.push_str(&format!(
        "  {}\n",
        branch_line(repo_creator_core::DEFAULT_BRANCH, &result.default_branch_protection)
    ));

    match &result.safe_branch {
        Some(SafeBranchOutcome::Created { name, sha }) => output.push_str(&format!(
            "  {} {} {} {}\n",
            "✓".green(),
            name.bold(),
            "created empty at".green(),
            sha
        )),
        Some(SafeBranchOutcome::Failed { name, reason }) => output.push_str(&format!(
            "  {} {} {} {}\n",
            "✗".red(),
            name.bold(),
            "could not be created:".red(),
            reason
        )),
        None => {}
    }

    if let Some(report) = &result.reconciliation {
        output.push('\n');
        output.push_str(&format_reconciliation_pretty(
            result.repository.full_name(),
            pattern,
            report,
        ));
    }

    if !result.warnings.is_empty() {
        output.push_str(&format!("\n{}:\n", "Warnings".yellow().bold()));
        for warning in &result.warnings {
            output.push_str(&format!("  {} {}\n", "⚠".yellow(), warning));
        }
    }

    output
}

/// Renders the result of `create-branch`.
pub fn format_branch_creation(full_name: &str, result: &BranchCreationResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", "✓ Branch created successfully!".green().bold()));
    output.push_str(&format!("{}: {}\n", "Repository".bold(), full_name));
    output.push_str(&format!(
        "{}: {} (from {} at {})\n",
        "Branch".bold(),
        result.branch,
        result.source,
        result.sha
    ));

    if let Some(entry) = result.report.results().first() {
        output.push_str(&format!(
            "{}: {}\n",
            "Protection".bold(),
            branch_line(&entry.branch, &entry.outcome)
        ));
    }

    output
}

/// Renders the result of `protect`.
pub fn format_protection(full_name: &str, branch: &str) -> String {
    format!(
        "{}\n{}: {}\n{}: {}\n",
        "✓ Branch protection applied successfully!".green().bold(),
        "Repository".bold(),
        full_name,
        "Branch".bold(),
        branch
    )
}

/// Renders the result of `test`.
pub fn format_connection(report: &ConnectionReport) -> String {
    let user = &report.user;
    let mut output = String::new();

    output.push_str(&format!("{} {}\n", "✓ Connected as:".green(), user.login.bold()));
    output.push_str(&format!(
        "{}: {}\n",
        "Email".bold(),
        user.email.as_deref().unwrap_or("Not public")
    ));
    output.push_str(&format!(
        "{}: {}\n",
        "Company".bold(),
        user.company.as_deref().unwrap_or("Not specified")
    ));
    output.push_str(&format!(
        "{}: {}\n",
        "Public repos".bold(),
        user.public_repos.unwrap_or_default()
    ));

    output.push_str(&format!("\n{}\n", "Recent repositories:".bold()));
    if report.recent_repositories.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for repo in &report.recent_repositories {
        let visibility = if repo.is_private() { "private" } else { "public" };
        output.push_str(&format!("  - {} ({})\n", repo.name(), visibility));
    }

    output
}

/// Renders an error together with its remediation hint.
pub fn format_error(error: &Error) -> String {
    let mut output = format!("{} {}", "✗ Error:".red().bold(), error);
    if let Some(hint) = error.remediation_hint() {
        output.push_str(&format!("\n{} {}", "Hint:".yellow(), hint));
    }
    output
}
