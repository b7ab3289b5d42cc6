//! CI actions entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Wire observability**: `tracing-subscriber` with a pretty or JSON layer
//!    and an optional OpenTelemetry OTLP exporter. Every span and event emitted
//!    by the workspace crates flows through it.
//! 2. **Read configuration**: snapshot `INPUT_*` and `GITHUB_*` variables once
//!    and build the configuration of the selected action.
//! 3. **Construct infrastructure**: `JiraClient`, `GitHubClient`, `SystemGit`
//!    and `ResourceEditor`, injected into the release orchestration.
//! 4. **Report**: log the action's summary; on failure emit a GitHub Actions
//!    `::error::` annotation and exit non-zero.

mod cli;
mod config;
mod telemetry;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use domain::{IssueKey, Lockfile, ReleaseRunId, RepositoriesManifest};
use github::GitHubClient;
use jira::JiraClient;
use rcedit::ResourceEditor;
use release::{
    FixVersionReport, JiraRelease, JiraReport, ReleaseOrchestrator, ReleaseReport,
    ReleaseSettings,
};
use toolkit::{table, unzip_all, SystemGit};
use tracing::{error, info, info_span, Instrument};

use crate::cli::{Cli, Command};
use crate::config::{
    Environment, JiraReleaseConfig, JiraSection, RceditConfig, ReleaseConfig, UnzipConfig,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let telemetry = match telemetry::init(cli.log_format) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let env = Environment::capture();
    let run_id = ReleaseRunId::new_random();
    let span = info_span!("action", command = cli.command.name(), %run_id);
    let result = run(cli.command, &env).instrument(span).await;

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            println!("::error::{e:#}");
            ExitCode::FAILURE
        }
    };
    telemetry.shutdown();
    code
}

async fn run(command: Command, env: &Environment) -> anyhow::Result<()> {
    match command {
        Command::Release => run_release(ReleaseConfig::from_env(env)?).await,
        Command::JiraRelease => run_jira_release(JiraReleaseConfig::from_env(env)?).await,
        Command::Rcedit => run_rcedit(RceditConfig::from_env(env)?).await,
        Command::Unzip => run_unzip(UnzipConfig::from_env(env)).await,
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

async fn run_release(config: ReleaseConfig) -> anyhow::Result<()> {
    let lockfile = read_lockfile(Path::new(&config.lockfile)).await?;
    let manifest = RepositoriesManifest::from_json(&read(&config.repositories).await?)
        .with_context(|| format!("failed to parse {}", config.repositories.display()))?;

    let host = GitHubClient::new(config.github.clone()).context("failed to create GitHub client")?;
    let jira = jira_release_for(&config.jira)?;
    let orchestrator = ReleaseOrchestrator::new(
        Arc::new(SystemGit::new(".")),
        Arc::new(host),
        jira,
        ReleaseSettings {
            dry_run: config.dry_run,
            owner: config.owner.clone(),
            current_repository: config.repository.fqn(),
            lockfile_path: config.lockfile.clone(),
        },
    );

    let report = orchestrator.run(&lockfile, &manifest).await?;
    log_release_report(&report);
    Ok(())
}

async fn run_jira_release(config: JiraReleaseConfig) -> anyhow::Result<()> {
    let lockfile = read_lockfile(&config.lockfile).await?;
    let issues: Vec<IssueKey> = serde_json::from_str(&read(&config.issues_file).await?)
        .with_context(|| format!("failed to parse {}", config.issues_file.display()))?;

    let report = jira_release_for(&config.jira)?
        .run(config.dry_run, lockfile.release_version_name(), &issues)
        .await;

    table("Version", lockfile.release_version_name());
    table("Issues", &join(&issues));
    log_jira_report(&report);
    Ok(())
}

async fn run_rcedit(config: RceditConfig) -> anyhow::Result<()> {
    table("Path", &config.path);
    table("Editor", &config.editor.display().to_string());

    let edited = ResourceEditor::new(&config.editor)
        .apply_all(&config.path, &config.properties)
        .await?;
    table("Edited", &edited.len().to_string());
    Ok(())
}

async fn run_unzip(config: UnzipConfig) -> anyhow::Result<()> {
    let extracted = unzip_all(&config.path)
        .await
        .with_context(|| format!("failed to unzip archives below {}", config.path.display()))?;
    table("Extracted", &extracted.len().to_string());
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn jira_release_for(jira: &JiraSection) -> anyhow::Result<JiraRelease> {
    let client = JiraClient::new(jira.connection.clone()).context("failed to create Jira client")?;
    Ok(JiraRelease::new(Arc::new(client), jira.settings()))
}

async fn read(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn read_lockfile(path: &Path) -> anyhow::Result<Lockfile> {
    let lockfile = Lockfile::from_json(&read(path).await?)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(version = %lockfile.version, repositories = lockfile.repositories.len(), "read lockfile");
    Ok(lockfile)
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_release_report(report: &ReleaseReport) {
    table("Version", report.version.as_str());
    table("Dry run", &report.dry_run.to_string());
    table("Issues", &join(&report.issues));
    table("Tagged", &join(&report.tagged));
    log_jira_report(&report.jira);
}

fn log_jira_report(report: &JiraReport) {
    if let Some(summary) = &report.transitions {
        let advanced: Vec<String> = summary
            .advanced
            .iter()
            .map(|(issue, status)| format!("{issue} -> {status}"))
            .collect();
        let failed: Vec<&str> = summary.failed.iter().map(|(issue, _)| issue.as_str()).collect();
        table("Transitioned", &join(&advanced));
        table("Released", &join(&summary.already_released));
        table("Not moved", &join(&failed));
    }

    match &report.fix_versions {
        FixVersionReport::Skipped => {}
        FixVersionReport::Unresolved { reason } => table("Fix version", &format!("unresolved: {reason}")),
        FixVersionReport::Applied {
            version,
            created,
            updated,
            failed,
        } => {
            let origin = if *created { "created" } else { "existing" };
            table("Fix version", &format!("{} ({origin}, id {})", version.name, version.id));
            table("Fix set on", &join(updated));
            let failed: Vec<&str> = failed.iter().map(|(issue, _)| issue.as_str()).collect();
            table("Fix failed", &join(&failed));
        }
    }
}
