mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cmd::{config as config_cmd, sync};
use crate::config::{ActionInputs, AppConfig, TrackerConfig};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::infra::actions;
use crate::infra::git::GitCli;
use crate::infra::github::GitHubClient;
use crate::infra::jira::JiraClient;
use crate::services::IssueTrackerService;

#[derive(Parser, Debug)]
#[command(
    name = "related-issues",
    author,
    version,
    about = "List the tracker issues referenced by a pull request's commits in its description"
)]
struct Cli {
    #[command(flatten)]
    inputs: ActionInputs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Refresh the related issues table of the pull request (default).
    Sync,
    /// Show the resolved configuration (secrets masked).
    Config,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let success = match run().await {
        Ok(()) => true,
        Err(err) => {
            error!(error = %err, "run failed");
            actions::report_error(&err.to_string());
            false
        }
    };

    if let Err(err) = actions::set_output("success", &success.to_string()) {
        eprintln!("Error: failed to set output: {err}");
    }
    if !success {
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();
}

async fn run() -> AppResult<()> {
    let cli = parse_cli(std::env::args_os())?;
    let cwd = std::env::current_dir()?;
    let config = AppConfig::load(&cli.inputs, &cwd)?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Config => {
            config_cmd::run_show(&config);
            Ok(())
        }
        Commands::Sync => run_sync(config).await,
    }
}

/// Parses the command line. Help and version requests exit as usual; invalid
/// arguments fail the run so the `success` output is still written.
fn parse_cli<I, T>(args: I) -> AppResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => Err(AppError::Configuration(err.to_string().trim().to_string())),
    }
}

async fn run_sync(config: AppConfig) -> AppResult<()> {
    let issue_tracker: Arc<dyn IssueTrackerService> = match &config.tracker {
        TrackerConfig::Jira(jira) => Arc::new(JiraClient::from_config(jira)),
    };
    let version_control = Arc::new(GitCli::new(config.workspace_root.clone()));
    let pull_requests = Arc::new(GitHubClient::new(&config.github));

    let context = AppContext::new(config.sync, version_control, pull_requests, issue_tracker);

    let outcome = sync::run(&context).await?;

    info!(
        pull = outcome.pull_number,
        commits = outcome.commits,
        issues = outcome.issues.len(),
        failed = outcome.failed.len(),
        "{}",
        outcome.action.describe()
    );
    if !outcome.failed.is_empty() {
        info!("Issues without a tracker entry: {}", outcome.failed.join(", "));
    }

    Ok(())
}
