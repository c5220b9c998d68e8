use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::domain::extract::IssuePattern;
use crate::error::{AppError, AppResult};

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_PATH: &str = ".";

/// Action inputs. The runner exposes each input as `INPUT_<NAME>`, keeping
/// hyphens, so every field can also be passed as a flag when run locally.
#[derive(Args, Debug, Clone, Default)]
pub struct ActionInputs {
    /// Issue tracker to resolve titles with (`jira`).
    #[arg(long, env = "INPUT_TRACKER")]
    pub tracker: Option<String>,
    /// `http` or `https`.
    #[arg(long = "jira-protocol", env = "INPUT_JIRA-PROTOCOL")]
    pub jira_protocol: Option<String>,
    #[arg(long = "jira-host", env = "INPUT_JIRA-HOST")]
    pub jira_host: Option<String>,
    #[arg(long = "jira-username", env = "INPUT_JIRA-USERNAME")]
    pub jira_username: Option<String>,
    #[arg(long = "jira-token", env = "INPUT_JIRA-TOKEN", hide_env_values = true)]
    pub jira_token: Option<String>,
    /// Only commits touching this path are scanned.
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,
    /// Restrict matches to one tracker project, e.g. `ABC`.
    #[arg(long = "project-key", env = "INPUT_PROJECT-KEY")]
    pub project_key: Option<String>,
    /// Record the conventional commit scope of each match.
    #[arg(long = "capture-scope", env = "INPUT_CAPTURE-SCOPE")]
    pub capture_scope: Option<String>,
    /// `owner/repo` of the pull request.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,
    #[arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,
    #[arg(long = "github-api-url", env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,
    /// Event payload the pull request number is read from.
    #[arg(long = "event-path", env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,
    /// Pull request number; overrides the event payload.
    #[arg(long = "pr-number")]
    pub pr_number: Option<u64>,
    /// Git working tree to read history from.
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub github: GitHubConfig,
    pub sync: SyncSettings,
    pub workspace_root: PathBuf,
}

#[derive(Debug, Clone)]
pub enum TrackerConfig {
    Jira(JiraConfig),
}

impl TrackerConfig {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerConfig::Jira(_) => "jira",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JiraProtocol {
    Http,
    Https,
}

impl JiraProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            JiraProtocol::Http => "http",
            JiraProtocol::Https => "https",
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "http" => Ok(JiraProtocol::Http),
            "https" => Ok(JiraProtocol::Https),
            other => Err(AppError::Configuration(format!(
                "unexpected jira-protocol '{other}', it should be http or https"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub protocol: JiraProtocol,
    pub host: String,
    pub username: String,
    pub token: String,
}

impl JiraConfig {
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}",
            self.protocol.as_str(),
            self.host.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: String,
    pub owner: String,
    pub repo: String,
}

/// Settings that shape a single sync run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub pull_number: u64,
    pub path: String,
    pub pattern: IssuePattern,
    pub capture_scope: bool,
}

impl AppConfig {
    pub fn load(inputs: &ActionInputs, cwd: &Path) -> AppResult<Self> {
        let tracker = load_tracker(inputs)?;

        let path = non_empty(&inputs.path).unwrap_or(DEFAULT_PATH).to_string();
        let pattern = IssuePattern::for_project_key(non_empty(&inputs.project_key))?;
        let capture_scope = match non_empty(&inputs.capture_scope) {
            Some(value) => parse_flag("capture-scope", value)?,
            None => false,
        };

        let pull_number = match inputs.pr_number {
            Some(number) => number,
            None => pull_number_from_event(inputs.event_path.as_deref())?,
        };

        let github = load_github(inputs)?;
        let workspace_root = inputs
            .workspace
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| cwd.to_path_buf());

        Ok(Self {
            tracker,
            github,
            sync: SyncSettings {
                pull_number,
                path,
                pattern,
                capture_scope,
            },
            workspace_root,
        })
    }
}

fn load_tracker(inputs: &ActionInputs) -> AppResult<TrackerConfig> {
    let tracker = required(&inputs.tracker, "tracker")?;
    match tracker.to_lowercase().as_str() {
        "jira" => {
            let protocol = match non_empty(&inputs.jira_protocol) {
                Some(value) => JiraProtocol::parse(value)?,
                None => JiraProtocol::Https,
            };
            let host = required(&inputs.jira_host, "jira-host")?;
            if host.contains("://") {
                return Err(AppError::Configuration(format!(
                    "jira-host '{host}' must not include a scheme; use jira-protocol instead"
                )));
            }
            Ok(TrackerConfig::Jira(JiraConfig {
                protocol,
                host: host.to_string(),
                username: required(&inputs.jira_username, "jira-username")?.to_string(),
                token: required(&inputs.jira_token, "jira-token")?.to_string(),
            }))
        }
        other => Err(AppError::Configuration(format!(
            "unsupported tracker '{other}'"
        ))),
    }
}

fn load_github(inputs: &ActionInputs) -> AppResult<GitHubConfig> {
    let repository = required(&inputs.repository, "GITHUB_REPOSITORY")?;
    let (owner, repo) = repository
        .split_once('/')
        .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
        .ok_or_else(|| {
            AppError::Configuration(format!(
                "GITHUB_REPOSITORY '{repository}' is not in owner/repo form"
            ))
        })?;

    Ok(GitHubConfig {
        api_url: non_empty(&inputs.github_api_url)
            .unwrap_or(DEFAULT_GITHUB_API_URL)
            .trim_end_matches('/')
            .to_string(),
        token: required(&inputs.github_token, "GITHUB_TOKEN")?.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

fn pull_number_from_event(event_path: Option<&Path>) -> AppResult<u64> {
    let event_path = event_path.ok_or_else(|| {
        AppError::Configuration("no pull request number and no GITHUB_EVENT_PATH".to_string())
    })?;
    let contents = fs::read_to_string(event_path)?;
    let event: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|err| AppError::Configuration(format!("invalid event payload: {err}")))?;

    event
        .pointer("/pull_request/number")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| {
            AppError::Configuration("unexpected event: payload has no pull request".to_string())
        })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    non_empty(value)
        .ok_or_else(|| AppError::Configuration(format!("input required and not supplied: {name}")))
}

fn parse_flag(name: &str, value: &str) -> AppResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "{name} should be true or false, got '{other}'"
        ))),
    }
}
