use crate::config::{AppConfig, TrackerConfig};

/// Prints the resolved configuration with secrets masked.
pub fn run_show(config: &AppConfig) {
    println!("Tracker: {}", config.tracker.name());
    match &config.tracker {
        TrackerConfig::Jira(jira) => {
            println!("Jira URL: {}", jira.base_url());
            println!("Jira username: {}", display_value(&jira.username));
            println!("Jira token: {}", mask_secret(&jira.token));
        }
    }
    println!(
        "Repository: {}/{}",
        config.github.owner, config.github.repo
    );
    println!("GitHub API: {}", config.github.api_url);
    println!("GitHub token: {}", mask_secret(&config.github.token));
    println!("Pull request: #{}", config.sync.pull_number);
    println!("Path filter: {}", config.sync.path);
    println!(
        "Project key: {}",
        display_value(config.sync.pattern.project_key().unwrap_or_default())
    );
    println!("Capture scope: {}", config.sync.capture_scope);
    println!("Workspace: {}", config.workspace_root.display());
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "<not set>".to_string()
    } else {
        value.to_string()
    }
}

fn mask_secret(value: &str) -> String {
    match value.chars().count() {
        0 => "<not set>".to_string(),
        1..=6 => "***".to_string(),
        count => {
            let prefix: String = value.chars().take(3).collect();
            let suffix: String = value.chars().skip(count - 3).collect();
            format!("{prefix}***{suffix}")
        }
    }
}
