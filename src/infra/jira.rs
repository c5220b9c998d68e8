use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION},
};
use serde::Deserialize;

use crate::config::JiraConfig;
use crate::domain::issue::IssueSummary;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    username: String,
    token: String,
}

impl JiraClient {
    pub fn new(base_url: String, username: String, token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            username,
            token,
        }
    }

    pub fn from_config(config: &JiraConfig) -> Self {
        Self::new(
            config.base_url(),
            config.username.clone(),
            config.token.clone(),
        )
    }

    fn auth_header(username: &str, token: &str) -> String {
        let credentials = format!("{username}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str, key: &str) -> String {
        format!("{}/rest/api/2/issue/{}", base_url.trim_end_matches('/'), key)
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn find_issue(&self, issue_number: &str) -> AppResult<IssueSummary> {
        let key = issue_number.trim();
        if key.is_empty() {
            return Err(AppError::IssueTracker(
                "issue number must not be empty".to_string(),
            ));
        }

        let response = self
            .http
            .get(Self::issue_endpoint(&self.base_url, key))
            .query(&[("fields", "summary")])
            .header(AUTHORIZATION, Self::auth_header(&self.username, &self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::IssueTracker(format!("issue {key} does not exist")));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::IssueTracker(format!(
                "Jira responded with {status}: {body}"
            )));
        }

        let payload: JiraIssueResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        Ok(IssueSummary {
            title: payload.fields.summary,
            link: Self::browse_url(&self.base_url, &payload.key),
        })
    }
}

#[derive(Deserialize)]
struct JiraIssueResponse {
    key: String,
    fields: JiraIssueFields,
}

#[derive(Deserialize)]
struct JiraIssueFields {
    summary: String,
}
