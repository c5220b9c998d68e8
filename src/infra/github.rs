use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::{Deserialize, Serialize};

use crate::config::GitHubConfig;
use crate::domain::pull_request::PullRequest;
use crate::error::{AppError, AppResult};
use crate::services::PullRequestService;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        }
    }

    fn pull_endpoint(&self, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            number
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("related-issues/", env!("CARGO_PKG_VERSION")))
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn ensure_success(response: Response, action: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(AppError::PullRequest(format!(
            "failed to {action}: GitHub responded with {status}: {body}"
        )))
    }
}

#[async_trait]
impl PullRequestService for GitHubClient {
    async fn get_pull(&self, number: u64) -> AppResult<PullRequest> {
        let response = self
            .authorized(self.http.get(self.pull_endpoint(number)))
            .send()
            .await
            .map_err(|err| AppError::PullRequest(format!("failed to call GitHub: {err}")))?;
        let response = Self::ensure_success(response, &format!("read pull request #{number}")).await?;

        let payload: ApiPullRequest = response.json().await.map_err(|err| {
            AppError::PullRequest(format!("failed to parse pull request #{number}: {err}"))
        })?;
        Ok(payload.into_pull_request())
    }

    async fn update_pull(&self, number: u64, body: &str) -> AppResult<()> {
        let response = self
            .authorized(self.http.patch(self.pull_endpoint(number)))
            .json(&UpdatePullRequest { body })
            .send()
            .await
            .map_err(|err| AppError::PullRequest(format!("failed to call GitHub: {err}")))?;
        Self::ensure_success(response, &format!("update pull request #{number}")).await?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ApiPullRequest {
    number: u64,
    body: Option<String>,
    head: ApiBranch,
    base: ApiBranch,
}

#[derive(Deserialize)]
struct ApiBranch {
    sha: String,
    // Null when the fork behind the branch has been deleted.
    repo: Option<ApiRepository>,
}

#[derive(Deserialize)]
struct ApiRepository {
    full_name: String,
}

impl ApiPullRequest {
    fn into_pull_request(self) -> PullRequest {
        PullRequest {
            number: self.number,
            head_sha: self.head.sha,
            base_sha: self.base.sha,
            head_repo: self.head.repo.map(|repo| repo.full_name).unwrap_or_default(),
            base_repo: self.base.repo.map(|repo| repo.full_name).unwrap_or_default(),
            body: self.body.unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct UpdatePullRequest<'a> {
    body: &'a str,
}
