use async_trait::async_trait;

use crate::domain::pull_request::PullRequest;
use crate::error::AppResult;

#[async_trait]
pub trait PullRequestService: Send + Sync {
    async fn get_pull(&self, number: u64) -> AppResult<PullRequest>;
    async fn update_pull(&self, number: u64, body: &str) -> AppResult<()>;
}
