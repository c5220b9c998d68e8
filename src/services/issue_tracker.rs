use async_trait::async_trait;

use crate::domain::issue::IssueSummary;
use crate::error::AppResult;

/// A tracker vendor that can resolve an issue number to its title and link.
#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    async fn find_issue(&self, issue_number: &str) -> AppResult<IssueSummary>;
}
