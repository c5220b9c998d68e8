use std::sync::Arc;

use crate::config::SyncSettings;
use crate::services::{IssueTrackerService, PullRequestService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub settings: SyncSettings,
    pub version_control: Arc<dyn VersionControlService>,
    pub pull_requests: Arc<dyn PullRequestService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(
        settings: SyncSettings,
        version_control: Arc<dyn VersionControlService>,
        pull_requests: Arc<dyn PullRequestService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
    ) -> Self {
        Self {
            settings,
            version_control,
            pull_requests,
            issue_tracker,
        }
    }
}
