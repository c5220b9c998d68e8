pub mod issue_tracker;
pub mod pull_request;
pub mod version_control;

pub use issue_tracker::IssueTrackerService;
pub use pull_request::PullRequestService;
pub use version_control::{VersionControlService, resolve_range};
