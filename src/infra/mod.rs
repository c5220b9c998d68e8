pub mod actions;
pub mod git;
pub mod github;
pub mod jira;
