use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("revision not found: {revision}")]
    RevisionNotFound { revision: String },
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("pull request error: {0}")]
    PullRequest(String),
    #[error("can't get diff: head repository {head} differs from base repository {base}")]
    CrossRepository { head: String, base: String },
    #[error("malformed pull request body: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
