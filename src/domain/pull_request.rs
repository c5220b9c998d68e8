use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub head_sha: String,
    pub base_sha: String,
    pub head_repo: String,
    pub base_repo: String,
    pub body: String,
}

impl PullRequest {
    /// Commit ranges can only be computed when head and base live in the same repository.
    pub fn ensure_same_repository(&self) -> AppResult<()> {
        if self.head_repo != self.base_repo {
            return Err(AppError::CrossRepository {
                head: self.head_repo.clone(),
                base: self.base_repo.clone(),
            });
        }
        Ok(())
    }
}
