use async_trait::async_trait;
use tracing::debug;

use crate::domain::commit::Commit;
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Best common ancestor of two revisions.
    async fn merge_base(&self, first: &str, second: &str) -> AppResult<String>;

    /// Commits reachable from `from` but not from `until`, newest first,
    /// limited to those that touched `path`.
    async fn log(&self, from: &str, until: &str, path: &str) -> AppResult<Vec<Commit>>;
}

/// Commits on `from` since it diverged from `to` that changed `path`.
pub async fn resolve_range(
    version_control: &dyn VersionControlService,
    from: &str,
    to: &str,
    path: &str,
) -> AppResult<Vec<Commit>> {
    let ancestor = version_control.merge_base(from, to).await?;
    if ancestor == from {
        debug!(%ancestor, "head is already an ancestor of base; no commits in range");
        return Ok(Vec::new());
    }
    version_control.log(from, &ancestor, path).await
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;

    #[derive(Default)]
    struct ScriptedHistory {
        ancestor: String,
        commits: Vec<Commit>,
        log_calls: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl VersionControlService for ScriptedHistory {
        async fn merge_base(&self, first: &str, _second: &str) -> AppResult<String> {
            if first == "missing" {
                return Err(AppError::RevisionNotFound {
                    revision: first.to_string(),
                });
            }
            Ok(self.ancestor.clone())
        }

        async fn log(&self, from: &str, until: &str, path: &str) -> AppResult<Vec<Commit>> {
            self.log_calls.lock().unwrap().push((
                from.to_string(),
                until.to_string(),
                path.to_string(),
            ));
            Ok(self.commits.clone())
        }
    }

    #[tokio::test]
    async fn logs_from_head_back_to_ancestor() {
        let history = ScriptedHistory {
            ancestor: "base0".to_string(),
            commits: vec![Commit::new("c2", "second"), Commit::new("c1", "first")],
            ..Default::default()
        };

        let commits = resolve_range(&history, "head", "base", "src").await.unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "c2");
        assert_eq!(
            history.log_calls.lock().unwrap().as_slice(),
            &[("head".to_string(), "base0".to_string(), "src".to_string())]
        );
    }

    #[tokio::test]
    async fn same_ancestor_yields_empty_range() {
        let history = ScriptedHistory {
            ancestor: "head".to_string(),
            commits: vec![Commit::new("c1", "unexpected")],
            ..Default::default()
        };

        let commits = resolve_range(&history, "head", "base", ".").await.unwrap();

        assert!(commits.is_empty());
        assert!(history.log_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_revision_propagates() {
        let history = ScriptedHistory::default();
        let error = resolve_range(&history, "missing", "base", ".")
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::RevisionNotFound { .. }));
    }
}
