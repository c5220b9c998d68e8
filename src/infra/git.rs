use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::commit::Commit;
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

const FIELD_SEPARATOR: char = '\u{1f}';
const RECORD_SEPARATOR: char = '\u{1e}';
const LOG_FORMAT: &str = "--format=%H%x1f%s%x1f%b%x1e";

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn git(&self, args: &[&str]) -> AppResult<Output> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await?;
        Ok(output)
    }

    async fn is_commit(&self, revision: &str) -> AppResult<bool> {
        let spec = format!("{revision}^{{commit}}");
        let output = self
            .git(&["rev-parse", "--verify", "--quiet", spec.as_str()])
            .await?;
        Ok(output.status.success())
    }

    async fn unresolved(&self, revisions: &[&str]) -> AppResult<Option<String>> {
        for revision in revisions {
            if !self.is_commit(revision).await? {
                return Ok(Some(revision.to_string()));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn merge_base(&self, first: &str, second: &str) -> AppResult<String> {
        let output = self.git(&["merge-base", first, second]).await?;
        if !output.status.success() {
            if let Some(revision) = self.unresolved(&[first, second]).await? {
                return Err(AppError::RevisionNotFound { revision });
            }
            return Err(AppError::VersionControl(format!(
                "git merge-base {first} {second} failed: {}",
                stderr(&output)
            )));
        }

        let ancestor = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if ancestor.is_empty() {
            return Err(AppError::VersionControl(format!(
                "{first} and {second} have no common ancestor"
            )));
        }
        Ok(ancestor)
    }

    async fn log(&self, from: &str, until: &str, path: &str) -> AppResult<Vec<Commit>> {
        let range = format!("{until}..{from}");
        let output = self
            .git(&["log", LOG_FORMAT, range.as_str(), "--", path])
            .await?;
        if !output.status.success() {
            if let Some(revision) = self.unresolved(&[from, until]).await? {
                return Err(AppError::RevisionNotFound { revision });
            }
            return Err(AppError::VersionControl(format!(
                "git log {range} -- {path} failed: {}",
                stderr(&output)
            )));
        }

        Ok(parse_log(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn parse_log(raw: &str) -> Vec<Commit> {
    raw.split(RECORD_SEPARATOR)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(3, FIELD_SEPARATOR);
            let hash = fields.next()?.trim();
            let message = fields.next()?;
            let body = fields.next().unwrap_or_default();
            Some(Commit::new(hash, message).with_body(body.trim_end()))
        })
        .collect()
}
