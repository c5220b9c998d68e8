use tracing::warn;

use crate::context::AppContext;
use crate::domain::aggregate::aggregate;
use crate::domain::body::{MergeAction, merge_body, wrap_table};
use crate::domain::extract::IssueExtractor;
use crate::domain::issue::IssueInfo;
use crate::domain::table::issue_table;
use crate::error::AppResult;
use crate::infra::actions::ActionLog;
use crate::services::{IssueTrackerService, resolve_range};

const START_GROUP: &str = "Start";
const COMMITS_GROUP: &str = "List commits";
const LOOKUP_GROUP: &str = "Get issue title for each issue number";
const ATTACH_GROUP: &str = "Attach table";

#[derive(Debug)]
pub struct SyncOutcome {
    pub pull_number: u64,
    pub commits: usize,
    pub issues: Vec<IssueInfo>,
    pub failed: Vec<String>,
    pub action: MergeAction,
}

pub async fn sync_related_issues(ctx: &AppContext, log: &mut ActionLog) -> AppResult<SyncOutcome> {
    let settings = &ctx.settings;
    let extractor = IssueExtractor::new(settings.pattern.clone(), settings.capture_scope);

    let pull = ctx.pull_requests.get_pull(settings.pull_number).await?;
    pull.ensure_same_repository()?;

    log.log(
        START_GROUP,
        &format!(
            "compute log from {} to {} for {}",
            pull.head_sha, pull.base_sha, settings.path
        ),
    );

    let commits = resolve_range(
        ctx.version_control.as_ref(),
        &pull.head_sha,
        &pull.base_sha,
        &settings.path,
    )
    .await?;

    log.log(COMMITS_GROUP, &format!("commits length: {}", commits.len()));
    for commit in &commits {
        log.log(COMMITS_GROUP, &format!("{} {}", commit.hash, commit.message));
    }

    let found = aggregate(&commits, &extractor);
    if found.is_empty() {
        log.log(LOOKUP_GROUP, "no issue numbers found");
    } else {
        log.log(LOOKUP_GROUP, &format!("issue numbers: {}", found.len()));
    }
    let rows = found.into_rows(extractor.captures_scope());
    let (issues, failed) = lookup_issues(ctx.issue_tracker.as_ref(), rows, log).await;

    let table = issue_table(&issues, extractor.captures_scope());
    let merged = merge_body(&pull.body, &wrap_table(&table))?;

    log.log(ATTACH_GROUP, "\n-------------------Table-------------------\n");
    log.log(ATTACH_GROUP, &table);
    log.log(ATTACH_GROUP, "\n-------------------Table-------------------\n");
    log.log(ATTACH_GROUP, merged.action.describe());
    log.log(ATTACH_GROUP, "\n-------------------Old body-------------------\n");
    log.log(ATTACH_GROUP, &pull.body);
    log.log(ATTACH_GROUP, "\n-------------------New body-------------------\n");
    log.log(ATTACH_GROUP, &merged.body);
    log.end_group();

    ctx.pull_requests.update_pull(pull.number, &merged.body).await?;

    Ok(SyncOutcome {
        pull_number: pull.number,
        commits: commits.len(),
        issues,
        failed,
        action: merged.action,
    })
}

/// Looks issues up one at a time, in order. Issues the tracker cannot
/// resolve are left out and returned separately.
async fn lookup_issues(
    tracker: &dyn IssueTrackerService,
    rows: Vec<(String, Vec<String>)>,
    log: &mut ActionLog,
) -> (Vec<IssueInfo>, Vec<String>) {
    let total = rows.len();
    let mut issues = Vec::with_capacity(total);
    let mut failed = Vec::new();

    for (index, (issue_number, scopes)) in rows.into_iter().enumerate() {
        let position = index + 1;
        match tracker.find_issue(&issue_number).await {
            Ok(summary) => {
                log.log(
                    LOOKUP_GROUP,
                    &format!(
                        "[{position}/{total}] Success: [{issue_number}] | {}",
                        summary.title
                    ),
                );
                issues.push(IssueInfo {
                    issue_number,
                    summary,
                    scopes,
                });
            }
            Err(error) => {
                log.log(
                    LOOKUP_GROUP,
                    &format!("[{position}/{total}] Fail: [{issue_number}] {error}"),
                );
                warn!(%issue_number, %error, "dropping issue from table");
                failed.push(issue_number);
            }
        }
    }

    (issues, failed)
}
