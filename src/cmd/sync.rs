use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::actions::ActionLog;
use crate::workflow::related_issues::{SyncOutcome, sync_related_issues};

pub async fn run(ctx: &AppContext) -> AppResult<SyncOutcome> {
    let mut log = ActionLog::stdout();
    sync_related_issues(ctx, &mut log).await
}
