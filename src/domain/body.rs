use std::ops::Range;

use crate::error::{AppError, AppResult};

pub const START_MARKER: &str = "<!--RELATED-ISSUE-START-->";
pub const END_MARKER: &str = "<!--RELATED-ISSUE-END-->";
pub const TABLE_HEADING: &str = "## Related Issues (Auto updated)";

// Written by releases that only supported Jira.
const LEGACY_START_MARKER: &str = "<!--JIRA-ISSUE-START-->";
const LEGACY_END_MARKER: &str = "<!--JIRA-ISSUE-END-->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Append,
    Replace,
    ReplaceLegacy,
}

impl MergeAction {
    pub fn describe(&self) -> &'static str {
        match self {
            MergeAction::Append => "Append related issues table",
            MergeAction::Replace => "Related issues table already exists, just replace",
            MergeAction::ReplaceLegacy => "Legacy Jira issue table found, replace it",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedBody {
    pub action: MergeAction,
    pub body: String,
}

/// Wraps a rendered table in the sentinel comments that mark the managed region.
pub fn wrap_table(table: &str) -> String {
    [START_MARKER, TABLE_HEADING, table, END_MARKER].join("\n")
}

/// Replaces the managed region of `body` with `block`, or appends `block` when
/// the body has none. Text outside the region is kept as is.
pub fn merge_body(body: &str, block: &str) -> AppResult<MergedBody> {
    if let Some(region) = find_region(body, START_MARKER, END_MARKER)? {
        return Ok(MergedBody {
            action: MergeAction::Replace,
            body: splice(body, region, block),
        });
    }

    if let Some(region) = find_region(body, LEGACY_START_MARKER, LEGACY_END_MARKER)? {
        return Ok(MergedBody {
            action: MergeAction::ReplaceLegacy,
            body: splice(body, region, block),
        });
    }

    Ok(MergedBody {
        action: MergeAction::Append,
        body: format!("{body}\n{block}"),
    })
}

fn find_region(body: &str, start: &str, end: &str) -> AppResult<Option<Range<usize>>> {
    let starts = body.matches(start).count();
    let ends = body.matches(end).count();

    match (starts, ends) {
        (0, 0) => Ok(None),
        (1, 1) => {
            let Some(begin) = body.find(start) else {
                return Ok(None);
            };
            let content_start = begin + start.len();
            match body[content_start..].find(end) {
                Some(offset) => Ok(Some(begin..content_start + offset + end.len())),
                None => Err(AppError::MalformedBody(format!(
                    "{end} appears before {start}"
                ))),
            }
        }
        (0, _) => Err(AppError::MalformedBody(format!(
            "{end} found without {start}"
        ))),
        (_, 0) => Err(AppError::MalformedBody(format!(
            "{start} found without {end}"
        ))),
        (starts, ends) => Err(AppError::MalformedBody(format!(
            "expected one managed region, found {starts} start and {ends} end markers"
        ))),
    }
}

fn splice(body: &str, region: Range<usize>, block: &str) -> String {
    let mut merged = String::with_capacity(body.len() - region.len() + block.len());
    merged.push_str(&body[..region.start]);
    merged.push_str(block);
    merged.push_str(&body[region.end..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "|#issue|title|\n|---|---|\n|[ABC-1](link)|Title|";

    #[test]
    fn appends_when_no_region() {
        let block = wrap_table(TABLE);
        let merged = merge_body("desc", &block).unwrap();
        assert_eq!(merged.action, MergeAction::Append);
        assert_eq!(merged.body, format!("desc\n{block}"));
    }

    #[test]
    fn appends_to_empty_body() {
        let block = wrap_table(TABLE);
        let merged = merge_body("", &block).unwrap();
        assert_eq!(merged.body, format!("\n{block}"));
    }

    #[test]
    fn replaces_only_the_marked_region() {
        let body = "desc\n<!--RELATED-ISSUE-START-->\n## Related Issues (Auto updated)\n|old|\n<!--RELATED-ISSUE-END-->\nfooter";
        let block = wrap_table(TABLE);

        let merged = merge_body(body, &block).unwrap();

        assert_eq!(merged.action, MergeAction::Replace);
        assert_eq!(merged.body, format!("desc\n{block}\nfooter"));
        assert!(merged.body.starts_with("desc\n"));
    }

    #[test]
    fn merging_twice_is_stable() {
        let block = wrap_table(TABLE);
        let once = merge_body("desc", &block).unwrap().body;
        let twice = merge_body(&once, &block).unwrap().body;
        assert_eq!(once, twice);
    }

    #[test]
    fn migrates_legacy_region() {
        let body = "intro\n<!--JIRA-ISSUE-START-->\n## Jira Issue\n|old|\n<!--JIRA-ISSUE-END-->";
        let block = wrap_table(TABLE);

        let merged = merge_body(body, &block).unwrap();

        assert_eq!(merged.action, MergeAction::ReplaceLegacy);
        assert_eq!(merged.body, format!("intro\n{block}"));
    }

    #[test]
    fn rejects_start_without_end() {
        let body = "desc\n<!--RELATED-ISSUE-START-->\nleftover";
        let error = merge_body(body, &wrap_table(TABLE)).unwrap_err();
        assert!(matches!(error, AppError::MalformedBody(_)));
    }

    #[test]
    fn rejects_end_before_start() {
        let body = "<!--RELATED-ISSUE-END-->\n<!--RELATED-ISSUE-START-->";
        let error = merge_body(body, &wrap_table(TABLE)).unwrap_err();
        assert!(matches!(error, AppError::MalformedBody(_)));
    }

    #[test]
    fn rejects_multiple_regions() {
        let block = wrap_table(TABLE);
        let body = format!("{block}\nbetween\n{block}");
        let error = merge_body(&body, &block).unwrap_err();
        assert!(matches!(error, AppError::MalformedBody(_)));
    }
}
