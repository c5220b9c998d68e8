#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueReference {
    pub issue_number: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub title: String,
    pub link: String,
}

/// One resolved row of the related issues table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueInfo {
    pub issue_number: String,
    pub summary: IssueSummary,
    pub scopes: Vec<String>,
}

impl IssueInfo {
    pub fn issue_cell(&self) -> String {
        format!("[{}]({})", self.issue_number, self.summary.link)
    }

    pub fn scope_cell(&self) -> String {
        self.scopes.join(", ")
    }
}
