use crate::domain::issue::IssueInfo;

const ISSUE_HEADERS: [&str; 2] = ["#issue", "title"];
const SCOPED_ISSUE_HEADERS: [&str; 3] = ["#issue", "title", "scope"];

/// Renders a pipe-delimited markdown table.
///
/// Cells are written verbatim: a `|` inside a cell splits it into two columns.
pub fn render_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let header_line = wrap_row(headers.iter().copied());
    let separator = wrap_row(headers.iter().map(|_| "---"));

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(separator);
    lines.extend(rows.iter().map(|row| wrap_row(row.iter().map(|cell| cell.as_ref()))));
    lines.join("\n")
}

pub fn issue_table(issues: &[IssueInfo], with_scopes: bool) -> String {
    if with_scopes {
        let rows: Vec<Vec<String>> = issues
            .iter()
            .map(|issue| {
                vec![
                    issue.issue_cell(),
                    issue.summary.title.clone(),
                    issue.scope_cell(),
                ]
            })
            .collect();
        render_table(&SCOPED_ISSUE_HEADERS, &rows)
    } else {
        let rows: Vec<Vec<String>> = issues
            .iter()
            .map(|issue| vec![issue.issue_cell(), issue.summary.title.clone()])
            .collect();
        render_table(&ISSUE_HEADERS, &rows)
    }
}

fn wrap_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    format!("|{}|", cells.collect::<Vec<_>>().join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::IssueSummary;

    fn info(issue_number: &str, title: &str, scopes: &[&str]) -> IssueInfo {
        IssueInfo {
            issue_number: issue_number.to_string(),
            summary: IssueSummary {
                title: title.to_string(),
                link: format!("https://jira.example.com/browse/{issue_number}"),
            },
            scopes: scopes.iter().map(|scope| scope.to_string()).collect(),
        }
    }

    #[test]
    fn renders_header_separator_and_rows() {
        let table = render_table(&["a", "b", "c"], &[vec!["1", "2", "3"]]);
        assert_eq!(table, "|a|b|c|\n|---|---|---|\n|1|2|3|");
    }

    #[test]
    fn renders_empty_table() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(render_table(&["#issue", "title"], &rows), "|#issue|title|\n|---|---|");
    }

    #[test]
    fn does_not_escape_pipes() {
        let table = render_table(&["title"], &[vec!["a|b"]]);
        assert_eq!(table.lines().last(), Some("|a|b|"));
    }

    #[test]
    fn issue_rows_link_the_issue_number() {
        let table = issue_table(&[info("ABC-1", "Login fails", &[])], false);
        assert_eq!(
            table,
            "|#issue|title|\n|---|---|\n|[ABC-1](https://jira.example.com/browse/ABC-1)|Login fails|"
        );
    }

    #[test]
    fn scoped_rows_list_scopes() {
        let table = issue_table(
            &[
                info("ABC-12", "Login", &["auth", "ui"]),
                info("ABC-7", "Other", &[]),
            ],
            true,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "|#issue|title|scope|");
        assert_eq!(lines[1], "|---|---|---|");
        assert!(lines[2].ends_with("|Login|auth, ui|"));
        assert!(lines[3].ends_with("|Other||"));
    }
}
