pub mod related_issues;
