use std::sync::LazyLock;

use regex::Regex;

use crate::domain::issue::IssueReference;
use crate::error::{AppError, AppResult};

static GENERIC_ISSUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9]*-[0-9]+").expect("generic issue pattern"));

static CONVENTIONAL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\(([^()]*)\)!?:").expect("conventional header pattern"));

/// How issue identifiers are recognised in a line of commit text.
///
/// Both variants match against the upper-cased line, so `abc-1` and `ABC-1`
/// yield the same identifier.
#[derive(Debug, Clone)]
pub enum IssuePattern {
    /// Any `PREFIX-123` token whose prefix starts with a letter at a word
    /// boundary; `9X-3` is not an identifier.
    Generic,
    /// Only `<KEY>-123` tokens for a single tracker project.
    ProjectKey { key: String, regex: Regex },
}

impl IssuePattern {
    pub fn for_project_key(project_key: Option<&str>) -> AppResult<Self> {
        let Some(key) = project_key.map(str::trim).filter(|key| !key.is_empty()) else {
            return Ok(Self::Generic);
        };

        let valid = key.starts_with(|c: char| c.is_ascii_alphabetic())
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(AppError::Configuration(format!(
                "project key '{key}' must start with a letter and contain only letters, digits or '_'"
            )));
        }

        let key = key.to_uppercase();
        let regex = Regex::new(&format!("{}-[0-9]+", regex::escape(&key)))
            .map_err(|err| AppError::Configuration(format!("invalid project key '{key}': {err}")))?;
        Ok(Self::ProjectKey { key, regex })
    }

    pub fn project_key(&self) -> Option<&str> {
        match self {
            IssuePattern::Generic => None,
            IssuePattern::ProjectKey { key, .. } => Some(key),
        }
    }

    fn regex(&self) -> &Regex {
        match self {
            IssuePattern::Generic => &*GENERIC_ISSUE,
            IssuePattern::ProjectKey { regex, .. } => regex,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssueExtractor {
    pattern: IssuePattern,
    capture_scope: bool,
}

impl IssueExtractor {
    pub fn new(pattern: IssuePattern, capture_scope: bool) -> Self {
        Self {
            pattern,
            capture_scope,
        }
    }

    pub fn captures_scope(&self) -> bool {
        self.capture_scope
    }

    /// References in line order, then left to right within each line.
    pub fn extract(&self, text: &str) -> Vec<IssueReference> {
        text.lines()
            .flat_map(|line| self.extract_line(line))
            .collect()
    }

    fn extract_line(&self, line: &str) -> Vec<IssueReference> {
        let scope = if self.capture_scope {
            conventional_scope(line)
        } else {
            None
        };

        let upper = line.to_uppercase();
        self.pattern
            .regex()
            .find_iter(&upper)
            .map(|found| IssueReference {
                issue_number: found.as_str().to_string(),
                scope: scope.clone(),
            })
            .collect()
    }
}

/// Scope of a conventional commit header such as `fix(auth): ...`.
pub fn conventional_scope(line: &str) -> Option<String> {
    CONVENTIONAL_HEADER
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|scope| scope.as_str().trim().to_string())
        .filter(|scope| !scope.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(capture_scope: bool) -> IssueExtractor {
        IssueExtractor::new(IssuePattern::Generic, capture_scope)
    }

    fn numbers(references: &[IssueReference]) -> Vec<&str> {
        references
            .iter()
            .map(|reference| reference.issue_number.as_str())
            .collect()
    }

    #[test]
    fn finds_every_identifier_in_order() {
        let references = generic(false).extract("Fixes ABC-1, ABC-2\nsee also xyz-30");
        assert_eq!(numbers(&references), vec!["ABC-1", "ABC-2", "XYZ-30"]);
        assert!(references.iter().all(|reference| reference.scope.is_none()));
    }

    #[test]
    fn generic_prefix_must_start_with_letter() {
        let references = generic(false).extract("released 2024-10 with A1B-7 and 9X-3");
        assert_eq!(numbers(&references), vec!["A1B-7"]);
    }

    #[test]
    fn generic_prefix_does_not_match_inside_a_token() {
        let references = generic(false).extract("12x-9 build_ABC-4 (DEF-5)");
        assert_eq!(numbers(&references), vec!["DEF-5"]);
    }

    #[test]
    fn ignores_words_without_digits() {
        let references = generic(false).extract("ABC-12 follow-up; also ABC-7");
        assert_eq!(numbers(&references), vec!["ABC-12", "ABC-7"]);
    }

    #[test]
    fn project_key_restricts_matches() {
        let pattern = IssuePattern::for_project_key(Some("abc")).unwrap();
        let extractor = IssueExtractor::new(pattern, false);
        let references = extractor.extract("abc-5 and DEF-6 and Abc-7");
        assert_eq!(numbers(&references), vec!["ABC-5", "ABC-7"]);
    }

    #[test]
    fn blank_project_key_falls_back_to_generic() {
        let pattern = IssuePattern::for_project_key(Some("  ")).unwrap();
        assert!(matches!(pattern, IssuePattern::Generic));
        assert_eq!(pattern.project_key(), None);
    }

    #[test]
    fn rejects_project_key_with_punctuation() {
        let error = IssuePattern::for_project_key(Some("AB-C")).unwrap_err();
        assert!(matches!(error, AppError::Configuration(_)));
    }

    #[test]
    fn captures_scope_per_line() {
        let references = generic(true).extract("fix(auth): ABC-12 login bug\nABC-13 in body");
        assert_eq!(
            references,
            vec![
                IssueReference {
                    issue_number: "ABC-12".to_string(),
                    scope: Some("auth".to_string()),
                },
                IssueReference {
                    issue_number: "ABC-13".to_string(),
                    scope: None,
                },
            ]
        );
    }

    #[test]
    fn scope_keeps_original_case() {
        let references = generic(true).extract("feat(UserProfile)!: ABC-1");
        assert_eq!(references[0].scope.as_deref(), Some("UserProfile"));
    }

    #[test]
    fn scope_is_ignored_when_disabled() {
        let references = generic(false).extract("fix(auth): ABC-12");
        assert_eq!(references[0].scope, None);
    }

    #[test]
    fn header_without_scope_yields_none() {
        assert_eq!(conventional_scope("fix: ABC-1"), None);
        assert_eq!(conventional_scope("fix(): ABC-1"), None);
        assert_eq!(conventional_scope("see fix(auth): ABC-1"), None);
    }
}
