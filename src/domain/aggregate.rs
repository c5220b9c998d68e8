use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::domain::commit::Commit;
use crate::domain::extract::IssueExtractor;
use crate::domain::issue::IssueReference;

/// Unique issue numbers seen across a set of commits, each with the scopes it
/// was mentioned under. Iterates in first-sighting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueAggregate {
    issues: IndexMap<String, BTreeSet<String>>,
}

impl IssueAggregate {
    pub fn record(&mut self, reference: IssueReference) {
        let scopes = self.issues.entry(reference.issue_number).or_default();
        if let Some(scope) = reference.scope.filter(|scope| !scope.is_empty()) {
            scopes.insert(scope);
        }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn sorted_issue_numbers(&self) -> Vec<String> {
        let mut numbers: Vec<String> = self.issues.keys().cloned().collect();
        numbers.sort();
        numbers
    }

    /// Issues in the order they should be looked up and rendered.
    ///
    /// With scope tracking rows follow discovery order; without it the issue
    /// numbers are sorted and carry no scopes.
    pub fn into_rows(self, with_scopes: bool) -> Vec<(String, Vec<String>)> {
        if with_scopes {
            self.issues
                .into_iter()
                .map(|(issue_number, scopes)| (issue_number, scopes.into_iter().collect()))
                .collect()
        } else {
            self.sorted_issue_numbers()
                .into_iter()
                .map(|issue_number| (issue_number, Vec::new()))
                .collect()
        }
    }
}

#[cfg(test)]
impl IssueAggregate {
    fn scopes(&self, issue_number: &str) -> Option<&BTreeSet<String>> {
        self.issues.get(issue_number)
    }
}

pub fn aggregate<'a>(
    commits: impl IntoIterator<Item = &'a Commit>,
    extractor: &IssueExtractor,
) -> IssueAggregate {
    let mut aggregate = IssueAggregate::default();
    for commit in commits {
        for reference in extractor.extract(&commit.full_text()) {
            aggregate.record(reference);
        }
    }
    aggregate
}
