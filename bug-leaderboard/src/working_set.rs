//! Run-scoped, deduplicated collection of fetched issues.

use crate::model::{Issue, IssueId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Fetched issues keyed by tracker identity, shared by all partition fetchers.
///
/// The lock is held only while one page is merged in, never across a network
/// round trip. An issue seen under several partitions keeps the last merged
/// version; all versions come from the same remote record.
#[derive(Debug, Default)]
pub struct WorkingSet {
    issues: Mutex<HashMap<IssueId, Issue>>,
}

impl WorkingSet {
    /// Creates an empty working set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one page of issues, replacing earlier versions of the same identity.
    pub fn merge_page(&self, page: Vec<Issue>) {
        let mut issues = self.lock();
        for issue in page {
            issues.insert(issue.id.clone(), issue);
        }
    }

    /// Number of distinct issues observed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been merged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hands the issues over for persistence, ordered by identity key.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        let issues = self
            .issues
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut issues: Vec<Issue> = issues.into_values().collect();
        issues.sort_by_key(Issue::identity);
        issues
    }

    // A panic mid-merge leaves whole entries behind, so a poisoned map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<IssueId, Issue>> {
        self.issues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::issue;
    use std::sync::Arc;

    #[test]
    fn merge_deduplicates_by_identity() {
        let set = WorkingSet::new();
        set.merge_page(vec![issue(1), issue(2)]);

        let mut updated = issue(1);
        updated.title = "renamed".to_string();
        set.merge_page(vec![updated]);

        assert_eq!(set.len(), 2);
        let issues = set.into_issues();
        assert_eq!(issues[0].title, "renamed");
        assert_eq!(issues[1].number, 2);
    }

    #[test]
    fn into_issues_orders_by_identity_key() {
        let set = WorkingSet::new();
        set.merge_page(vec![issue(30), issue(4), issue(12)]);

        let numbers: Vec<u64> = set.into_issues().iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![4, 12, 30]);
    }

    #[test]
    fn concurrent_merges_keep_every_identity() {
        let set = Arc::new(WorkingSet::new());
        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let set = Arc::clone(&set);
                std::thread::spawn(move || {
                    for page in 0..10u64 {
                        let base = worker * 1000 + page * 10;
                        set.merge_page((base..base + 10).map(issue).collect());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 400);
    }

    #[test]
    fn new_set_is_empty() {
        assert!(WorkingSet::new().is_empty());
    }
}
