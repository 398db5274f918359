//! Property-based tests for admission tracking and install path derivation.
//!
//! These tests use proptest to generate random encounter sequences and
//! repository locations and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::manifest::{repo_relative_path, Dependency, VcsKind};
    use crate::tracker::{Admission, ConflictTracker};
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::path::Component;

    fn dep(repo: &str, version: &str) -> Dependency {
        Dependency::new(repo, repo, version, VcsKind::Git, "/vendor")
    }

    /// A sequence of (repo, version) encounters over a small alphabet so that
    /// repeats and conflicts actually happen.
    fn encounters() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::vec(("repo-[a-d]", "v[1-3]"), 0..40)
    }

    // ============================================================================
    // ConflictTracker property tests
    // ============================================================================

    proptest! {
        /// Property: the first version seen for a repo is the one that sticks
        #[test]
        fn first_version_is_never_overwritten(seq in encounters()) {
            let mut tracker = ConflictTracker::new();
            let mut first_seen: HashMap<String, String> = HashMap::new();

            for (repo, version) in &seq {
                tracker.admit(&dep(repo, version));
                first_seen.entry(repo.clone()).or_insert_with(|| version.clone());
            }

            prop_assert_eq!(tracker.visited(), &first_seen);
        }

        /// Property: each repo is admitted as Fresh exactly once
        #[test]
        fn each_repo_is_fresh_exactly_once(seq in encounters()) {
            let mut tracker = ConflictTracker::new();
            let mut fresh_counts: HashMap<String, usize> = HashMap::new();

            for (repo, version) in &seq {
                if tracker.admit(&dep(repo, version)) == Admission::Fresh {
                    *fresh_counts.entry(repo.clone()).or_default() += 1;
                }
            }

            for count in fresh_counts.values() {
                prop_assert_eq!(*count, 1);
            }
            prop_assert_eq!(fresh_counts.len(), tracker.len());
        }

        /// Property: the classification depends only on equality with the
        /// first-seen version
        #[test]
        fn classification_matches_first_seen(seq in encounters()) {
            let mut tracker = ConflictTracker::new();
            let mut first_seen: HashMap<String, String> = HashMap::new();

            for (repo, version) in &seq {
                let expected = match first_seen.get(repo) {
                    None => Admission::Fresh,
                    Some(v) if v == version => Admission::DuplicateSkip,
                    Some(v) => Admission::Conflict { installed: v.clone() },
                };
                prop_assert_eq!(tracker.admit(&dep(repo, version)), expected);
                first_seen.entry(repo.clone()).or_insert_with(|| version.clone());
            }
        }
    }

    // ============================================================================
    // repo_relative_path property tests
    // ============================================================================

    proptest! {
        /// Property: derived install paths are always relative and never escape
        #[test]
        fn derived_paths_stay_inside_root(
            host in "[a-z]{1,10}\\.(com|org)",
            segments in prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..4),
        ) {
            let repo = format!("https://{}/{}.git", host, segments.join("/"));
            let path = repo_relative_path(&repo).unwrap();

            prop_assert!(path.is_relative());
            for component in path.components() {
                prop_assert!(matches!(component, Component::Normal(_)));
            }
        }

        /// Property: https and scp-style spellings of a repo install to the same place
        #[test]
        fn https_and_scp_agree(
            host in "[a-z]{1,10}\\.com",
            owner in "[a-zA-Z0-9_-]{1,12}",
            name in "[a-zA-Z0-9_-]{1,12}",
        ) {
            let https = repo_relative_path(&format!("https://{}/{}/{}.git", host, owner, name)).unwrap();
            let scp = repo_relative_path(&format!("git@{}:{}/{}.git", host, owner, name)).unwrap();
            prop_assert_eq!(https, scp);
        }

        /// Property: derivation is deterministic
        #[test]
        fn derivation_is_deterministic(input in "[a-zA-Z0-9_./:@-]{1,40}") {
            let first = repo_relative_path(&input);
            let second = repo_relative_path(&input);
            prop_assert_eq!(first.is_ok(), second.is_ok());
            if let (Ok(a), Ok(b)) = (first, second) {
                prop_assert_eq!(a, b);
            }
        }
    }
}
