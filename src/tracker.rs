//! # Duplicate and Conflict Tracking
//!
//! A dependency graph routinely reaches the same repository more than once:
//! two libraries may both depend on a shared helper. The `ConflictTracker`
//! remembers the version each repository was first admitted at during one
//! install run and classifies every later encounter.
//!
//! ## Policy
//!
//! For a dependency with repository `R` and version `V`:
//!
//! 1. `R` never seen: record `R -> V` and return `Admission::Fresh`.
//! 2. `R` seen at exactly `V`: return `Admission::DuplicateSkip`.
//! 3. `R` seen at a different version: return `Admission::Conflict`.
//!
//! Versions are opaque strings compared by exact equality; `v1.0` and `1.0`
//! are different versions. Only case 1 mutates the visited set, and an entry,
//! once recorded, is never overwritten.

use std::collections::HashMap;

use crate::manifest::Dependency;

/// Repository identity -> version first admitted for it.
pub type VisitedSet = HashMap<String, String>;

/// The outcome of offering a dependency to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// First encounter; the caller should install it.
    Fresh,
    /// Already admitted at the same version; the caller should skip it.
    DuplicateSkip,
    /// Already admitted at a different version; the caller must abort.
    Conflict {
        /// The version recorded at first admission.
        installed: String,
    },
}

/// Run-scoped record of every repository admitted so far.
#[derive(Debug, Default)]
pub struct ConflictTracker {
    visited: VisitedSet,
}

impl ConflictTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `dep` against what has been admitted so far.
    pub fn admit(&mut self, dep: &Dependency) -> Admission {
        match self.visited.get(&dep.repo) {
            None => {
                self.visited.insert(dep.repo.clone(), dep.version.clone());
                Admission::Fresh
            }
            Some(version) if *version == dep.version => Admission::DuplicateSkip,
            Some(version) => Admission::Conflict {
                installed: version.clone(),
            },
        }
    }

    /// The version `repo` was admitted at, if any.
    #[cfg(test)]
    pub fn version_of(&self, repo: &str) -> Option<&str> {
        self.visited.get(repo).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Read-only view of the visited set.
    #[cfg(test)]
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    /// Consume the tracker, keeping its visited set.
    pub fn into_visited(self) -> VisitedSet {
        self.visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::VcsKind;

    fn dep(name: &str, repo: &str, version: &str) -> Dependency {
        Dependency::new(name, repo, version, VcsKind::Git, format!("/vendor/{}", name))
    }

    #[test]
    fn test_first_encounter_is_fresh() {
        let mut tracker = ConflictTracker::new();
        assert!(tracker.is_empty());

        assert_eq!(tracker.admit(&dep("a", "repo-a", "v1")), Admission::Fresh);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.version_of("repo-a"), Some("v1"));
    }

    #[test]
    fn test_same_version_is_duplicate() {
        let mut tracker = ConflictTracker::new();
        tracker.admit(&dep("a", "repo-a", "v1"));

        assert_eq!(
            tracker.admit(&dep("a", "repo-a", "v1")),
            Admission::DuplicateSkip
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_identity_is_repo_not_name() {
        let mut tracker = ConflictTracker::new();
        tracker.admit(&dep("a", "repo-a", "v1"));

        // Different name, same repository
        assert_eq!(
            tracker.admit(&dep("alias-of-a", "repo-a", "v1")),
            Admission::DuplicateSkip
        );
        // Same name, different repository
        assert_eq!(tracker.admit(&dep("a", "repo-b", "v1")), Admission::Fresh);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_different_version_is_conflict_without_mutation() {
        let mut tracker = ConflictTracker::new();
        tracker.admit(&dep("a", "repo-a", "v1"));

        assert_eq!(
            tracker.admit(&dep("a", "repo-a", "v2")),
            Admission::Conflict {
                installed: "v1".to_string()
            }
        );
        assert_eq!(tracker.version_of("repo-a"), Some("v1"));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_versions_compare_exactly() {
        let mut tracker = ConflictTracker::new();
        tracker.admit(&dep("a", "repo-a", "v1.0"));

        assert!(matches!(
            tracker.admit(&dep("a", "repo-a", "1.0")),
            Admission::Conflict { .. }
        ));
        assert!(matches!(
            tracker.admit(&dep("a", "repo-a", "v1.0 ")),
            Admission::Conflict { .. }
        ));
    }

    #[test]
    fn test_into_visited() {
        let mut tracker = ConflictTracker::new();
        tracker.admit(&dep("a", "repo-a", "v1"));
        tracker.admit(&dep("b", "repo-b", "v2"));

        let visited = tracker.into_visited();
        assert_eq!(visited.len(), 2);
        assert_eq!(visited.get("repo-b").map(String::as_str), Some("v2"));
    }
}
