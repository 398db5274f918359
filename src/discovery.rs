//! Nested manifest discovery
//!
//! After a dependency is installed, the installer looks for a manifest inside
//! its working copy. The search starts at the install path and walks up
//! through its ancestors, stopping before the install root so that a
//! project's own manifest is never picked up as a nested one.

use std::path::{Path, PathBuf};

use crate::manifest::MANIFEST_NAMES;

/// Find the manifest associated with `start`.
///
/// Checks `start` and then each parent directory that is still strictly inside
/// `boundary`. Within one directory, names are tried in `MANIFEST_NAMES`
/// order. If `start` is not inside `boundary`, only `start` itself is checked.
pub fn find_manifest(start: &Path, boundary: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);

    while let Some(current) = dir {
        if let Some(found) = manifest_in(current) {
            return Some(found);
        }

        dir = current
            .parent()
            .filter(|parent| parent.starts_with(boundary) && *parent != boundary);
    }

    None
}

/// Return the first manifest file present directly in `dir`.
pub fn manifest_in(dir: &Path) -> Option<PathBuf> {
    MANIFEST_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_manifest_in_start_dir() {
        let temp = TempDir::new().unwrap();
        let dep = temp.path().join("github.com/team/lib");
        fs::create_dir_all(&dep).unwrap();
        fs::write(dep.join("deps.json"), "{}").unwrap();

        assert_eq!(
            find_manifest(&dep, temp.path()),
            Some(dep.join("deps.json"))
        );
    }

    #[test]
    fn test_walks_up_inside_boundary() {
        let temp = TempDir::new().unwrap();
        let owner = temp.path().join("github.com/team");
        let dep = owner.join("lib");
        fs::create_dir_all(&dep).unwrap();
        fs::write(owner.join("deps.json"), "{}").unwrap();

        assert_eq!(
            find_manifest(&dep, temp.path()),
            Some(owner.join("deps.json"))
        );
    }

    #[test]
    fn test_never_returns_boundary_manifest() {
        let temp = TempDir::new().unwrap();
        let dep = temp.path().join("github.com/team/lib");
        fs::create_dir_all(&dep).unwrap();
        fs::write(temp.path().join("deps.json"), "{}").unwrap();

        assert_eq!(find_manifest(&dep, temp.path()), None);
    }

    #[test]
    fn test_prefers_json_over_yaml() {
        let temp = TempDir::new().unwrap();
        let dep = temp.path().join("lib");
        fs::create_dir_all(&dep).unwrap();
        fs::write(dep.join("deps.yaml"), "").unwrap();
        fs::write(dep.join("deps.json"), "{}").unwrap();

        assert_eq!(manifest_in(&dep), Some(dep.join("deps.json")));
    }

    #[test]
    fn test_yaml_manifest_is_found() {
        let temp = TempDir::new().unwrap();
        let dep = temp.path().join("lib");
        fs::create_dir_all(&dep).unwrap();
        fs::write(dep.join("deps.yml"), "").unwrap();

        assert_eq!(find_manifest(&dep, temp.path()), Some(dep.join("deps.yml")));
    }

    #[test]
    fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let dep = temp.path().join("lib");
        fs::create_dir_all(&dep).unwrap();

        assert_eq!(find_manifest(&dep, temp.path()), None);
    }

    #[test]
    fn test_start_outside_boundary_checks_only_start() {
        let temp = TempDir::new().unwrap();
        let outside = temp.path().join("elsewhere/lib");
        fs::create_dir_all(&outside).unwrap();
        fs::write(temp.path().join("elsewhere/deps.json"), "{}").unwrap();

        let boundary = temp.path().join("vendor");
        assert_eq!(find_manifest(&outside, &boundary), None);
    }
}
