//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
//!     fixture.command().arg("install").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use tributary::error::{Error, Result};
use tributary::manifest::{Dependency, VcsKind, DEPS_FILE};
use tributary::staleness::StalenessPolicy;
use tributary::vcs::{LifecycleStep, Vcs, VcsProvider};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::{git_available, should_skip_network_tests};
    pub use super::TestFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// A valid manifest with no dependencies.
    pub const EMPTY: &str = "{}";

    /// Not JSON at all.
    pub const INVALID_JSON: &str = "{ \"a\": ";

    /// A manifest whose only entry has no version.
    pub const MISSING_VERSION: &str = r#"{ "a": { "repo": "https://example.com/a.git", "version": "" } }"#;
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// Whether a usable `git` binary is on PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary project directory with an optional `deps.json`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `deps.json` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file(DEPS_FILE, content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join(DEPS_FILE)
    }

    /// Where `install` puts the staleness cache for commands from this fixture.
    pub fn cache_file(&self) -> PathBuf {
        self.temp_dir.path().join(".cache").join("timelock.json")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory.
    ///
    /// The staleness cache is redirected into the fixture and inherited
    /// `TRIBUTARY_*` variables are cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tributary");
        cmd.current_dir(self.path())
            .env_remove("TRIBUTARY_MANIFEST")
            .env_remove("TRIBUTARY_ROOT")
            .env("TRIBUTARY_CACHE", self.cache_file())
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Library-level doubles
// ============================================================================

/// Build a git dependency named after its repo, aliased to its name.
#[allow(dead_code)]
pub fn dep(root: &Path, name: &str, version: &str) -> Dependency {
    Dependency::new(name, name, version, VcsKind::Git, root.join(name))
}

/// JSON manifest text for `(name, version)` pairs, each aliased to its name.
#[allow(dead_code)]
pub fn json_manifest(entries: &[(&str, &str)]) -> String {
    let body: Vec<String> = entries
        .iter()
        .map(|(name, version)| {
            format!(
                r#""{name}": {{ "repo": "{name}", "version": "{version}", "alias": "{name}" }}"#
            )
        })
        .collect();
    format!("{{ {} }}", body.join(", "))
}

/// VCS double that records every step and can fail chosen ones.
///
/// Clone creates the working directory and drops in a nested manifest when
/// one was registered for the repository.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingVcs {
    pub calls: Arc<Mutex<Vec<(String, LifecycleStep)>>>,
    failures: HashSet<(String, LifecycleStep)>,
    nested: HashMap<String, String>,
}

#[allow(dead_code)]
impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, repo: &str, step: LifecycleStep) -> Self {
        self.failures.insert((repo.to_string(), step));
        self
    }

    pub fn with_nested(mut self, repo: &str, manifest: String) -> Self {
        self.nested.insert(repo.to_string(), manifest);
        self
    }

    pub fn steps_for(&self, repo: &str) -> Vec<LifecycleStep> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == repo)
            .map(|(_, step)| *step)
            .collect()
    }

    pub fn cloned(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, step)| *step == LifecycleStep::Clone)
            .map(|(repo, _)| repo.clone())
            .collect()
    }

    fn record(&self, dep: &Dependency, step: LifecycleStep) -> Result<()> {
        self.calls.lock().unwrap().push((dep.repo.clone(), step));
        if self.failures.contains(&(dep.repo.clone(), step)) {
            return Err(Error::VcsCommand {
                step,
                repo: dep.repo.clone(),
                command: format!("mock {step}"),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Vcs for RecordingVcs {
    fn clone_repo(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        self.record(dep, LifecycleStep::Clone)?;
        std::fs::create_dir_all(dir)?;
        if let Some(content) = self.nested.get(&dep.repo) {
            std::fs::write(dir.join(DEPS_FILE), content)?;
        }
        Ok(())
    }

    fn clean(&self, dep: &Dependency, _dir: &Path) -> Result<()> {
        self.record(dep, LifecycleStep::Clean)
    }

    fn fetch(&self, dep: &Dependency, _dir: &Path) -> Result<()> {
        self.record(dep, LifecycleStep::Fetch)
    }

    fn checkout(&self, dep: &Dependency, _dir: &Path) -> Result<()> {
        self.record(dep, LifecycleStep::Checkout)
    }

    fn update(&self, dep: &Dependency, _dir: &Path) -> Result<()> {
        self.record(dep, LifecycleStep::Update)
    }
}

impl VcsProvider for RecordingVcs {
    fn backend(&self, _kind: VcsKind) -> &dyn Vcs {
        self
    }
}

/// Staleness double answering from a fixed set of stale repositories.
#[allow(dead_code)]
pub struct FixedStaleness {
    stale: HashSet<String>,
    all: bool,
}

#[allow(dead_code)]
impl FixedStaleness {
    pub fn always() -> Self {
        Self {
            stale: HashSet::new(),
            all: true,
        }
    }

    pub fn never() -> Self {
        Self {
            stale: HashSet::new(),
            all: false,
        }
    }

    pub fn only(repos: &[&str]) -> Self {
        Self {
            stale: repos.iter().map(|r| r.to_string()).collect(),
            all: false,
        }
    }
}

impl StalenessPolicy for FixedStaleness {
    fn is_stale(&mut self, repo: &str) -> bool {
        self.all || self.stale.contains(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_json_manifest_is_valid_json() {
        let text = json_manifest(&[("a", "v1"), ("b", "v2")]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["b"]["version"], "v2");
    }
}
