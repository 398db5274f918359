//! # Recursive Installation
//!
//! This module is the traversal engine. Given a manifest it installs every
//! dependency, then looks inside each installed dependency for a manifest of
//! its own and installs that too, depth first.
//!
//! ## Process
//!
//! For each manifest entry, in name order:
//!
//! 1.  **Admission**: the `ConflictTracker` decides whether the repository is
//!     new, a harmless repeat (skipped without touching VCS), or a version
//!     conflict. A conflict stops the entire run immediately with
//!     `Error::VersionConflict`.
//! 2.  **Staleness**: the `StalenessPolicy` says whether the local copy needs
//!     fresh history.
//! 3.  **Lifecycle**: clone, clean (if configured), fetch (if stale), checkout,
//!     update (if stale). A failing step abandons this dependency only.
//! 4.  **Recursion**: if recursion is enabled and a nested manifest is found
//!     under the install path, it is read and installed with the same tracker,
//!     so repositories seen in one branch are recognized in every other.
//!
//! ## Failure Handling
//!
//! Step failures and unreadable nested manifests are logged, collected in
//! `InstallReport::errors`, and the walk continues with the next sibling.
//! Only a version conflict propagates as `Err`, because it means the graph as
//! declared cannot be installed at all.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::config::InstallConfig;
use crate::discovery::find_manifest;
use crate::error::{Error, Result};
use crate::manifest::{self, Dependency, DependencyManifest};
use crate::staleness::StalenessPolicy;
use crate::tracker::{Admission, ConflictTracker, VisitedSet};
use crate::vcs::{Vcs, VcsProvider};

/// What happened during an install run that did not end in a conflict.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Dependencies whose lifecycle completed, in installation order.
    pub installed: Vec<Dependency>,
    /// Encounters skipped because the repository was already admitted at the
    /// same version.
    pub skipped: Vec<Dependency>,
    /// Non-fatal errors, in the order they happened.
    pub errors: Vec<Error>,
    /// Every admitted repository and its version.
    pub visited: VisitedSet,
}

impl InstallReport {
    /// Whether any non-fatal error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Install `manifest` and everything it transitively requires.
///
/// This is the top-level entry point: it creates the run's `ConflictTracker`
/// and discards it when the run ends.
pub fn install(
    manifest: &DependencyManifest,
    config: &InstallConfig,
    vcs: &dyn VcsProvider,
    staleness: &mut dyn StalenessPolicy,
) -> Result<InstallReport> {
    Installer::new(config, vcs, staleness).run(manifest)
}

/// State for a single install run.
pub struct Installer<'a> {
    config: &'a InstallConfig,
    vcs: &'a dyn VcsProvider,
    staleness: &'a mut dyn StalenessPolicy,
    tracker: ConflictTracker,
    /// Install path -> repository that claimed it first.
    owners: HashMap<PathBuf, String>,
    report: InstallReport,
}

impl<'a> Installer<'a> {
    pub fn new(
        config: &'a InstallConfig,
        vcs: &'a dyn VcsProvider,
        staleness: &'a mut dyn StalenessPolicy,
    ) -> Self {
        Self {
            config,
            vcs,
            staleness,
            tracker: ConflictTracker::new(),
            owners: HashMap::new(),
            report: InstallReport::default(),
        }
    }

    /// Run the install and return its report.
    pub fn run(mut self, manifest: &DependencyManifest) -> Result<InstallReport> {
        self.install_manifest(manifest, 0)?;
        self.report.visited = self.tracker.into_visited();
        Ok(self.report)
    }

    fn install_manifest(&mut self, manifest: &DependencyManifest, depth: usize) -> Result<()> {
        let indent = "  ".repeat(depth);

        for dep in manifest.iter() {
            match self.tracker.admit(dep) {
                Admission::Fresh => {}
                Admission::DuplicateSkip => {
                    debug!(
                        "{}Skipping previously installed dependency: {}",
                        indent, dep.repo
                    );
                    self.report.skipped.push(dep.clone());
                    continue;
                }
                Admission::Conflict { installed } => {
                    return Err(Error::VersionConflict {
                        repo: dep.repo.clone(),
                        installed,
                        requested: dep.version.clone(),
                    });
                }
            }

            if let Err(e) = self.claim_install_path(dep) {
                error!("{}{}: {}", indent, dep.name, e);
                self.report.errors.push(e);
                continue;
            }

            let start = Instant::now();
            let stale = self.staleness.is_stale(&dep.repo);
            info!(
                "{}{:<20} {:<12} {}{}",
                indent,
                dep.name,
                dep.version,
                dep.repo,
                if stale { " (stale)" } else { "" }
            );

            if let Err(e) = self.run_lifecycle(dep, stale) {
                error!("{}{}: {}", indent, dep.name, e);
                self.report.errors.push(e);
                continue;
            }

            debug!(
                "{}# time to install: {:.3}s",
                indent,
                start.elapsed().as_secs_f64()
            );
            self.report.installed.push(dep.clone());

            if !self.config.recurse {
                continue;
            }

            let Some(nested_path) = find_manifest(&dep.install_path, self.config.install_root())
            else {
                continue;
            };

            match manifest::read(&nested_path, self.config.install_root()) {
                Ok(nested) => {
                    debug!("{}# reading {}", indent, nested_path.display());
                    self.install_manifest(&nested, depth + 1)?;
                }
                Err(e) => {
                    error!(
                        "{}Error reading deps from '{}': {}",
                        indent,
                        nested_path.display(),
                        e
                    );
                    self.report.errors.push(e);
                }
            }
        }

        Ok(())
    }

    /// Reserve `dep.install_path` for `dep.repo`.
    ///
    /// Two repositories can resolve to one directory through a shared alias or
    /// two spellings of the same location. The second one would be checked out
    /// on top of the first one's working copy, so it is refused instead.
    fn claim_install_path(&mut self, dep: &Dependency) -> Result<()> {
        match self.owners.entry(dep.install_path.clone()) {
            Entry::Occupied(owner) => Err(Error::InstallPathTaken {
                path: dep.install_path.clone(),
                repo: dep.repo.clone(),
                owner: owner.get().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(dep.repo.clone());
                Ok(())
            }
        }
    }

    /// Drive one dependency through clone, clean, fetch, checkout, update.
    fn run_lifecycle(&mut self, dep: &Dependency, stale: bool) -> Result<()> {
        let vcs: &dyn Vcs = self.vcs.backend(dep.vcs);
        let dir = dep.install_path.as_path();

        vcs.clone_repo(dep, dir)?;

        if self.config.clean {
            if let Err(e) = vcs.clean(dep, dir) {
                warn!("Could not clean {}: {}", dep.name, e);
                self.report.errors.push(e);
            }
        }

        if stale {
            debug!("[{}] repo is stale, fetching", dep.name);
            if let Err(e) = vcs.fetch(dep, dir) {
                self.staleness.fetch_failed(&dep.repo);
                return Err(e);
            }
        }

        vcs.checkout(dep, dir)?;

        if stale {
            vcs.update(dep, dir)?;
        }

        Ok(())
    }
}
