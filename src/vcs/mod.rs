//! # Version-Control Backends
//!
//! The installer drives every dependency through the same five-step
//! lifecycle, whatever system the repository lives in. This module defines
//! that lifecycle as the `Vcs` trait and provides one implementation per
//! supported system:
//!
//! - **`git::Git`** for `"type": "git"` (the default)
//! - **`hg::Mercurial`** for `"type": "hg"`
//! - **`bzr::Bazaar`** for `"type": "bzr"`
//!
//! ## Working Directories
//!
//! Every step receives the directory it operates on explicitly and runs its
//! command with `Command::current_dir`. Nothing here changes the process
//! working directory.
//!
//! ## Design
//!
//! The installer never talks to a backend directly. It asks a `VcsProvider`
//! for the backend matching a dependency's `VcsKind`. `SystemVcs` is the
//! provider used by the CLI; tests supply their own provider that records
//! calls instead of running commands.

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};
use crate::manifest::{Dependency, VcsKind};

pub mod bzr;
pub mod git;
pub mod hg;

pub use bzr::Bazaar;
pub use git::Git;
pub use hg::Mercurial;

/// The steps of a dependency install, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStep {
    Clone,
    Clean,
    Fetch,
    Checkout,
    Update,
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStep::Clone => "clone",
            LifecycleStep::Clean => "clean",
            LifecycleStep::Fetch => "fetch",
            LifecycleStep::Checkout => "checkout",
            LifecycleStep::Update => "update",
        };
        f.write_str(name)
    }
}

/// Lifecycle operations for one version-control system.
pub trait Vcs {
    /// Make sure a working copy of `dep.repo` exists at `dir`.
    ///
    /// Must be a no-op when the working copy is already there.
    fn clone_repo(&self, dep: &Dependency, dir: &Path) -> Result<()>;

    /// Discard local modifications in the working copy.
    fn clean(&self, dep: &Dependency, dir: &Path) -> Result<()>;

    /// Download new history from the remote.
    fn fetch(&self, dep: &Dependency, dir: &Path) -> Result<()>;

    /// Move the working copy to `dep.version`.
    fn checkout(&self, dep: &Dependency, dir: &Path) -> Result<()>;

    /// Reconcile the checked-out working copy with freshly fetched history.
    fn update(&self, _dep: &Dependency, _dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// Selects the backend for a dependency.
pub trait VcsProvider {
    fn backend(&self, kind: VcsKind) -> &dyn Vcs;
}

/// The provider backed by the real `git`, `hg` and `bzr` binaries.
#[derive(Debug, Default)]
pub struct SystemVcs {
    git: Git,
    hg: Mercurial,
    bzr: Bazaar,
}

impl SystemVcs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VcsProvider for SystemVcs {
    fn backend(&self, kind: VcsKind) -> &dyn Vcs {
        match kind {
            VcsKind::Git => &self.git,
            VcsKind::Hg => &self.hg,
            VcsKind::Bzr => &self.bzr,
        }
    }
}

/// Run `program args...` in `dir`, returning stdout on success.
pub(crate) fn run(
    program: &str,
    args: &[&str],
    dir: &Path,
    step: LifecycleStep,
    dep: &Dependency,
) -> Result<String> {
    let command = format!("{} {}", program, args.join(" "));
    debug!("[{}] {} (in {})", dep.name, command, dir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::VcsSpawn {
            program: program.to_string(),
            repo: dep.repo.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr
        };
        return Err(Error::VcsCommand {
            step,
            repo: dep.repo.clone(),
            command,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether `program args...` exits successfully in `dir`.
///
/// Used for checks whose failure is an answer, not an error.
pub(crate) fn succeeds(program: &str, args: &[&str], dir: &Path) -> bool {
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Shared clone logic: skip when `dir/<marker>` exists, otherwise run the
/// backend's clone command from the parent directory.
pub(crate) fn clone_into(
    program: &str,
    subcommand: &str,
    marker: &str,
    dep: &Dependency,
    dir: &Path,
) -> Result<()> {
    if dir.join(marker).exists() {
        debug!("[{}] already cloned at {}", dep.name, dir.display());
        return Ok(());
    }
    if dep.repo.starts_with('-') {
        return Err(Error::InvalidRepo {
            repo: dep.repo.clone(),
            message: "repository location cannot start with '-'".to_string(),
        });
    }

    let parent = dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;

    let target = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidRepo {
            repo: dep.repo.clone(),
            message: format!("install path {} has no final component", dir.display()),
        })?;

    run(
        program,
        &[subcommand, "--", &dep.repo, &target],
        parent,
        LifecycleStep::Clone,
        dep,
    )?;
    Ok(())
}
