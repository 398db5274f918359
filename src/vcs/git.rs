//! Git backend
//!
//! Uses the system `git` command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::path::Path;

use log::debug;

use super::{clone_into, run, succeeds, LifecycleStep, Vcs};
use crate::error::{Error, Result};
use crate::manifest::Dependency;

const GIT: &str = "git";

/// Lifecycle operations backed by `git`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git;

impl Vcs for Git {
    fn clone_repo(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        clone_into(GIT, "clone", ".git", dep, dir).map_err(explain_auth_failure)
    }

    fn clean(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(GIT, &["reset", "--hard"], dir, LifecycleStep::Clean, dep)?;
        run(GIT, &["clean", "-fd"], dir, LifecycleStep::Clean, dep)?;
        Ok(())
    }

    fn fetch(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(GIT, &["fetch", "--tags", "origin"], dir, LifecycleStep::Fetch, dep)
            .map_err(explain_auth_failure)?;
        Ok(())
    }

    fn checkout(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(
            GIT,
            &["checkout", &dep.version, "--"],
            dir,
            LifecycleStep::Checkout,
            dep,
        )?;
        Ok(())
    }

    /// Fast-forward to the fetched remote branch when `version` names one.
    ///
    /// Tags and commit hashes are already exact after checkout.
    fn update(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        let remote_ref = remote_branch_ref(&dep.version);
        if !succeeds(GIT, &["show-ref", "--verify", "--quiet", &remote_ref], dir) {
            debug!(
                "[{}] {} is not a remote branch, nothing to update",
                dep.name, dep.version
            );
            return Ok(());
        }

        let upstream = format!("origin/{}", dep.version);
        run(
            GIT,
            &["merge", "--ff-only", &upstream],
            dir,
            LifecycleStep::Update,
            dep,
        )?;
        Ok(())
    }
}

fn remote_branch_ref(version: &str) -> String {
    format!("refs/remotes/origin/{}", version)
}

/// Add guidance to errors that look like authentication failures.
fn explain_auth_failure(error: Error) -> Error {
    match error {
        Error::VcsCommand {
            step,
            repo,
            command,
            stderr,
        } if is_auth_failure(&stderr) => Error::VcsCommand {
            step,
            repo,
            command,
            stderr: format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr
            ),
        },
        other => other,
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
}
