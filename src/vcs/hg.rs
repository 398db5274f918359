//! Mercurial backend

use std::path::Path;

use super::{clone_into, run, LifecycleStep, Vcs};
use crate::error::Result;
use crate::manifest::Dependency;

const HG: &str = "hg";

/// Lifecycle operations backed by `hg`.
///
/// `update` keeps the default no-op: checking out after `hg pull` already
/// lands on the pulled head.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mercurial;

impl Vcs for Mercurial {
    fn clone_repo(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        clone_into(HG, "clone", ".hg", dep, dir)
    }

    fn clean(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(
            HG,
            &["revert", "--all", "--no-backup"],
            dir,
            LifecycleStep::Clean,
            dep,
        )?;
        Ok(())
    }

    fn fetch(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(HG, &["pull"], dir, LifecycleStep::Fetch, dep)?;
        Ok(())
    }

    fn checkout(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(
            HG,
            &["update", "-r", &dep.version],
            dir,
            LifecycleStep::Checkout,
            dep,
        )?;
        Ok(())
    }
}
