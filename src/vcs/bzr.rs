//! Bazaar backend

use std::path::Path;

use super::{clone_into, run, LifecycleStep, Vcs};
use crate::error::Result;
use crate::manifest::Dependency;

const BZR: &str = "bzr";

/// Lifecycle operations backed by `bzr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bazaar;

impl Vcs for Bazaar {
    fn clone_repo(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        clone_into(BZR, "branch", ".bzr", dep, dir)
    }

    fn clean(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(BZR, &["revert"], dir, LifecycleStep::Clean, dep)?;
        Ok(())
    }

    fn fetch(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(BZR, &["pull"], dir, LifecycleStep::Fetch, dep)?;
        Ok(())
    }

    fn checkout(&self, dep: &Dependency, dir: &Path) -> Result<()> {
        run(
            BZR,
            &["update", "-r", &dep.version],
            dir,
            LifecycleStep::Checkout,
            dep,
        )?;
        Ok(())
    }
}
