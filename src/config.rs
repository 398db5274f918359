//! # Install Configuration
//!
//! `InstallConfig` gathers the switches that change how an install behaves.
//! It is built once (by the CLI, or directly by library users and tests) and
//! passed by reference into the installer and every level of its recursion.
//! Nothing in the crate keeps configuration in global state.

use std::path::{Path, PathBuf};

use crate::defaults::DEFAULT_INSTALL_DIR;

/// Options for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Discard local modifications in each dependency before checkout.
    pub clean: bool,
    /// Process manifests found inside installed dependencies.
    pub recurse: bool,
    /// Directory dependencies are installed under.
    ///
    /// Nested manifests are resolved against the same root, and manifest
    /// discovery never looks at or above it.
    pub install_root: PathBuf,
}

impl InstallConfig {
    /// Configuration with the default switches (no clean, recursive).
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            clean: false,
            recurse: true,
            install_root: install_root.into(),
        }
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INSTALL_DIR)
    }
}
