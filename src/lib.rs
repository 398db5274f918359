//! # Tributary Library
//!
//! This library installs a project's version-controlled dependencies, and the
//! dependencies of those dependencies, into a local directory tree. It is
//! designed to be used by the `tributary` command-line tool but can also be
//! embedded in other build tooling.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use tributary::manifest;
//!
//! let json = r#"{
//!     "depman": { "repo": "https://github.com/vube/depman.git", "version": "v1.2.0" }
//! }"#;
//!
//! let deps = manifest::parse(json, Path::new("deps.json"), Path::new("vendor")).unwrap();
//! let depman = deps.get("depman").unwrap();
//!
//! assert_eq!(depman.version, "v1.2.0");
//! assert_eq!(
//!     depman.install_path,
//!     Path::new("vendor/github.com/vube/depman")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: the `deps.json` data model. Each entry names a
//!   repository, a version and the VCS it lives in.
//! - **Installation (`install`)**: the depth-first walk over a manifest and the
//!   manifests found inside installed dependencies.
//! - **Conflict tracking (`tracker`)**: the run-wide record of which version of
//!   each repository was admitted first. Repeats are skipped, disagreements
//!   stop the run.
//! - **Staleness (`staleness`)**: decides whether a working copy needs new
//!   history, backed by a small on-disk timestamp cache.
//! - **VCS backends (`vcs`)**: git, Mercurial and Bazaar behind one `Vcs`
//!   trait so the walker never shells out directly.
//!
//! ## Execution Flow
//!
//! `install::install` is the entry point. For every dependency it:
//!
//! 1.  **Admits** it through the conflict tracker.
//! 2.  **Runs the lifecycle**: clone, clean, fetch, checkout, update, with
//!     the optional steps gated by configuration and staleness.
//! 3.  **Recurses** into a nested manifest when one is found.
//!
//! Failures of a single dependency are collected in the returned
//! `InstallReport`; only a version conflict aborts the run.

pub mod config;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod install;
pub mod manifest;
pub mod output;
pub mod staleness;
pub mod suggestions;
pub mod tracker;
pub mod vcs;

#[cfg(test)]
mod tracker_proptest;
