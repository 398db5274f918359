//! # Error Handling
//!
//! This module defines the centralized error type for `tributary`. It uses
//! `thiserror` to build a single `Error` enum covering every failure the
//! library can report, each with enough context to explain what went wrong.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - manifest problems (`ManifestParse`, `InvalidRepo`, `Json`, `Yaml`, `Io`),
//!   - version-control step failures (`VcsCommand`, `VcsSpawn`),
//!   - two repositories resolving to one directory (`InstallPathTaken`),
//!   - the one fatal traversal outcome, `VersionConflict`.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Step failures and manifest read failures are recoverable at the level of a
//! single dependency: the installer records them and moves on. A
//! `VersionConflict` is never recorded; it is returned straight up through the
//! recursive traversal to the caller. `Error::is_fatal` encodes that split.

use std::path::PathBuf;

use thiserror::Error;

use crate::vcs::LifecycleStep;

/// Main error type for tributary operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest file could not be understood.
    ///
    /// Includes the offending file and optionally a hint about how to fix it.
    #[error("Manifest parsing error in {}: {message}{}", path.display(), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        path: PathBuf,
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A repository location could not be turned into an install path.
    #[error("Invalid repository location '{repo}': {message}")]
    InvalidRepo { repo: String, message: String },

    /// A version-control command ran but reported failure.
    #[error("{step} failed for {repo}: {command} - {stderr}")]
    VcsCommand {
        step: LifecycleStep,
        repo: String,
        command: String,
        stderr: String,
    },

    /// A version-control binary could not be started at all.
    #[error("Could not run {program} for {repo}: {message}\n  hint: make sure `{program}` is installed and on PATH")]
    VcsSpawn {
        program: String,
        repo: String,
        message: String,
    },

    /// The same repository is required at two different versions.
    ///
    /// `installed` is the version admitted first in this run; `requested` is
    /// the version of the entry that triggered the conflict.
    #[error("Duplicate dependency with different versions detected\n  repo:     {repo}\n  versions: {installed}  {requested}")]
    VersionConflict {
        repo: String,
        installed: String,
        requested: String,
    },

    /// Two different repositories resolve to the same install path.
    ///
    /// `owner` is the repository that claimed the path first in this run.
    #[error("Install path {} already holds {owner}, cannot install {repo} there\n  hint: give one of them a distinct \"alias\"", path.display())]
    InstallPathTaken {
        path: PathBuf,
        repo: String,
        owner: String,
    },

    /// The staleness cache could not be read or written.
    #[error("Staleness cache error at {}: {message}", path.display())]
    StaleCache { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether this error must stop the whole traversal.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::VersionConflict { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
