//! # Dependency Manifests
//!
//! This module defines the data model for `deps.json` manifests and the logic
//! for reading them from disk.
//!
//! ## Format
//!
//! A manifest is a JSON object keyed by dependency name:
//!
//! ```json
//! {
//!   "depman": { "type": "git", "repo": "https://github.com/vube/depman.git", "version": "v1.2.0" },
//!   "colors": { "repo": "git@github.com:vube/colors.git", "version": "master", "alias": "vendor/colors" }
//! }
//! ```
//!
//! `deps.yaml` / `deps.yml` carry the same mapping in YAML.
//!
//! - `type` selects the version-control system (`git`, `hg`, `bzr`) and
//!   defaults to `git`.
//! - `repo` is the repository location. It is also the identity used for
//!   duplicate and conflict detection.
//! - `version` is an opaque tag, branch or revision string.
//! - `alias` optionally overrides where the dependency is installed, relative to
//!   the install root.
//!
//! Without an alias the install path mirrors the repository location, e.g.
//! `https://github.com/vube/depman.git` installs to
//! `<install_root>/github.com/vube/depman`.
//!
//! ## Key Components
//!
//! - **`Dependency`**: one resolved entry, immutable once read.
//! - **`DependencyManifest`**: the name-ordered collection of dependencies.
//! - **`read`**: load a manifest file and resolve every entry's install path.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// The canonical manifest file name.
pub const DEPS_FILE: &str = "deps.json";

/// Every file name recognized as a manifest, in lookup order.
pub const MANIFEST_NAMES: &[&str] = &[DEPS_FILE, "deps.yaml", "deps.yml"];

/// The version-control system a dependency is stored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Git (the default when `type` is omitted)
    #[default]
    Git,
    /// Mercurial
    Hg,
    /// Bazaar
    Bzr,
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Bzr => "bzr",
        };
        f.write_str(name)
    }
}

/// A manifest entry exactly as written in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Version-control system, serialized as `type`.
    #[serde(rename = "type", default)]
    pub vcs: VcsKind,
    /// Repository location.
    pub repo: String,
    /// Tag, branch or revision to check out.
    pub version: String,
    /// Install path relative to the install root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A single resolved dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Human-readable name (the manifest key).
    pub name: String,
    /// Repository location, used as the dedupe/conflict key.
    pub repo: String,
    /// Opaque version string, compared by exact equality.
    pub version: String,
    /// Where the working copy lives.
    pub install_path: PathBuf,
    /// Which backend handles this dependency.
    pub vcs: VcsKind,
}

impl Dependency {
    pub fn new(
        name: impl Into<String>,
        repo: impl Into<String>,
        version: impl Into<String>,
        vcs: VcsKind,
        install_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
            version: version.into(),
            install_path: install_path.into(),
            vcs,
        }
    }
}

/// A set of dependencies keyed by name.
///
/// Iteration is in name order so that installs and their logs are
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct DependencyManifest {
    source: Option<PathBuf>,
    deps: BTreeMap<String, Dependency>,
}

impl DependencyManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from already-resolved dependencies.
    pub fn from_dependencies(deps: impl IntoIterator<Item = Dependency>) -> Self {
        let mut manifest = Self::new();
        for dep in deps {
            manifest.insert(dep);
        }
        manifest
    }

    /// Add a dependency, replacing any existing entry with the same name.
    pub fn insert(&mut self, dep: Dependency) {
        self.deps.insert(dep.name.clone(), dep);
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.deps.get(name)
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Iterate dependencies in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.deps.values()
    }

    /// The file this manifest was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Read a manifest file and resolve every entry against `install_root`.
///
/// The format is chosen from the file extension: `.yaml`/`.yml` are parsed as
/// YAML, everything else as JSON.
pub fn read(path: &Path, install_root: &Path) -> Result<DependencyManifest> {
    let content = std::fs::read_to_string(path)?;
    parse(&content, path, install_root)
}

/// Parse manifest content that was loaded from `path`.
pub fn parse(content: &str, path: &Path, install_root: &Path) -> Result<DependencyManifest> {
    let entries = parse_entries(content, path)?;

    let mut manifest = DependencyManifest {
        source: Some(path.to_path_buf()),
        deps: BTreeMap::new(),
    };
    for (name, entry) in entries {
        let dep = resolve_entry(&name, entry, path, install_root)?;
        manifest.insert(dep);
    }
    Ok(manifest)
}

fn parse_entries(content: &str, path: &Path) -> Result<BTreeMap<String, ManifestEntry>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(content).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
            hint: None,
        })
    } else {
        serde_json::from_str(content).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
            hint: Some(
                "A manifest is an object of name -> {\"repo\", \"version\"} entries".to_string(),
            ),
        })
    }
}

fn resolve_entry(
    name: &str,
    entry: ManifestEntry,
    path: &Path,
    install_root: &Path,
) -> Result<Dependency> {
    if entry.repo.trim().is_empty() {
        return Err(Error::ManifestParse {
            path: path.to_path_buf(),
            message: format!("dependency '{}' has an empty repo", name),
            hint: Some("Set \"repo\" to the repository URL".to_string()),
        });
    }
    if entry.version.trim().is_empty() {
        return Err(Error::ManifestParse {
            path: path.to_path_buf(),
            message: format!("dependency '{}' has an empty version", name),
            hint: Some("Set \"version\" to a tag, branch or commit".to_string()),
        });
    }
    // Both values end up as VCS command-line arguments
    for (field, value) in [("repo", &entry.repo), ("version", &entry.version)] {
        if value.starts_with('-') {
            return Err(Error::ManifestParse {
                path: path.to_path_buf(),
                message: format!(
                    "dependency '{}' has a {} starting with '-': {}",
                    name, field, value
                ),
                hint: Some(format!(
                    "A {} cannot look like a command-line option",
                    field
                )),
            });
        }
    }

    let relative = match &entry.alias {
        Some(alias) => alias_path(alias).ok_or_else(|| Error::ManifestParse {
            path: path.to_path_buf(),
            message: format!("dependency '{}' has an invalid alias '{}'", name, alias),
            hint: Some(
                "Aliases must be relative paths inside the install root, without ':' or a leading '-'"
                    .to_string(),
            ),
        })?,
        None => repo_relative_path(&entry.repo)?,
    };

    Ok(Dependency {
        name: name.to_string(),
        repo: entry.repo,
        version: entry.version,
        install_path: install_root.join(relative),
        vcs: entry.vcs,
    })
}

/// Validate an alias, returning it as a relative path.
///
/// Components must not start with `-` or contain `:`, so the clone target can
/// never be read as an option or a remote location.
fn alias_path(alias: &str) -> Option<PathBuf> {
    let path = Path::new(alias);
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                let text = part.to_str()?;
                if text.starts_with('-') || text.contains(':') {
                    return None;
                }
                out.push(part)
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Derive an install path (relative to the install root) from a repository
/// location.
///
/// Handles URLs (`https://host/owner/name.git`), scp-style locations
/// (`git@host:owner/name.git`) and plain filesystem paths.
pub fn repo_relative_path(repo: &str) -> Result<PathBuf> {
    let invalid = |message: &str| Error::InvalidRepo {
        repo: repo.to_string(),
        message: message.to_string(),
    };

    let mut segments: Vec<String> = Vec::new();

    if repo.contains("://") {
        let url = Url::parse(repo)?;
        if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
            segments.push(host.to_string());
        }
        if let Some(path_segments) = url.path_segments() {
            segments.extend(path_segments.map(str::to_string));
        }
    } else if let Some((user_host, path)) = split_scp(repo) {
        let host = user_host.rsplit('@').next().unwrap_or(user_host);
        segments.push(host.to_string());
        segments.extend(path.split('/').map(str::to_string));
    } else {
        for component in Path::new(repo).components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::ParentDir => return Err(invalid("'..' is not allowed")),
                _ => {}
            }
        }
    }

    segments.retain(|s| !s.is_empty() && s != ".");
    if segments.iter().any(|s| s == "..") {
        return Err(invalid("'..' is not allowed"));
    }

    if let Some(last) = segments.last_mut() {
        if let Some(stripped) = last.strip_suffix(".git") {
            *last = stripped.to_string();
        }
    }
    segments.retain(|s| !s.is_empty());

    if segments.is_empty() {
        return Err(invalid("no path to install to"));
    }

    Ok(segments.iter().collect())
}

/// Split `user@host:path` into its host and path halves.
fn split_scp(repo: &str) -> Option<(&str, &str)> {
    let (user_host, path) = repo.split_once(':')?;
    // `C:\...` style drive letters are paths, not hosts
    if user_host.len() <= 1 || user_host.contains('/') || path.starts_with('\\') {
        return None;
    }
    Some((user_host, path.trim_start_matches('/')))
}
