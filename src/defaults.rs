//! Default values for tributary configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Directory name dependencies are installed into, next to the manifest.
pub const DEFAULT_INSTALL_DIR: &str = "vendor";

/// File name of the staleness cache inside the cache directory.
pub const TIMELOCK_FILE: &str = "timelock.json";

/// Returns the default location of the staleness cache file.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/tributary/timelock.json` (XDG Base Directory)
/// - macOS: `~/Library/Caches/tributary/timelock.json`
/// - Windows: `{FOLDERID_LocalAppData}\tributary\timelock.json`
///
/// Falls back to `.tributary-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--cache-file` CLI flag or the
/// `TRIBUTARY_CACHE` environment variable.
pub fn default_cache_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".tributary-cache"))
        .join("tributary")
        .join(TIMELOCK_FILE)
}

/// Returns the default install root for a manifest: `vendor/` next to it.
pub fn default_install_root(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .join(DEFAULT_INSTALL_DIR)
}
