//! # Staleness Policy
//!
//! Fetching every dependency on every install is slow, so the installer only
//! fetches (and fast-forwards) repositories whose local copy is considered
//! stale. Everything else is checked out from refs that are already present.
//!
//! ## Key Components
//!
//! - **`StalenessPolicy`**: the trait the installer consumes. It only needs a
//!   yes/no answer per repository.
//! - **`TimeLock`**: the default policy. It remembers when each repository was
//!   last fetched in a small JSON file and calls a repository stale once that
//!   record is older than a threshold (one hour by default).
//!
//! ## Consistency
//!
//! A `TimeLock` decides once per repository per run. Asking again returns the
//! same answer even though the first "stale" answer already refreshed the
//! stored timestamp. The file on disk only changes when `save` is called.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default age after which a repository is fetched again.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

/// Decides whether a repository's local copy needs a fetch/update cycle.
pub trait StalenessPolicy {
    /// Whether `repo` should be fetched during this run.
    fn is_stale(&mut self, repo: &str) -> bool;

    /// Called when a fetch for a stale `repo` failed, so that the next run
    /// tries again instead of trusting a refreshed timestamp.
    fn fetch_failed(&mut self, _repo: &str) {}
}

/// On-disk layout of the timelock file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TimeLockFile {
    /// Repository -> last fetch time in seconds since the Unix epoch.
    #[serde(default)]
    fetched: BTreeMap<String, u64>,
}

/// Timestamp-based staleness policy persisted as JSON.
#[derive(Debug)]
pub struct TimeLock {
    path: Option<PathBuf>,
    stale_after: Duration,
    now: u64,
    fetched: BTreeMap<String, u64>,
    decided: HashMap<String, bool>,
}

impl TimeLock {
    /// Load the timelock file at `path`.
    ///
    /// A missing file is an empty cache. A file that cannot be parsed is
    /// logged and also treated as empty; it is overwritten on the next `save`.
    pub fn load(path: impl Into<PathBuf>, stale_after: Duration) -> Self {
        let path = path.into();
        let fetched = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<TimeLockFile>(&content) {
                Ok(file) => file.fetched,
                Err(e) => {
                    warn!(
                        "Ignoring unreadable staleness cache {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read staleness cache {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            stale_after,
            now: unix_now(),
            fetched,
            decided: HashMap::new(),
        }
    }

    /// A timelock that is never written to disk.
    pub fn in_memory(stale_after: Duration) -> Self {
        Self {
            path: None,
            stale_after,
            now: unix_now(),
            fetched: BTreeMap::new(),
            decided: HashMap::new(),
        }
    }

    /// Evaluate staleness as if the current time were `now`.
    pub fn with_now(mut self, now: SystemTime) -> Self {
        self.now = to_unix(now);
        self
    }

    /// Record that `repo` was fetched at `at`.
    pub fn record(&mut self, repo: &str, at: SystemTime) {
        self.fetched.insert(repo.to_string(), to_unix(at));
    }

    /// Forget every stored timestamp so that every repository is stale.
    pub fn clear(&mut self) {
        self.fetched.clear();
        self.decided.clear();
    }

    /// When `repo` was last fetched, as currently known.
    pub fn last_fetched(&self, repo: &str) -> Option<SystemTime> {
        self.fetched
            .get(repo)
            .map(|secs| UNIX_EPOCH + Duration::from_secs(*secs))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the timestamps back to disk. A no-op for in-memory timelocks.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let to_cache_error = |message: String| Error::StaleCache {
            path: path.clone(),
            message,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| to_cache_error(e.to_string()))?;
        }

        let file = TimeLockFile {
            fetched: self.fetched.clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content).map_err(|e| to_cache_error(e.to_string()))?;
        debug!("Saved staleness cache to {}", path.display());
        Ok(())
    }
}

impl StalenessPolicy for TimeLock {
    fn is_stale(&mut self, repo: &str) -> bool {
        if let Some(decision) = self.decided.get(repo) {
            return *decision;
        }

        let stale = match self.fetched.get(repo) {
            None => true,
            Some(last) => self.now.saturating_sub(*last) >= self.stale_after.as_secs(),
        };
        if stale {
            self.fetched.insert(repo.to_string(), self.now);
        }

        self.decided.insert(repo.to_string(), stale);
        stale
    }

    fn fetch_failed(&mut self, repo: &str) {
        self.fetched.remove(repo);
    }
}

fn unix_now() -> u64 {
    to_unix(SystemTime::now())
}

fn to_unix(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
