//! # Install Command Implementation
//!
//! This module implements the `install` subcommand, the main operation of
//! `tributary`. It reads the project manifest, installs every dependency with
//! the system VCS tools, and recurses into manifests found inside the
//! installed dependencies.
//!
//! ## Process
//!
//! 1.  **Load**: read the manifest and resolve install paths against the
//!     install root (`vendor/` next to the manifest unless overridden).
//! 2.  **Staleness**: load the timestamp cache that decides which
//!     dependencies need a fetch. `--clear-cache` makes every one stale.
//! 3.  **Install**: run the recursive install. Progress is logged per
//!     dependency, indented by nesting depth.
//! 4.  **Persist**: write the timestamp cache back, even when the run stopped
//!     on a version conflict.
//! 5.  **Summarize**: print counts of installed and skipped dependencies and
//!     every recorded error.
//!
//! The command exits non-zero on a version conflict or when any dependency
//! failed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use log::{warn, LevelFilter};

use tributary::config::InstallConfig;
use tributary::defaults::{default_cache_file, default_install_root};
use tributary::install::{install, InstallReport};
use tributary::manifest::{self, DEPS_FILE};
use tributary::output::{Marker, OutputConfig};
use tributary::staleness::{TimeLock, DEFAULT_STALE_AFTER};
use tributary::suggestions;
use tributary::vcs::SystemVcs;

/// Install dependencies listed in a manifest
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Path to the manifest file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TRIBUTARY_MANIFEST",
        default_value = DEPS_FILE
    )]
    pub manifest: PathBuf,

    /// Directory to install dependencies into.
    ///
    /// Defaults to `vendor/` next to the manifest.
    #[arg(long, value_name = "DIR", env = "TRIBUTARY_ROOT")]
    pub install_root: Option<PathBuf>,

    /// Discard local modifications in each dependency before checkout
    #[arg(long)]
    pub clean: bool,

    /// Do not install dependencies declared by installed dependencies
    #[arg(long)]
    pub no_recurse: bool,

    /// How long fetched history stays fresh (e.g., '30m', '1h', '2d')
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub stale_after: Option<Duration>,

    /// Forget all fetch timestamps so every dependency is fetched
    #[arg(long)]
    pub clear_cache: bool,

    /// Location of the fetch timestamp cache.
    ///
    /// Defaults to `tributary/timelock.json` in the system cache directory.
    #[arg(long, value_name = "FILE", env = "TRIBUTARY_CACHE")]
    pub cache_file: Option<PathBuf>,

    /// Only print warnings, errors and the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `install` command.
pub fn execute(args: InstallArgs, out: &OutputConfig) -> Result<()> {
    if !args.manifest.exists() {
        return Err(suggestions::manifest_not_found(&args.manifest));
    }

    let install_root = args
        .install_root
        .clone()
        .unwrap_or_else(|| default_install_root(&args.manifest));

    let deps = manifest::read(&args.manifest, &install_root).with_context(|| {
        format!(
            "Failed to load manifest from {}",
            args.manifest.display()
        )
    })?;

    let config = InstallConfig::new(install_root)
        .with_clean(args.clean)
        .with_recurse(!args.no_recurse);

    let cache_file = args.cache_file.unwrap_or_else(default_cache_file);
    let mut timelock = TimeLock::load(cache_file, args.stale_after.unwrap_or(DEFAULT_STALE_AFTER));
    if args.clear_cache {
        timelock.clear();
    }

    if args.quiet {
        log::set_max_level(LevelFilter::Warn);
    } else {
        eprintln!("{}", out.heading("Installing:"));
    }

    let vcs = SystemVcs::new();
    let result = install(&deps, &config, &vcs, &mut timelock);

    if let Err(e) = timelock.save() {
        warn!("Could not save fetch timestamps: {}", e);
    }

    let report = result.map_err(suggestions::version_conflict)?;
    print_summary(&report, out);

    if report.has_errors() {
        return Err(suggestions::install_incomplete(report.errors.len()));
    }
    Ok(())
}

fn print_summary(report: &InstallReport, out: &OutputConfig) {
    println!();
    println!(
        "{} Installed {} dependencies",
        out.marker(Marker::Success),
        report.installed.len()
    );
    if !report.skipped.is_empty() {
        println!(
            "{} Skipped {} repeated dependencies",
            out.marker(Marker::Skipped),
            report.skipped.len()
        );
    }
    for error in &report.errors {
        println!("{} {}", out.marker(Marker::Failure), error);
    }
}

/// Parse a duration string like "30s", "15m", "1h", "2d", "1w".
fn parse_duration(duration_str: &str) -> Result<Duration> {
    let duration_str = duration_str.trim().to_lowercase();

    if duration_str.is_empty() {
        return Err(anyhow::anyhow!("Duration string cannot be empty"));
    }

    let split_idx = duration_str
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(duration_str.len());

    if split_idx == 0 {
        return Err(anyhow::anyhow!("Duration must start with a number"));
    }

    let (number_str, unit_str) = duration_str.split_at(split_idx);

    let number: f64 = number_str
        .parse()
        .with_context(|| format!("Invalid number in duration: '{}'", number_str))?;

    let seconds = match unit_str {
        "" | "s" | "sec" | "second" | "seconds" => number,
        "m" | "min" | "minute" | "minutes" => number * 60.0,
        "h" | "hr" | "hour" | "hours" => number * 3600.0,
        "d" | "day" | "days" => number * 86400.0,
        "w" | "week" | "weeks" => number * 604800.0,
        _ => {
            return Err(anyhow::anyhow!(
                "Invalid duration unit: '{}'. Valid units: s, m, h, d, w",
                unit_str
            ));
        }
    };

    Ok(Duration::from_secs(seconds as u64))
}
