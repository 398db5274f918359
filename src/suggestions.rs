//! # Error Suggestions
//!
//! Helpers that build CLI errors carrying hints: what went wrong and how to
//! fix it.
//!
//! ```rust,ignore
//! // Instead of:
//! anyhow::bail!("Manifest not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

use crate::error::Error;
use crate::manifest::MANIFEST_NAMES;

/// Error for a top-level manifest that does not exist.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest not found: {path}\n\n\
         hint: Create a {name} file listing your dependencies\n\
         hint: Use -m/--manifest to specify a different path\n\
         hint: Set the TRIBUTARY_MANIFEST environment variable",
        path = path.display(),
        name = MANIFEST_NAMES[0]
    )
}

/// Error for an install that ended on a version conflict.
pub fn version_conflict(error: Error) -> anyhow::Error {
    match error {
        Error::VersionConflict {
            ref repo,
            ref installed,
            ref requested,
        } => {
            let hint = format!(
                "hint: Pin every manifest that depends on {repo} to the same version \
                 ({installed} or {requested})"
            );
            anyhow::anyhow!("{error}\n\n{hint}")
        }
        other => anyhow::Error::new(other),
    }
}

/// Error summarizing a run that finished with recoverable failures.
pub fn install_incomplete(error_count: usize) -> anyhow::Error {
    let noun = if error_count == 1 { "error" } else { "errors" };
    anyhow::anyhow!(
        "Install finished with {error_count} {noun}\n\n\
         hint: Re-run with --log-level debug to see every VCS command\n\
         hint: Use --clean to discard local changes that block checkout"
    )
}
