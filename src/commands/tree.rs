//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which displays the
//! dependency tree of a project as it is currently installed.
//!
//! ## Functionality
//!
//! - **Nested manifests**: for each dependency whose working copy exists, the
//!   manifest inside it is read and shown as children.
//! - **Duplicates and conflicts**: entries are admitted in the same depth-first
//!   order the installer uses, so a repeated repository is marked
//!   `(duplicate)` and a disagreeing version is marked as a conflict.
//! - **Depth Control**: `--depth` limits how many levels are expanded.
//!
//! This command is a safe, read-only operation. It never runs VCS commands and
//! never clones anything that is missing.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use ptree::{print_tree, TreeItem};

use tributary::defaults::default_install_root;
use tributary::discovery::find_manifest;
use tributary::manifest::{self, DependencyManifest, DEPS_FILE};
use tributary::output::OutputConfig;
use tributary::suggestions;
use tributary::tracker::{Admission, ConflictTracker};

/// Display the installed dependency tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Path to the manifest file.
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TRIBUTARY_MANIFEST",
        default_value = DEPS_FILE
    )]
    pub manifest: PathBuf,

    /// Directory dependencies are installed into.
    #[arg(long, value_name = "DIR", env = "TRIBUTARY_ROOT")]
    pub install_root: Option<PathBuf>,

    /// Maximum depth to display in the tree.
    ///
    /// 0 shows only the manifest's own dependencies, 1 adds theirs, etc.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, out: &OutputConfig) -> Result<()> {
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

    let root = build_tree(
        &args.manifest,
        &deps,
        &install_root,
        args.depth.unwrap_or(usize::MAX),
    );

    println!(
        "{}",
        out.heading(&format!("Dependency tree for: {}", args.manifest.display()))
    );
    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    Ok(())
}

/// Build the display tree for a top-level manifest.
fn build_tree(
    manifest_path: &Path,
    deps: &DependencyManifest,
    install_root: &Path,
    max_depth: usize,
) -> TreeNode {
    let mut tracker = ConflictTracker::new();
    TreeNode {
        label: manifest_path.display().to_string(),
        children: build_children(deps, install_root, &mut tracker, max_depth, 0),
    }
}

fn build_children(
    deps: &DependencyManifest,
    install_root: &Path,
    tracker: &mut ConflictTracker,
    max_depth: usize,
    depth: usize,
) -> Vec<TreeNode> {
    let mut nodes = Vec::with_capacity(deps.len());

    for dep in deps.iter() {
        let base = format!("{} @ {} ({})", dep.name, dep.version, dep.repo);

        let installed = match tracker.admit(dep) {
            Admission::Fresh => base,
            Admission::DuplicateSkip => {
                nodes.push(TreeNode::leaf(format!("{} (duplicate)", base)));
                continue;
            }
            Admission::Conflict { installed } => {
                nodes.push(TreeNode::leaf(format!(
                    "{} (conflict: {} already required)",
                    base, installed
                )));
                continue;
            }
        };

        if !dep.install_path.exists() {
            nodes.push(TreeNode::leaf(format!("{} (not installed)", installed)));
            continue;
        }

        if depth >= max_depth {
            nodes.push(TreeNode::leaf(installed));
            continue;
        }

        let children = match find_manifest(&dep.install_path, install_root) {
            None => Vec::new(),
            Some(path) => match manifest::read(&path, install_root) {
                Ok(nested) => build_children(&nested, install_root, tracker, max_depth, depth + 1),
                Err(e) => vec![TreeNode::leaf(format!(
                    "(unreadable manifest {}: {})",
                    path.display(),
                    e
                ))],
            },
        };

        nodes.push(TreeNode {
            label: installed,
            children,
        });
    }

    nodes
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}
