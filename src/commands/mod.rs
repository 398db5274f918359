//! # CLI Command Implementations
//!
//! Each subcommand of the `tributary` command-line tool lives in its own
//! file with:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `tributary` library to do the work.

pub mod completions;
pub mod install;
pub mod tree;
