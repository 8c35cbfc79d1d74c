//! # mkshare-git
//!
//! Version-control collaborator for the sync engine.
//!
//! [`VersionControl`] is the narrow interface the engine calls; [`GitCli`]
//! implements it by running the `git` binary with a per-command timeout.

pub mod cli;
pub mod error;
pub mod transport;

pub use cli::GitCli;
pub use error::GitError;
pub use transport::{CommitMode, VersionControl};
