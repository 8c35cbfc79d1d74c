//! mkshare core library: domain types, inclusion filter, layout, settings.
//!
//! Public API surface:
//! - [`types`]: artifact and remote newtypes
//! - [`filter`]: [`InclusionFilter`] and name normalization
//! - [`layout`]: fixed directory names and path helpers
//! - [`config`]: `.mkshare.yaml` loading and resolved [`Settings`]
//! - [`report`]: the [`Reporter`] collaborator interface
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod filter;
pub mod layout;
pub mod report;
pub mod types;

pub use config::{Overrides, ProjectConfig, Settings, Verbosity};
pub use error::ConfigError;
pub use filter::InclusionFilter;
pub use report::{Reporter, FAILURE_EXIT};
pub use types::{Artifact, ArtifactName, RemoteId};
