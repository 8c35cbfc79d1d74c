//! # mkshare-sync
//!
//! Bidirectional synchronization between a remote makefile repository and a
//! project's include directory.
//!
//! Pull direction: [`cache`] → [`artifacts`] → [`planner`] → [`executor`].
//! Push direction: [`cache`] → [`publish`].
//! [`pipeline`] wires these together for each command.

pub mod aggregator;
pub mod artifacts;
pub mod cache;
pub mod change;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod planner;
pub mod publish;

pub use cache::{MirrorHandle, RemoteCache};
pub use change::{ChangeDetector, Freshness, MtimeDetector};
pub use error::SyncError;
pub use executor::ApplySummary;
pub use pipeline::{InstallReport, PullReport, Session};
pub use planner::{ActionKind, PlanMode, SyncAction};
pub use publish::{PublishBatch, PublishOutcome, PublishState, PublishTransaction};
