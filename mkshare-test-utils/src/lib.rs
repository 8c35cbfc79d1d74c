//! Shared test utilities for the mkshare workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`fixtures`]: artifacts with fixed mtimes, tree copies and snapshots
//! - [`fake`]: [`FakeTransport`], an in-process stand-in for git
//! - [`reporter`]: [`RecordingReporter`], captures user-facing messages

pub mod fake;
pub mod fixtures;
pub mod reporter;

pub use fake::{Call, FakeTransport, Step};
pub use reporter::{Level, RecordingReporter};
