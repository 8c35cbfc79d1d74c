//! `mkshare push`: publish local makefiles to the remote.

use anyhow::{Context as _, Result};
use clap::Args;

use mkshare_git::CommitMode;

use crate::context::Context;
use crate::reporter::TerminalReporter;
use crate::GlobalArgs;

/// Arguments for `mkshare push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Commit message; without it git opens an editor.
    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

impl PushArgs {
    pub fn run(self, global: &GlobalArgs, reporter: &TerminalReporter) -> Result<()> {
        let ctx = Context::load(global)?;
        let mode = match self.message {
            Some(msg) => CommitMode::Message(msg),
            None => CommitMode::Interactive,
        };
        let outcome = ctx
            .session(reporter)
            .push(mode)
            .with_context(|| format!("push to {} failed", ctx.settings.remote.raw()))?;

        if outcome.added + outcome.modified > 0 {
            reporter.success("Shared repository updated.");
        }
        Ok(())
    }
}
