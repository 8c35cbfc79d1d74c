//! `mkshare pull`: update installed makefiles from the remote.

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::reporter::TerminalReporter;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, reporter: &TerminalReporter) -> Result<()> {
    let ctx = Context::load(global)?;
    let report = ctx
        .session(reporter)
        .pull()
        .with_context(|| format!("pull from {} failed", ctx.settings.remote.raw()))?;
    tracing::debug!("pull summary: {:?}", report.summary);
    Ok(())
}
