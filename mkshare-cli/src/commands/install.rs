//! `mkshare install`: copy shared makefiles in and write the root makefile.

use anyhow::{Context as _, Result};

use crate::context::Context;
use crate::reporter::TerminalReporter;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs, reporter: &TerminalReporter) -> Result<()> {
    let ctx = Context::load(global)?;
    let report = ctx
        .session(reporter)
        .install()
        .with_context(|| format!("install from {} failed", ctx.settings.remote.raw()))?;

    tracing::debug!("install summary: {:?}", report.summary);
    if report.summary.installed == 0 {
        reporter.success(&format!(
            "{} up to date, {} shared makefile(s) included",
            report.root_makefile.display(),
            report.includes.len()
        ));
    }
    Ok(())
}
