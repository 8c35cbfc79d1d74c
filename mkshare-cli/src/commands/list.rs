//! `mkshare list`: makefiles available in the remote repository.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local, Utc};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use mkshare_core::Artifact;

use crate::context::Context;
use crate::reporter::TerminalReporter;
use crate::GlobalArgs;

/// Arguments for `mkshare list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Show size and modification time in a table.
    #[arg(long, conflicts_with = "json")]
    pub long: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ArtifactJson {
    name: String,
    path: String,
    size: u64,
    modified: String,
}

#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "size")]
    size: u64,
    #[tabled(rename = "modified")]
    modified: String,
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs, reporter: &TerminalReporter) -> Result<()> {
        let ctx = Context::load(global)?;
        let artifacts = ctx
            .session(reporter)
            .list()
            .with_context(|| format!("listing {} failed", ctx.settings.remote.raw()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&to_json(&artifacts))
                    .context("failed to serialize artifact list")?
            );
        } else if self.long {
            let mut table = Table::new(to_rows(&artifacts));
            table.with(Style::rounded());
            println!("{table}");
        } else {
            for artifact in &artifacts {
                println!("{}", artifact.name);
            }
        }
        Ok(())
    }
}

fn to_json(artifacts: &[Artifact]) -> Vec<ArtifactJson> {
    artifacts
        .iter()
        .map(|a| ArtifactJson {
            name: a.name.to_string(),
            path: a.path.display().to_string(),
            size: a.len,
            modified: DateTime::<Utc>::from(a.modified_at).to_rfc3339(),
        })
        .collect()
}

fn to_rows(artifacts: &[Artifact]) -> Vec<ArtifactRow> {
    artifacts
        .iter()
        .map(|a| ArtifactRow {
            name: a.name.to_string(),
            size: a.len,
            modified: DateTime::<Local>::from(a.modified_at)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        })
        .collect()
}
