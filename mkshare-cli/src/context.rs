//! Per-invocation wiring: resolved settings plus the git runner.

use anyhow::{Context as _, Result};

use mkshare_core::{ProjectConfig, Reporter, Settings};
use mkshare_git::GitCli;
use mkshare_sync::Session;

use crate::GlobalArgs;

pub struct Context {
    pub settings: Settings,
    pub git: GitCli,
}

impl Context {
    /// Resolve command-line options over `.mkshare.yaml` in the working directory.
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("could not determine working directory")?;
        let file = ProjectConfig::load_at(&cwd).context("failed to load project config")?;
        let settings =
            Settings::resolve(global.overrides(), file).context("invalid configuration")?;
        tracing::debug!("resolved settings: {settings:?}");

        let git = GitCli::new(settings.timeout)
            .quiet(settings.verbosity.quiet)
            .debug(settings.verbosity.debug);
        Ok(Self { settings, git })
    }

    pub fn session<'a>(&'a self, reporter: &'a dyn Reporter) -> Session<'a> {
        Session::new(&self.settings, &self.git, reporter)
    }
}
