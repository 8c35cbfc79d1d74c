//! mkshare: share makefiles between projects through a git repository.
//!
//! # Usage
//!
//! ```text
//! mkshare install --repo <owner/repo|url|path> [--include <dir>] [--only a,b] [--force]
//! mkshare pull    --repo <...> [--force]
//! mkshare push    --repo <...> [--message <msg>]
//! mkshare list    --repo <...> [--long | --json]
//! mkshare version
//! ```
//!
//! Every option can also come from `.mkshare.yaml` in the working directory.

mod commands;
mod context;
mod logging;
mod reporter;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use commands::{list::ListArgs, push::PushArgs};
use mkshare_core::{Overrides, Reporter, Verbosity, FAILURE_EXIT};
use mkshare_sync::SyncError;
use reporter::TerminalReporter;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mkshare",
    version,
    about = "Install, update and publish shared makefiles kept in a git repository",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Repository to get makefiles from (`owner/repo`, a git URL, or a local path).
    #[arg(long, short = 'r', global = true)]
    pub repo: Option<String>,

    /// Directory to store shared makefiles in [default: include].
    #[arg(long, global = true)]
    pub include: Option<PathBuf>,

    /// Root makefile that includes the shared ones [default: Makefile].
    #[arg(long, global = true)]
    pub makefile: Option<PathBuf>,

    /// Branch to use in the makefile repository [default: master].
    #[arg(long, short = 'b', global = true)]
    pub branch: Option<String>,

    /// Overwrite local files regardless of their state.
    #[arg(long, short = 'f', global = true)]
    pub force: bool,

    /// Only handle the given makefiles, comma separated (`.mk` optional).
    #[arg(long, short = 'o', global = true)]
    pub only: Option<String>,

    /// Where mirrors of remote repositories are kept [default: ~/.cache/mkshare].
    #[arg(long, global = true, env = "MKSHARE_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Seconds a git command may run before it is killed [default: 30].
    #[arg(long, global = true, env = "MKSHARE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Be rather quiet.
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Produce more output.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Produce debug-level output.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity {
            quiet: self.quiet,
            verbose: self.verbose,
            debug: self.debug,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            repo: self.repo.clone(),
            include: self.include.clone(),
            makefile: self.makefile.clone(),
            branch: self.branch.clone(),
            only: self.only.clone(),
            force: self.force,
            cache_dir: self.cache_dir.clone(),
            timeout_secs: self.timeout,
            verbosity: self.verbosity(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy shared makefiles into the project and write the root makefile.
    Install,

    /// Update installed makefiles from the remote repository.
    Pull,

    /// Publish new and locally edited makefiles to the remote repository.
    Push(PushArgs),

    /// List the makefiles available in the remote repository.
    List(ListArgs),

    /// Print the version.
    Version,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.global.verbosity();
    logging::init(verbosity);
    let reporter = TerminalReporter::new(verbosity);

    match run(cli, &reporter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => exit_for(&err, &reporter),
    }
}

fn run(cli: Cli, reporter: &TerminalReporter) -> Result<()> {
    match cli.command {
        Commands::Install => commands::install::run(&cli.global, reporter),
        Commands::Pull => commands::pull::run(&cli.global, reporter),
        Commands::Push(args) => args.run(&cli.global, reporter),
        Commands::List(args) => args.run(&cli.global, reporter),
        Commands::Version => commands::version::run(),
    }
}

/// User errors go through the reporter; anything else is fatal.
fn exit_for(err: &anyhow::Error, reporter: &TerminalReporter) -> ExitCode {
    match err.downcast_ref::<SyncError>() {
        Some(sync) if sync.is_user_error() => ExitCode::from(reporter.error(&sync.to_string())),
        _ => {
            tracing::debug!("fatal: {err:?}");
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(FAILURE_EXIT)
        }
    }
}
