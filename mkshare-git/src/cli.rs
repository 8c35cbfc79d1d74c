//! [`VersionControl`] backed by the `git` command-line client.
//!
//! Output policy:
//! - stdout is inherited, or discarded when `quiet`
//! - stderr is discarded unless `debug` or the command is interactive
//! - stdin is only attached for interactive commands
//!
//! Non-interactive commands are polled until they exit or the timeout
//! elapses; a command that outlives the timeout is killed and reported as
//! [`GitError::TimedOut`]. Interactive commands wait for the user.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::error::GitError;
use crate::transport::{CommitMode, VersionControl};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `git` subprocesses with a per-command timeout.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    timeout: Duration,
    quiet: bool,
    debug: bool,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout,
            quiet: false,
            debug: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Use a different executable instead of `git` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    fn command_line(&self, args: &[OsString]) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn run(&self, cwd: Option<&Path>, args: &[OsString], interactive: bool) -> Result<(), GitError> {
        let line = self.command_line(args);
        match cwd {
            Some(dir) => tracing::debug!("exec (in {}): {line}", dir.display()),
            None => tracing::debug!("exec: {line}"),
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd.stdout(if self.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        });
        cmd.stderr(if self.debug || interactive {
            Stdio::inherit()
        } else {
            Stdio::null()
        });
        if interactive {
            cmd.stdin(Stdio::inherit());
        } else {
            cmd.stdin(Stdio::null());
            cmd.env("GIT_TERMINAL_PROMPT", "0");
        }

        let status = if interactive {
            cmd.status().map_err(|source| GitError::Spawn {
                command: line.clone(),
                source,
            })?
        } else {
            self.wait_with_timeout(&mut cmd, &line)?
        };

        if status.success() {
            Ok(())
        } else {
            Err(GitError::Failed {
                command: line,
                dir: cwd.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")),
                status: status.to_string(),
            })
        }
    }

    fn wait_with_timeout(&self, cmd: &mut Command, line: &str) -> Result<ExitStatus, GitError> {
        let spawn_err = |source| GitError::Spawn {
            command: line.to_owned(),
            source,
        };
        let mut child = cmd.spawn().map_err(spawn_err)?;
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait().map_err(spawn_err)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::TimedOut {
                    command: line.to_owned(),
                    timeout: self.timeout,
                });
            }
            sleep(POLL_INTERVAL);
        }
    }
}

fn os_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

impl VersionControl for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path, branch: &str) -> Result<(), GitError> {
        let mut args = os_args(["clone", "--branch", branch, url]);
        args.push(dest.as_os_str().to_os_string());
        self.run(None, &args, false)
    }

    fn force_checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.run(Some(repo), &os_args(["checkout", "--force", branch]), false)
    }

    fn force_rebase_pull(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.run(
            Some(repo),
            &os_args(["pull", "--force", "--rebase", "origin", branch]),
            false,
        )
    }

    fn stage(&self, repo: &Path, paths: &[PathBuf]) -> Result<(), GitError> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = os_args(["add", "--"]);
        args.extend(paths.iter().map(|p| p.as_os_str().to_os_string()));
        self.run(Some(repo), &args, false)
    }

    fn commit(&self, repo: &Path, mode: &CommitMode) -> Result<(), GitError> {
        match mode {
            CommitMode::Interactive => self.run(Some(repo), &os_args(["commit", "-v"]), true),
            CommitMode::Message(msg) => {
                self.run(Some(repo), &os_args(["commit", "-m", msg.as_str()]), false)
            }
        }
    }

    fn push(&self, repo: &Path, branch: &str) -> Result<(), GitError> {
        self.run(Some(repo), &os_args(["push", "origin", branch]), false)
    }

    fn discard_last_commit(&self, repo: &Path) -> Result<(), GitError> {
        self.run(Some(repo), &os_args(["reset", "--soft", "HEAD~1"]), false)
    }

    fn reset_and_clean(&self, repo: &Path, subdir: &Path) -> Result<(), GitError> {
        // Every step runs even if an earlier one failed; the first error wins.
        let steps = [
            os_args([OsStr::new("reset"), OsStr::new("--"), subdir.as_os_str()]),
            os_args([OsStr::new("checkout"), OsStr::new("--"), subdir.as_os_str()]),
            os_args([
                OsStr::new("clean"),
                OsStr::new("-df"),
                OsStr::new("--"),
                subdir.as_os_str(),
            ]),
        ];
        let mut first_err = None;
        for args in &steps {
            if let Err(err) = self.run(Some(repo), args, false) {
                tracing::warn!("rollback step failed: {err}");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
