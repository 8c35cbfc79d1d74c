//! Coloured terminal output honouring `--quiet` and `--debug`.

use colored::Colorize;

use mkshare_core::{Reporter, Verbosity, FAILURE_EXIT};

pub struct TerminalReporter {
    verbosity: Verbosity,
}

impl TerminalReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    /// Completion message, green.
    pub fn success(&self, msg: &str) {
        if !self.verbosity.quiet {
            println!("{}", msg.green());
        }
    }
}

impl Reporter for TerminalReporter {
    fn info(&self, msg: &str) {
        if !self.verbosity.quiet {
            println!("{msg}");
        }
    }

    fn notice(&self, msg: &str) {
        if !self.verbosity.quiet {
            println!("{}", msg.yellow());
        }
    }

    fn debug(&self, msg: &str) {
        if self.verbosity.debug {
            println!("{}", msg.bright_black());
        }
    }

    fn error(&self, msg: &str) -> u8 {
        eprintln!("{}", msg.red());
        FAILURE_EXIT
    }
}
