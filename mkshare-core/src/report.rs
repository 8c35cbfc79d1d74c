//! User-facing output collaborator.
//!
//! The sync engine describes what it does through a [`Reporter`]; whether
//! messages are coloured, hidden by `--quiet`, or shown only with `--debug`
//! is the implementor's business.

/// Exit status used for every reported, non-crashing failure.
pub const FAILURE_EXIT: u8 = 1;

pub trait Reporter {
    /// Regular progress output.
    fn info(&self, msg: &str);

    /// Something the user should notice but that does not stop processing.
    fn notice(&self, msg: &str);

    /// Diagnostic output, shown only in debug mode.
    fn debug(&self, msg: &str);

    /// Report a failure and return the process exit status to use.
    fn error(&self, msg: &str) -> u8;
}
