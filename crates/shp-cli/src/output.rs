//! User-facing failure output.
//!
//! Fatal errors and usage errors go to stdout as plain text; there is no
//! machine-readable error format.

use clap::error::ErrorKind;
use shp_common::constants::FAILURE_EXIT_CODE;

/// Prints a fatal error on its own line, preceded by a blank line.
#[allow(clippy::print_stdout)]
pub fn report_failure(err: &anyhow::Error) {
    println!("\n{}", failure_message(err));
}

/// Prints a rejected invocation (or the requested help/version text) and
/// returns the exit code to use.
#[allow(clippy::print_stdout)]
pub fn report_usage(err: &clap::Error) -> u8 {
    print!("{}", err.render());
    usage_exit_code(err.kind())
}

/// `0` when help or version output was requested, the failure code for
/// anything else.
#[must_use]
pub const fn usage_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => FAILURE_EXIT_CODE,
    }
}

/// Text printed for a fatal error.
#[must_use]
pub fn failure_message(err: &anyhow::Error) -> String {
    err.to_string()
}
