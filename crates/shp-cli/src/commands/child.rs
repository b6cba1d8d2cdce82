//! `shp child` — Isolate the root filesystem and exec the command.
//!
//! This is what `shp run` re-executes inside the new namespaces, but it can
//! also be invoked directly.

use std::process::ExitCode;

use clap::Args;
use shp_runtime::LaunchMode;

use super::TargetArgs;

/// Arguments for the `child` command.
#[derive(Args, Debug)]
pub struct ChildArgs {
    /// Root filesystem and command to exec.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Executes the `child` command.
///
/// Only returns on failure; on success the process becomes the command.
///
/// # Errors
///
/// Returns an error if validation, isolation, the `/proc` mount, or the
/// exec fails.
pub fn execute(args: ChildArgs) -> anyhow::Result<ExitCode> {
    let request = args.target.into_request()?;
    let code = LaunchMode::Init(request).run()?;
    Ok(ExitCode::from(code))
}
