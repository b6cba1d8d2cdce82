//! `shp run` — Launch a command in new namespaces.

use std::process::ExitCode;

use clap::Args;
use shp_runtime::LaunchMode;

use super::TargetArgs;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root filesystem and command to run.
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Executes the `run` command.
///
/// Spawns the init process in new UTS, PID, and mount namespaces and exits
/// with its exit code.
///
/// # Errors
///
/// Returns an error if the request is invalid or the namespaces cannot be
/// created.
pub fn execute(args: RunArgs) -> anyhow::Result<ExitCode> {
    let request = args.target.into_request()?;
    let code = LaunchMode::Launcher(request).run()?;
    tracing::debug!(code, "container exited");
    Ok(ExitCode::from(code))
}
