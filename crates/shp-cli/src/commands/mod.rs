//! CLI command definitions and dispatch.

pub mod child;
pub mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shp_common::config::{LogFormat, ShpConfig};
use shp_common::constants::{BIN_NAME, DEFAULT_LOG_FILTER, LOG_FILTER_ENV, LOG_FORMAT_ENV};
use shp_common::error::Result;
use shp_common::types::LaunchRequest;

/// shp — run a command inside an isolated root filesystem.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log filter directive (e.g. `info`, `shp_core=debug`).
    ///
    /// Use the environment variable to also configure the re-executed init
    /// process.
    #[arg(long, global = true, env = LOG_FILTER_ENV, default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format: `text` or `json`.
    #[arg(long, global = true, env = LOG_FORMAT_ENV, default_value = "text")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Runtime configuration derived from the global options.
    #[must_use]
    pub fn config(&self) -> ShpConfig {
        ShpConfig {
            log_filter: self.log_filter.clone(),
            log_format: self.log_format,
        }
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command in new namespaces with an isolated root filesystem.
    Run(run::RunArgs),
    /// Set up the isolated root and exec the command (used by `run`).
    Child(child::ChildArgs),
}

/// Root filesystem and command shared by `run` and `child`.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Path to the container's root filesystem.
    pub rootfs: PathBuf,

    /// Command to run; a bare name is looked up in `/bin` of the rootfs.
    pub command: String,

    /// Arguments passed to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl TargetArgs {
    /// Builds the validated launch request.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the rootfs path or command is empty.
    pub fn into_request(self) -> Result<LaunchRequest> {
        LaunchRequest::new(self.rootfs, self.command, self.args)
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Run(args) => run::execute(args),
        Command::Child(args) => child::execute(args),
    }
}
