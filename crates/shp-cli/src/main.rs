//! # shp — run a command in an isolated root filesystem
//!
//! `shp run <rootfs> <cmd>` re-executes itself as `shp child ...` inside new
//! UTS, PID, and mount namespaces, which swaps the root and execs `<cmd>`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use shp_common::config::LogFormat;
use shp_common::constants::FAILURE_EXIT_CODE;

use crate::commands::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return ExitCode::from(output::report_usage(&err)),
    };
    init_tracing(&cli.config());

    match commands::execute(cli) {
        Ok(code) => code,
        Err(err) => {
            output::report_failure(&err);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

fn init_tracing(config: &shp_common::config::ShpConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(shp_common::constants::DEFAULT_LOG_FILTER)
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
