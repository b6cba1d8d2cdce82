//! Container launch protocol for shp.
//!
//! A launch runs the same executable twice. The [`launcher`] clones a new
//! process into fresh UTS, PID, and mount namespaces and re-executes itself
//! there in the `child` role; the [`init`] role isolates the filesystem
//! root, mounts `/proc`, and replaces itself with the target command.

#![allow(unsafe_code)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod init;
pub mod launcher;
pub mod process;

use shp_common::error::Result;
use shp_common::types::LaunchRequest;

/// Role this invocation of the executable plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMode {
    /// Parent role: create namespaces and wait for the init process.
    Launcher(LaunchRequest),
    /// Child role: isolate, mount `/proc`, and exec the target command.
    Init(LaunchRequest),
}

impl LaunchMode {
    /// Runs the role to completion.
    ///
    /// For [`LaunchMode::Launcher`] this returns the init process's exit
    /// code. [`LaunchMode::Init`] only returns on failure, since success
    /// replaces the process image.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of the role.
    pub fn run(self) -> Result<u8> {
        match self {
            Self::Launcher(request) => launcher::launch(&request),
            Self::Init(request) => {
                let never = init::init_and_exec(&request)?;
                match never {}
            }
        }
    }
}
