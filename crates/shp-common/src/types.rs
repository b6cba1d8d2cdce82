//! Domain primitive types used across the shp workspace.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::CHILD_ROLE;
use crate::error::{Result, ShpError};

/// Everything needed to start one isolated command.
///
/// Built once from user input and never mutated. It crosses the process
/// boundary between launcher and init as a flat argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    root_path: PathBuf,
    command: String,
    command_args: Vec<String>,
}

impl LaunchRequest {
    /// Creates a request after checking that the root path and command are non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ShpError::Usage`] if either the root path or the command is empty.
    pub fn new(
        root_path: impl Into<PathBuf>,
        command: impl Into<String>,
        command_args: Vec<String>,
    ) -> Result<Self> {
        let root_path = root_path.into();
        let command = command.into();
        if root_path.as_os_str().is_empty() {
            return Err(ShpError::usage("<rootfs_path> must not be empty"));
        }
        if command.is_empty() {
            return Err(ShpError::usage("<command> must not be empty"));
        }
        Ok(Self {
            root_path,
            command,
            command_args,
        })
    }

    /// Rebuilds a request from `[rootfs_path, command, args...]`.
    ///
    /// The root path is taken byte for byte; the command and its arguments
    /// must be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ShpError::Usage`] if fewer than two arguments are given,
    /// either of the first two is empty, or the command or an argument is not
    /// valid UTF-8.
    pub fn from_child_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let (Some(root), Some(command)) = (args.next(), args.next()) else {
            return Err(ShpError::usage(format!(
                "{CHILD_ROLE} <rootfs_path> <command> [args...]"
            )));
        };
        let command = into_utf8(command)?;
        let command_args = args.map(into_utf8).collect::<Result<Vec<_>>>()?;
        Self::new(root, command, command_args)
    }

    /// Serializes the request into the argument vector of the init process,
    /// role marker first. The root path keeps its exact bytes.
    #[must_use]
    pub fn to_child_args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.command_args.len() + 3);
        args.push(OsString::from(CHILD_ROLE));
        args.push(self.root_path.clone().into_os_string());
        args.push(OsString::from(&self.command));
        args.extend(self.command_args.iter().map(OsString::from));
        args
    }

    /// Root filesystem path as supplied by the caller.
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Target command as supplied by the caller.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments passed to the target command.
    #[must_use]
    pub fn command_args(&self) -> &[String] {
        &self.command_args
    }
}

fn into_utf8(arg: OsString) -> Result<String> {
    arg.into_string().map_err(|arg| {
        ShpError::usage(format!("argument is not valid UTF-8: {}", arg.to_string_lossy()))
    })
}
