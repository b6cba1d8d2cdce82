//! Child role: set up the isolated root and become the target command.
//!
//! The sequence is strictly ordered and stops at the first fatal error:
//! validate the root path, resolve the command, isolate the root, mount
//! `/proc`, and exec.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use shp_common::constants::BIN_DIR;
use shp_common::error::{Result, ShpError};
use shp_common::types::LaunchRequest;
use shp_core::filesystem::{self, mount};
use shp_core::namespace;

/// Checks that `rootfs` resolves to an existing filesystem entry.
///
/// # Errors
///
/// Returns [`ShpError::RootfsNotFound`] if `stat` on the path fails.
pub fn validate_rootfs(rootfs: &Path) -> Result<()> {
    std::fs::metadata(rootfs)
        .map(|_| ())
        .map_err(|e| ShpError::RootfsNotFound {
            path: rootfs.to_path_buf(),
            source: e,
        })
}

/// Resolves `command` to the path that will be executed inside the new root.
///
/// A command containing `/` is kept as is. A bare name is looked up in
/// `/bin`. Neither form is checked for existence; a missing binary shows up
/// as an exec failure.
#[must_use]
pub fn resolve_command_path(command: &str) -> PathBuf {
    if command.contains('/') {
        tracing::warn!(
            command,
            "path resolution for the command will be done based on the new rootfs"
        );
        return PathBuf::from(command);
    }
    tracing::info!(command, "resolving command inside {BIN_DIR} of the new rootfs");
    Path::new(BIN_DIR).join(command)
}

/// Replaces the current process image with `path`, passing `args`.
///
/// `argv[0]` is `path`; the environment and standard streams are inherited.
///
/// # Errors
///
/// Returns [`ShpError::Exec`] if `execv(2)` fails, or [`ShpError::Usage`]
/// if an argument contains a NUL byte.
#[cfg(target_os = "linux")]
pub fn exec_command(path: &Path, args: &[String]) -> Result<Infallible> {
    use std::os::unix::ffi::OsStrExt;

    let argv = crate::process::to_c_args(
        std::iter::once(path.as_os_str().as_bytes().to_vec())
            .chain(args.iter().map(|a| a.clone().into_bytes())),
    )?;
    let Some(program) = argv.first() else {
        return Err(ShpError::usage("empty command path"));
    };

    tracing::debug!(path = %path.display(), args = ?args, "executing target command");
    nix::unistd::execv(program, &argv).map_err(|e| ShpError::Exec {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: the init role only runs on Linux.
#[cfg(not(target_os = "linux"))]
pub fn exec_command(_path: &Path, _args: &[String]) -> Result<Infallible> {
    Err(ShpError::Unsupported { operation: "exec" })
}

/// Runs the whole init sequence for `request`.
///
/// Never returns on success: the process becomes the target command.
///
/// # Errors
///
/// Returns the first fatal error: a missing root path, failure of both
/// isolation strategies, a failed `/proc` mount, or a failed exec.
pub fn init_and_exec(request: &LaunchRequest) -> Result<Infallible> {
    let rootfs = request.root_path();
    validate_rootfs(rootfs)?;
    let command_path = resolve_command_path(request.command());

    if is_namespace_init() {
        if let Err(e) = namespace::mount::make_mount_tree_private() {
            tracing::warn!(error = %e, "could not make mount tree private");
        }
    } else {
        tracing::debug!("not PID 1 of a new namespace, leaving mount propagation unchanged");
    }

    let strategy = filesystem::isolate_root(rootfs)?;
    tracing::debug!(%strategy, "filesystem root isolated");

    mount::mount_proc()?;
    exec_command(&command_path, request.command_args())
}

/// Returns `true` when running as PID 1, i.e. as the init process the
/// launcher cloned into fresh PID and mount namespaces.
fn is_namespace_init() -> bool {
    std::process::id() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_resolves_under_bin() {
        assert_eq!(resolve_command_path("sh"), PathBuf::from("/bin/sh"));
        assert_eq!(resolve_command_path("true"), PathBuf::from("/bin/true"));
    }

    #[test]
    fn absolute_path_is_kept() {
        assert_eq!(
            resolve_command_path("/usr/bin/env"),
            PathBuf::from("/usr/bin/env")
        );
    }

    #[test]
    fn relative_path_with_separator_is_kept() {
        assert_eq!(resolve_command_path("./run.sh"), PathBuf::from("./run.sh"));
        assert_eq!(resolve_command_path("sbin/init"), PathBuf::from("sbin/init"));
    }

    #[test]
    fn existing_directory_passes_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        validate_rootfs(dir.path()).expect("exists");
    }

    #[test]
    fn missing_path_fails_validation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("does-not-exist");
        let err = validate_rootfs(&missing).unwrap_err();
        match err {
            ShpError::RootfsNotFound { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => unreachable!("unexpected error: {other}"),
        }
    }
}
