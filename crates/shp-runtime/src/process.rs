//! Process spawning inside new namespaces.
//!
//! The init process is created with `clone(2)` so that it is born inside
//! the requested namespaces, which matters for the PID namespace: only a
//! cloned child becomes PID 1. The child immediately re-executes this
//! binary; all state reaches it through argv and inherited descriptors.

use std::ffi::OsString;

use shp_common::constants::{FAILURE_EXIT_CODE, SIGNAL_EXIT_BASE};
#[cfg(target_os = "linux")]
use shp_common::constants::{CLONE_STACK_SIZE, SELF_EXE};
use shp_common::error::{Result, ShpError};
use shp_core::namespace::NamespaceSet;

/// Converts arguments into the C strings `execv(2)` expects.
///
/// # Errors
///
/// Returns [`ShpError::Usage`] if an argument contains a NUL byte.
pub fn to_c_args<I, S>(args: I) -> Result<Vec<std::ffi::CString>>
where
    I: IntoIterator<Item = S>,
    S: Into<Vec<u8>>,
{
    args.into_iter()
        .map(|arg| {
            std::ffi::CString::new(arg)
                .map_err(|e| ShpError::usage(format!("argument contains a NUL byte: {e}")))
        })
        .collect()
}

/// Maps the final wait status of a child to the exit code to propagate.
///
/// A normal exit keeps its code, death by signal `N` becomes `128 + N`,
/// anything else becomes the fixed failure code.
#[must_use]
pub fn exit_code_from_status(exited: Option<i32>, signal: Option<i32>) -> u8 {
    let code = match (exited, signal) {
        (Some(code), _) => code,
        (None, Some(signal)) => SIGNAL_EXIT_BASE + signal,
        (None, None) => i32::from(FAILURE_EXIT_CODE),
    };
    u8::try_from(code).unwrap_or(FAILURE_EXIT_CODE)
}

/// Clones a child into `namespaces` that re-executes this binary with `args`,
/// then waits for it and returns its exit code.
///
/// Standard streams are inherited unchanged.
///
/// # Errors
///
/// Returns [`ShpError::Namespace`] if `clone(2)` fails (typically for lack
/// of privilege) or if waiting for the child fails.
#[cfg(target_os = "linux")]
pub fn spawn_self_and_wait(args: &[OsString], namespaces: NamespaceSet) -> Result<u8> {
    use std::os::unix::ffi::OsStringExt;

    use nix::errno::Errno;
    use nix::sched::clone;
    use nix::sys::wait::{WaitStatus, waitpid};
    use nix::unistd::execv;

    let exe = std::ffi::CString::new(SELF_EXE)
        .map_err(|e| ShpError::usage(format!("invalid executable path: {e}")))?;
    let argv = to_c_args(
        std::iter::once(OsString::from(SELF_EXE))
            .chain(args.iter().cloned())
            .map(OsStringExt::into_vec),
    )?;

    let mut stack = vec![0_u8; CLONE_STACK_SIZE];
    let callback = Box::new(|| match execv(&exe, &argv) {
        Ok(never) => match never {},
        Err(e) => {
            tracing::error!(exe = SELF_EXE, error = %e, "re-executing self failed");
            isize::from(FAILURE_EXIT_CODE)
        }
    });

    // SAFETY: the child runs on its own stack without CLONE_VM, so it works
    // on a copy of this address space and only calls execv before exiting.
    // The process is single-threaded at this point, so no lock can be held
    // across the clone.
    let pid = unsafe { clone(callback, &mut stack, namespaces.clone_flags(), Some(libc::SIGCHLD)) }
        .map_err(|e| ShpError::Namespace {
            operation: format!("creating {namespaces} namespaces"),
            source: e.into(),
        })?;
    tracing::debug!(pid = pid.as_raw(), "init process started");

    let status = loop {
        match waitpid(pid, None) {
            Err(Errno::EINTR) => {}
            other => break other,
        }
    }
    .map_err(|e| ShpError::Namespace {
        operation: format!("waiting for init process {pid}"),
        source: e.into(),
    })?;

    let code = match status {
        WaitStatus::Exited(_, code) => exit_code_from_status(Some(code), None),
        WaitStatus::Signaled(_, signal, _) => exit_code_from_status(None, Some(signal as i32)),
        _ => exit_code_from_status(None, None),
    };
    tracing::debug!(pid = pid.as_raw(), code, "init process exited");
    Ok(code)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn spawn_self_and_wait(_args: &[OsString], _namespaces: NamespaceSet) -> Result<u8> {
    Err(ShpError::Unsupported {
        operation: "namespace creation",
    })
}
