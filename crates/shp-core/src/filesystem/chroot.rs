//! Legacy root isolation via `chroot(2)`.
//!
//! Only changes the apparent root of the calling process; the previous root
//! stays mounted and reachable through other paths. Used when `pivot_root`
//! is not possible, typically because the new root is not a separate mount.

use std::path::Path;

use shp_common::error::{Result, ShpError};

/// Name used in logs and errors for this strategy.
pub const STRATEGY_NAME: &str = "chroot";

/// Changes the apparent root of the calling process to `rootfs` and moves
/// the working directory to its `/`.
///
/// # Errors
///
/// Returns [`ShpError::Isolation`] if `chroot(2)` or `chdir(2)` fails.
#[cfg(target_os = "linux")]
pub fn chroot(rootfs: &Path) -> Result<()> {
    use nix::unistd::chdir;

    nix::unistd::chroot(rootfs).map_err(|e| ShpError::Isolation {
        strategy: STRATEGY_NAME,
        operation: format!("changing root to {}", rootfs.display()),
        source: e.into(),
    })?;
    chdir("/").map_err(|e| ShpError::Isolation {
        strategy: STRATEGY_NAME,
        operation: "chdir to / after chroot".into(),
        source: e.into(),
    })?;
    tracing::info!(rootfs = %rootfs.display(), "using chroot for filesystem isolation");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: the fallback is only wired up on Linux.
#[cfg(not(target_os = "linux"))]
pub fn chroot(_rootfs: &Path) -> Result<()> {
    Err(ShpError::Unsupported {
        operation: STRATEGY_NAME,
    })
}
