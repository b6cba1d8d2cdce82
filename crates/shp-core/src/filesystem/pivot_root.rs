//! Root filesystem switching via `pivot_root(2)`.
//!
//! More secure than `chroot` because it actually changes the root mount
//! point rather than just the process's view of `/`. The kernel requires the
//! new root to be a mount point distinct from the current root; when it is
//! not, the swap fails with `EINVAL` and the caller falls back to `chroot`.

use std::path::{Path, PathBuf};

use shp_common::constants::OLD_ROOT_DIR;
#[cfg(target_os = "linux")]
use shp_common::constants::OLD_ROOT_MODE;
use shp_common::error::ShpError;

/// Name used in logs and errors for this strategy.
pub const STRATEGY_NAME: &str = "pivot_root";

/// Failures of the best-effort steps that run after the root is swapped.
///
/// Neither failure undoes the swap; they are kept for diagnostics only.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Lazy unmount of the previous root failed.
    pub detach_error: Option<std::io::Error>,
    /// Removing the holding directory failed.
    pub remove_error: Option<std::io::Error>,
}

impl CleanupReport {
    /// Returns `true` if both cleanup steps succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.detach_error.is_none() && self.remove_error.is_none()
    }
}

/// Path of the holding directory for the previous root, inside `new_root`.
#[must_use]
pub fn put_old_path(new_root: &Path) -> PathBuf {
    new_root.join(OLD_ROOT_DIR)
}

/// A failed root swap.
#[derive(Debug)]
pub struct SwapError {
    /// What went wrong.
    pub error: ShpError,
    /// Whether `pivot_root(2)` had already replaced the root when the
    /// failure happened. No other strategy may run on top of a changed root.
    pub root_changed: bool,
}

#[cfg(target_os = "linux")]
fn failure(
    operation: impl Into<String>,
    source: std::io::Error,
    root_changed: bool,
) -> SwapError {
    SwapError {
        error: ShpError::Isolation {
            strategy: STRATEGY_NAME,
            operation: operation.into(),
            source,
        },
        root_changed,
    }
}

/// Makes `rootfs` the root of the calling process with `pivot_root(2)`.
///
/// The previous root is parked under [`OLD_ROOT_DIR`], the working directory
/// is moved to the new `/`, and the old root is then lazily detached and its
/// holding directory removed. Those last two steps are best-effort and are
/// reported through the returned [`CleanupReport`].
///
/// # Errors
///
/// Returns a [`SwapError`] if the path cannot be made absolute, the holding
/// directory cannot be created, or `pivot_root(2)` or `chdir(2)` fail. Only
/// the `chdir(2)` failure leaves the root changed.
#[cfg(target_os = "linux")]
pub fn pivot_root(rootfs: &Path) -> Result<CleanupReport, SwapError> {
    use std::os::unix::fs::DirBuilderExt;

    use nix::mount::{MntFlags, umount2};
    use nix::unistd::chdir;

    let new_root = std::path::absolute(rootfs)
        .map_err(|e| failure(format!("resolving absolute path of {}", rootfs.display()), e, false))?;

    let put_old = put_old_path(&new_root);
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(OLD_ROOT_MODE)
        .create(&put_old)
        .map_err(|e| failure(format!("creating {}", put_old.display()), e, false))?;

    tracing::debug!(new_root = %new_root.display(), put_old = %put_old.display(), "performing pivot_root");
    nix::unistd::pivot_root(&new_root, &put_old)
        .map_err(|e| failure("swapping root", e.into(), false))?;
    chdir("/").map_err(|e| failure("chdir to / after pivot_root", e.into(), true))?;

    let old_root = Path::new("/").join(OLD_ROOT_DIR);
    let mut report = CleanupReport::default();

    if let Err(e) = umount2(&old_root, MntFlags::MNT_DETACH) {
        tracing::warn!(path = %old_root.display(), error = %e, "unmounting old root failed");
        report.detach_error = Some(e.into());
    }
    if let Err(e) = std::fs::remove_dir(&old_root) {
        tracing::warn!(path = %old_root.display(), error = %e, "removing old root directory failed");
        report.remove_error = Some(e);
    }

    tracing::info!(rootfs = %new_root.display(), "root swapped with pivot_root");
    Ok(report)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: `pivot_root(2)` requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn pivot_root(_rootfs: &Path) -> Result<CleanupReport, SwapError> {
    Err(SwapError {
        error: ShpError::Unsupported {
            operation: STRATEGY_NAME,
        },
        root_changed: false,
    })
}
