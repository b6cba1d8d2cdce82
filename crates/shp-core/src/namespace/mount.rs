//! Mount namespace propagation control.
//!
//! A fresh mount namespace inherits the propagation type of the host's
//! mounts. On hosts where `/` is a shared mount, both `pivot_root(2)` and
//! the `/proc` mount would otherwise leak back to the host.

use shp_common::error::{Result, ShpError};

/// Recursively marks every mount in the current namespace as private.
///
/// # Errors
///
/// Returns an error if the `mount(2)` propagation change fails.
#[cfg(target_os = "linux")]
pub fn make_mount_tree_private() -> Result<()> {
    use nix::mount::{MsFlags, mount};

    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_REC | MsFlags::MS_PRIVATE,
        None::<&str>,
    )
    .map_err(|e| ShpError::Mount {
        fstype: "private propagation".into(),
        target: "/".into(),
        source: e.into(),
    })?;
    tracing::debug!("mount tree marked private");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error: mount namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn make_mount_tree_private() -> Result<()> {
    Err(ShpError::Unsupported {
        operation: "mount propagation",
    })
}
