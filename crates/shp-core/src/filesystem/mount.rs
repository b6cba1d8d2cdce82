//! Mount utilities for container filesystem setup.

use std::path::PathBuf;

use shp_common::constants::{PROC_FS, PROC_TARGET};
use shp_common::error::{Result, ShpError};

/// Arguments of a single `mount(2)` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    /// Mount source (device, or a pseudo-filesystem name).
    pub source: Option<String>,
    /// Mount point, interpreted against the current root.
    pub target: PathBuf,
    /// Filesystem type.
    pub fstype: Option<String>,
    /// Raw `MS_*` flag bits.
    pub flags: libc::c_ulong,
    /// Filesystem-specific options.
    pub data: Option<String>,
}

impl MountSpec {
    /// The process-information filesystem at `/proc`: source and type
    /// `proc`, no flags, no options.
    #[must_use]
    pub fn proc() -> Self {
        Self {
            source: Some(PROC_FS.to_owned()),
            target: PathBuf::from(PROC_TARGET),
            fstype: Some(PROC_FS.to_owned()),
            flags: 0,
            data: None,
        }
    }

    /// Performs the mount.
    ///
    /// # Errors
    ///
    /// Returns [`ShpError::Mount`] if the `mount(2)` syscall fails.
    #[cfg(target_os = "linux")]
    pub fn apply(&self) -> Result<()> {
        use nix::mount::{MsFlags, mount};

        mount(
            self.source.as_deref(),
            &self.target,
            self.fstype.as_deref(),
            MsFlags::from_bits_truncate(self.flags),
            self.data.as_deref(),
        )
        .map_err(|e| ShpError::Mount {
            fstype: self.fstype.clone().unwrap_or_default(),
            target: self.target.clone(),
            source: e.into(),
        })?;
        tracing::info!(
            fstype = self.fstype.as_deref().unwrap_or(""),
            target = %self.target.display(),
            "filesystem mounted"
        );
        Ok(())
    }

    /// Stub for non-Linux platforms.
    ///
    /// # Errors
    ///
    /// Always returns an error: mounting requires Linux.
    #[cfg(not(target_os = "linux"))]
    pub fn apply(&self) -> Result<()> {
        Err(ShpError::Unsupported { operation: "mount" })
    }
}

/// Mounts the process-information filesystem at `/proc` of the current root.
///
/// # Errors
///
/// Returns an error if the `mount(2)` syscall fails.
pub fn mount_proc() -> Result<()> {
    MountSpec::proc().apply()
}
