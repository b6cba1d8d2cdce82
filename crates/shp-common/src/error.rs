//! Unified error types for the shp workspace.
//!
//! Variants follow the failure classes of a launch: usage, validation,
//! namespace creation, root isolation, mounting, and process-image
//! replacement. Each carries the operation that failed and its cause.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ShpError {
    /// The invocation was malformed. Nothing has been changed yet.
    #[error("usage: {message}")]
    Usage {
        /// Description of what was missing or wrong.
        message: String,
    },

    /// The root filesystem path does not resolve to an existing entry.
    #[error("rootfs path does not exist: {}: {source}", path.display())]
    RootfsNotFound {
        /// Path that was supplied as the root filesystem.
        path: PathBuf,
        /// Underlying `stat` failure.
        source: std::io::Error,
    },

    /// Creating the namespaces or spawning the init process failed.
    #[error("{operation}: {source}")]
    Namespace {
        /// Operation that failed (clone, wait, ...).
        operation: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A root isolation strategy failed.
    #[error("{strategy}: {operation}: {source}")]
    Isolation {
        /// Name of the strategy that was attempted.
        strategy: &'static str,
        /// Step of the strategy that failed.
        operation: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Mounting a filesystem failed.
    #[error("mounting {fstype} at {} failed: {source}", target.display())]
    Mount {
        /// Filesystem type that was being mounted.
        fstype: String,
        /// Mount point.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Replacing the process image with the target command failed.
    #[error("exec {} failed: {source}", path.display())]
    Exec {
        /// Resolved command path, relative to the isolated root.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The operation requires a Linux kernel.
    #[error("{operation} requires Linux")]
    Unsupported {
        /// Operation that was requested.
        operation: &'static str,
    },
}

impl ShpError {
    /// Builds a [`ShpError::Usage`] from any message.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ShpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rootfs_not_found_names_the_path() {
        let err = ShpError::RootfsNotFound {
            path: PathBuf::from("/tmp/does-not-exist"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let text = err.to_string();
        assert!(text.starts_with("rootfs path does not exist: /tmp/does-not-exist"));
    }

    #[test]
    fn isolation_error_carries_strategy_and_step() {
        let err = ShpError::Isolation {
            strategy: "pivot_root",
            operation: "swapping root".into(),
            source: std::io::Error::from_raw_os_error(22),
        };
        let text = err.to_string();
        assert!(text.starts_with("pivot_root: swapping root: "));
    }

    #[test]
    fn mount_error_names_type_and_target() {
        let err = ShpError::Mount {
            fstype: "proc".into(),
            target: PathBuf::from("/proc"),
            source: std::io::Error::from_raw_os_error(1),
        };
        assert!(err.to_string().starts_with("mounting proc at /proc failed"));
    }

    #[test]
    fn usage_helper_builds_usage_variant() {
        let err = ShpError::usage("missing command");
        assert!(matches!(err, ShpError::Usage { .. }));
        assert_eq!(err.to_string(), "usage: missing command");
    }
}
