//! Filesystem isolation for the init process.
//!
//! Two strategies exist. [`Strategy::RootSwap`] (`pivot_root`) is always
//! tried first; if it fails for any reason the failure is logged and
//! [`Strategy::LegacyChroot`] is tried. There is no capability probing and
//! no third option: if the fallback fails too, isolation fails. The one
//! failure that does not fall back is a root swap that already replaced the
//! root, since chroot would then stack on top of it.

pub mod chroot;
pub mod mount;
pub mod pivot_root;

use std::fmt;
use std::path::Path;

use shp_common::error::{Result, ShpError};

use self::pivot_root::CleanupReport;

/// A root isolation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Atomic root swap with `pivot_root(2)`, old root detached afterward.
    RootSwap,
    /// `chroot(2)` followed by `chdir("/")`.
    LegacyChroot,
}

impl Strategy {
    /// Name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RootSwap => pivot_root::STRATEGY_NAME,
            Self::LegacyChroot => chroot::STRATEGY_NAME,
        }
    }

    /// Runs this strategy against `rootfs` and records what happened.
    #[must_use]
    pub fn attempt(self, rootfs: &Path) -> IsolationOutcome {
        match self {
            Self::RootSwap => match pivot_root::pivot_root(rootfs) {
                Ok(cleanup) => IsolationOutcome {
                    strategy: self,
                    error: None,
                    cleanup,
                    root_changed: true,
                },
                Err(e) => IsolationOutcome {
                    strategy: self,
                    error: Some(e.error),
                    cleanup: CleanupReport::default(),
                    root_changed: e.root_changed,
                },
            },
            Self::LegacyChroot => match chroot::chroot(rootfs) {
                Ok(()) => IsolationOutcome::succeeded(self),
                Err(e) => IsolationOutcome::failed(self, e),
            },
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one strategy attempt.
///
/// Only used to drive the fallback decision and logging.
#[derive(Debug)]
pub struct IsolationOutcome {
    /// Strategy that was attempted.
    pub strategy: Strategy,
    /// Why the attempt failed, if it did.
    pub error: Option<ShpError>,
    /// Best-effort cleanup failures. Always clean for a failed attempt and
    /// for strategies without a cleanup phase.
    pub cleanup: CleanupReport,
    /// Whether the process root was changed, even if the attempt then failed.
    pub root_changed: bool,
}

impl IsolationOutcome {
    /// An attempt that completed with nothing to report.
    #[must_use]
    pub fn succeeded(strategy: Strategy) -> Self {
        Self {
            strategy,
            error: None,
            cleanup: CleanupReport::default(),
            root_changed: true,
        }
    }

    /// An attempt that failed with `error` before touching the root.
    #[must_use]
    pub fn failed(strategy: Strategy, error: ShpError) -> Self {
        Self {
            strategy,
            error: Some(error),
            cleanup: CleanupReport::default(),
            root_changed: false,
        }
    }
}

/// Applies the try-then-fallback policy using `attempt` to run a strategy.
///
/// [`Strategy::RootSwap`] is attempted first. A failure that left the root
/// untouched is logged as a warning and [`Strategy::LegacyChroot`] is
/// attempted. Returns the strategy that is in effect.
///
/// # Errors
///
/// Returns the root swap's error if it failed after changing the root, and
/// the fallback's error if both strategies fail.
pub fn select_strategy<F>(mut attempt: F) -> Result<Strategy>
where
    F: FnMut(Strategy) -> IsolationOutcome,
{
    let primary = attempt(Strategy::RootSwap);
    let Some(error) = primary.error else {
        if !primary.cleanup.is_clean() {
            tracing::debug!(cleanup = ?primary.cleanup, "root swap kept despite cleanup failures");
        }
        return Ok(Strategy::RootSwap);
    };

    if primary.root_changed {
        tracing::error!(strategy = %primary.strategy, error = %error, "root changed but not usable");
        return Err(error);
    }

    tracing::warn!(strategy = %primary.strategy, error = %error, "pivot_root failed, falling back to chroot");
    let fallback = attempt(Strategy::LegacyChroot);
    match fallback.error {
        None => Ok(Strategy::LegacyChroot),
        Some(error) => Err(error),
    }
}

/// Isolates the calling process's filesystem root at `rootfs`.
///
/// # Errors
///
/// Returns an error if neither `pivot_root` nor `chroot` succeeds.
pub fn isolate_root(rootfs: &Path) -> Result<Strategy> {
    select_strategy(|strategy| strategy.attempt(rootfs))
}
