//! Parent role: request the namespaces and wait for the init process.

use shp_common::error::Result;
use shp_common::types::LaunchRequest;
use shp_core::namespace::NamespaceSet;

use crate::process;

/// Starts `request` in new UTS, PID, and mount namespaces and returns the
/// init process's exit code.
///
/// The init process is this same executable invoked as
/// `child <rootfs_path> <command> [args...]`. Namespace creation failure is
/// never retried.
///
/// # Errors
///
/// Returns an error if the namespaces cannot be created or the init process
/// cannot be spawned or waited for.
pub fn launch(request: &LaunchRequest) -> Result<u8> {
    let namespaces = NamespaceSet::container();
    tracing::info!(
        rootfs = %request.root_path().display(),
        command = request.command(),
        namespaces = %namespaces,
        "launching container"
    );
    process::spawn_self_and_wait(&request.to_child_args(), namespaces)
}
