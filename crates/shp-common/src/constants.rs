//! System-wide constants and fixed paths.

/// Binary name for the CLI.
pub const BIN_NAME: &str = "shp";

/// Role marker placed first on the re-exec argument vector.
pub const CHILD_ROLE: &str = "child";

/// Path the launcher re-executes to reach its own image.
pub const SELF_EXE: &str = "/proc/self/exe";

/// Name of the hidden directory that holds the previous root during a root swap.
pub const OLD_ROOT_DIR: &str = ".old_root";

/// Permission bits for the old-root holding directory.
pub const OLD_ROOT_MODE: u32 = 0o700;

/// Directory inside the new root where bare command names are looked up.
pub const BIN_DIR: &str = "/bin";

/// Source and filesystem type of the process-information mount.
pub const PROC_FS: &str = "proc";

/// Mount point of the process-information filesystem inside the new root.
pub const PROC_TARGET: &str = "/proc";

/// Stack size handed to `clone(2)` for the init process.
pub const CLONE_STACK_SIZE: usize = 1024 * 1024;

/// The single exit code used for every usage, validation, or setup failure.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Offset added to a signal number when a child is terminated by a signal.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable holding the `tracing` filter directive.
pub const LOG_FILTER_ENV: &str = "SHP_LOG";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "SHP_LOG_FORMAT";
