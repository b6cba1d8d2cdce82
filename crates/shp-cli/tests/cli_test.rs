//! End-to-end tests for the `shp` binary.
//!
//! The first group needs no privileges: usage handling and rootfs
//! validation both fail before any namespace is requested.
//!
//! Tests that create namespaces and swap roots require root and are marked
//! with #[ignore]. Run them with:
//!   sudo cargo test -p shp-cli -- --ignored
//!
//! Every root swap happens inside the mount namespace `shp run` creates, so
//! the host root is never touched. The tmpfs used as a separate-filesystem
//! rootfs is mounted by the test and lazily detached when it finishes.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn shp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_shp"))
        .args(args)
        .env("SHP_LOG", "info")
        .env("SHP_LOG_FORMAT", "text")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn shp")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ── Usage and validation (unprivileged) ─────────────────────────────

#[test]
fn no_arguments_prints_usage_to_stdout_and_exits_1() {
    let output = shp(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Usage"), "stdout: {}", stdout(&output));
}

#[test]
fn unknown_subcommand_exits_1() {
    let output = shp(&["bogus", "x", "y"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("bogus"));
}

#[test]
fn help_exits_0() {
    let output = shp(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("child"));
}

#[test]
fn child_with_missing_rootfs_fails_before_isolation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");
    let output = shp(&["child", missing.to_str().expect("utf8"), "/bin/true"]);

    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(text.contains("rootfs path does not exist"), "stdout: {text}");
    assert!(!text.contains("pivot_root"), "stdout: {text}");
}

// ── Full launches (root only) ────────────────────────────────────────

/// Copies `binaries` into `root` at the same paths, together with the
/// shared libraries `ldd` reports for them, and creates `/proc`.
fn populate_rootfs(root: &Path, binaries: &[&str]) {
    std::fs::create_dir_all(root.join("proc")).expect("mkdir proc");
    for binary in binaries {
        copy_into(root, Path::new(binary));
        let ldd = Command::new("ldd").arg(binary).output().expect("run ldd");
        for line in String::from_utf8_lossy(&ldd.stdout).lines() {
            for lib in line.split_whitespace().filter(|t| t.starts_with('/')) {
                copy_into(root, Path::new(lib));
            }
        }
    }
}

fn copy_into(root: &Path, host_path: &Path) {
    let dest = root.join(host_path.strip_prefix("/").expect("absolute"));
    std::fs::create_dir_all(dest.parent().expect("parent")).expect("mkdir");
    let _ = std::fs::copy(host_path, &dest).expect("copy");
}

/// A tmpfs mounted on a fresh directory, so the rootfs is a separate mount.
struct TmpfsRoot {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl TmpfsRoot {
    fn mount() -> Self {
        use nix::mount::{MsFlags, mount};

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rootfs");
        std::fs::create_dir(&path).expect("mkdir rootfs");
        mount(
            Some("tmpfs"),
            &path,
            Some("tmpfs"),
            MsFlags::empty(),
            None::<&str>,
        )
        .expect("mount tmpfs");
        Self { _dir: dir, path }
    }
}

impl Drop for TmpfsRoot {
    fn drop(&mut self) {
        let _ = nix::mount::umount2(&self.path, nix::mount::MntFlags::MNT_DETACH);
    }
}

#[test]
#[ignore = "requires root"]
fn separate_filesystem_uses_pivot_root() {
    let root = TmpfsRoot::mount();
    populate_rootfs(&root.path, &["/bin/true"]);

    let output = shp(&["run", root.path.to_str().expect("utf8"), "/bin/true"]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "stdout: {text}");
    assert!(text.contains("root swapped with pivot_root"), "stdout: {text}");
    assert!(!text.contains("falling back to chroot"), "stdout: {text}");
}

#[test]
#[ignore = "requires root"]
fn same_filesystem_falls_back_to_chroot() {
    let dir = tempfile::tempdir().expect("tempdir");
    populate_rootfs(dir.path(), &["/bin/true"]);

    let output = shp(&["run", dir.path().to_str().expect("utf8"), "/bin/true"]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "stdout: {text}");
    assert!(text.contains("falling back to chroot"), "stdout: {text}");
    assert!(text.contains("using chroot for filesystem isolation"), "stdout: {text}");
}

#[test]
#[ignore = "requires root"]
fn target_exit_code_is_propagated() {
    let root = TmpfsRoot::mount();
    populate_rootfs(&root.path, &["/bin/sh"]);

    let output = shp(&["run", root.path.to_str().expect("utf8"), "sh", "-c", "exit 7"]);
    assert_eq!(output.status.code(), Some(7), "stdout: {}", stdout(&output));
}

#[test]
#[ignore = "requires root"]
fn missing_binary_fails_at_exec() {
    let root = TmpfsRoot::mount();
    populate_rootfs(&root.path, &["/bin/true"]);

    let output = shp(&["run", root.path.to_str().expect("utf8"), "nonexistent-binary"]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "stdout: {text}");
    assert!(text.contains("filesystem mounted"), "stdout: {text}");
    assert!(text.contains("exec /bin/nonexistent-binary failed"), "stdout: {text}");
}

#[test]
#[ignore = "requires root"]
fn both_strategies_failing_never_starts_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    // Exists, so validation passes, but neither pivot_root nor chroot can
    // use a regular file as a root.
    let rootfs = dir.path().join("rootfs-file");
    std::fs::write(&rootfs, b"").expect("write");

    let output = shp(&[
        "run",
        rootfs.to_str().expect("utf8"),
        "/bin/sh",
        "-c",
        "echo target-started",
    ]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "stdout: {text}");
    assert!(text.contains("falling back to chroot"), "stdout: {text}");
    assert!(text.contains("chroot: changing root to"), "stdout: {text}");
    assert!(!text.contains("target-started"), "stdout: {text}");
}

#[test]
#[ignore = "requires root"]
fn missing_rootfs_fails_validation_under_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");

    let output = shp(&["run", missing.to_str().expect("utf8"), "/bin/true"]);
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(1), "stdout: {text}");
    assert!(text.contains("rootfs path does not exist"), "stdout: {text}");
    assert!(!text.contains("falling back to chroot"), "stdout: {text}");
}

#[cfg(unix)]
#[test]
#[ignore = "requires root"]
fn non_utf8_rootfs_reaches_init_unchanged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let rootfs = dir.path().join(OsStr::from_bytes(b"rootfs_\xffdir"));
    std::fs::create_dir(&rootfs).expect("mkdir");
    populate_rootfs(&rootfs, &["/bin/true"]);

    let output = Command::new(env!("CARGO_BIN_EXE_shp"))
        .arg("run")
        .arg(&rootfs)
        .arg("/bin/true")
        .env("NO_COLOR", "1")
        .output()
        .expect("spawn shp");
    let text = stdout(&output);
    assert_eq!(output.status.code(), Some(0), "stdout: {text}");
    assert!(!text.contains("rootfs path does not exist"), "stdout: {text}");
}
