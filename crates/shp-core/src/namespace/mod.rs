//! Linux namespace management for container isolation.
//!
//! The init process is always created in the same three new namespaces:
//! UTS (hostname), PID (process tree), and mount (mount table). They are
//! requested together as `clone(2)` flags so the child never exists outside
//! of them.

pub mod mount;

use std::fmt;

/// A single kind of namespace the launcher unshares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Hostname and NIS domain name.
    Uts,
    /// Process ID space; the init process becomes PID 1.
    Pid,
    /// Mount table.
    Mount,
}

impl Namespace {
    /// Returns the `clone(2)` flag that creates this namespace.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub const fn clone_flag(self) -> nix::sched::CloneFlags {
        use nix::sched::CloneFlags;

        match self {
            Self::Uts => CloneFlags::CLONE_NEWUTS,
            Self::Pid => CloneFlags::CLONE_NEWPID,
            Self::Mount => CloneFlags::CLONE_NEWNS,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uts => write!(f, "uts"),
            Self::Pid => write!(f, "pid"),
            Self::Mount => write!(f, "mnt"),
        }
    }
}

/// The fixed set of namespaces requested for every launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSet {
    members: [Namespace; 3],
}

impl NamespaceSet {
    /// The UTS + PID + mount set used for every container.
    #[must_use]
    pub const fn container() -> Self {
        Self {
            members: [Namespace::Uts, Namespace::Pid, Namespace::Mount],
        }
    }

    /// Namespaces in this set.
    #[must_use]
    pub const fn members(&self) -> &[Namespace] {
        &self.members
    }

    /// Combined `clone(2)` flags for all members.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub fn clone_flags(&self) -> nix::sched::CloneFlags {
        self.members
            .iter()
            .fold(nix::sched::CloneFlags::empty(), |acc, ns| acc | ns.clone_flag())
    }
}

impl Default for NamespaceSet {
    fn default() -> Self {
        Self::container()
    }
}

impl fmt::Display for NamespaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join(","))
    }
}
