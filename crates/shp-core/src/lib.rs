//! # shp-core
//!
//! Low-level Linux isolation primitives for shp.
//!
//! This crate provides safe abstractions over:
//! - **Namespaces**: the fixed UTS, PID, and mount namespace set requested
//!   when the init process is cloned, and mount propagation control.
//! - **Filesystem**: root isolation through `pivot_root(2)` with a
//!   `chroot(2)` fallback, and the `/proc` mount.
//!
//! Every wrapper has a non-Linux stub returning
//! [`ShpError::Unsupported`](shp_common::error::ShpError::Unsupported).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod filesystem;
pub mod namespace;
