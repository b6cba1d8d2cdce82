//! # shp-common
//!
//! Shared types, error definitions, configuration models, and constants
//! used by every crate of the shp workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and performs no system calls.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
