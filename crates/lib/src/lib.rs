//! binary-builder-lib: Core types and logic for binary-builder
//!
//! This crate provides the pieces the `binary-builder` CLI strings together:
//! - `Architect`: per-binary-family generators of blueprint scripts
//! - `Builder`: writes a blueprint into a foundation directory, runs it, tars the result
//! - `Runner`: executes shell commands locally or inside a sandbox container
//! - `Sandbox`: lifecycle of the disposable Docker container used on non-Linux hosts

pub mod architect;
pub mod build;
pub mod config;
pub mod consts;
pub mod platform;
pub mod runner;
pub mod sandbox;
pub mod util;
