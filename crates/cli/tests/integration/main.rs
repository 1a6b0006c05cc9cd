//! Integration tests for the `binary-builder` binary.
//!
//! Real compiles download sources, so they are `#[ignore]`d by default. Run
//! them with `cargo test -p binary-builder-cli -- --ignored`; on non-Linux
//! hosts they run inside a Docker sandbox. Stub toolchain builds run always.

mod build_tests;
#[cfg(unix)]
mod summary_tests;
