//! Environment-driven settings.
//!
//! Every value has a built-in default and can be overridden through a
//! `BINARY_BUILDER_*` environment variable.

use std::path::PathBuf;

use crate::consts::{DEFAULT_AUX_LIBS_URL, DEFAULT_SANDBOX_IMAGE};

pub const TMPDIR_VAR: &str = "BINARY_BUILDER_TMPDIR";
pub const IMAGE_VAR: &str = "BINARY_BUILDER_IMAGE";
pub const AUX_LIBS_URL_VAR: &str = "BINARY_BUILDER_AUX_LIBS_URL";
pub const AUX_LIBS_VAR: &str = "BINARY_BUILDER_AUX_LIBS";

/// Directory under which foundation directories are created.
pub fn foundation_root() -> PathBuf {
  non_empty_var(TMPDIR_VAR)
    .map(PathBuf::from)
    .unwrap_or_else(std::env::temp_dir)
}

/// Docker image used for the build sandbox.
pub fn sandbox_image() -> String {
  non_empty_var(IMAGE_VAR).unwrap_or_else(|| DEFAULT_SANDBOX_IMAGE.to_string())
}

/// Object storage location of the auxiliary library bundle.
pub fn aux_libs_url() -> String {
  non_empty_var(AUX_LIBS_URL_VAR).unwrap_or_else(|| DEFAULT_AUX_LIBS_URL.to_string())
}

/// Whether builds that link against the auxiliary libraries should fetch them.
///
/// Off unless `BINARY_BUILDER_AUX_LIBS` is `1`, `true` or `yes`.
pub fn aux_libs_requested() -> bool {
  non_empty_var(AUX_LIBS_VAR).is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
