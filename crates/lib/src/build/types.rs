use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::architect::UnknownFamily;
use crate::consts::TARBALL_PLATFORM;
use crate::runner::RunError;

/// What to build. Fixed for the lifetime of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOptions {
  pub binary_name: String,
  pub binary_version: String,
}

impl BuildOptions {
  pub fn new(binary_name: impl Into<String>, binary_version: impl Into<String>) -> Self {
    Self {
      binary_name: binary_name.into(),
      binary_version: binary_version.into(),
    }
  }

  /// File name of the produced archive, e.g. `node-v0.12.2-linux-x64.tgz`.
  pub fn tarball_name(&self) -> String {
    format!("{}-{}-{}.tgz", self.binary_name, self.binary_version, TARBALL_PLATFORM)
  }
}

/// Errors that can occur during a build.
#[derive(Debug, Error)]
pub enum BuildError {
  /// No architect exists for the requested binary.
  #[error(transparent)]
  UnsupportedBinary(#[from] UnknownFamily),

  /// The foundation directory could not be created or populated.
  #[error("failed to prepare foundation at {path}: {source}")]
  Foundation {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The executor runs commands somewhere the foundation is not visible.
  #[error("cannot build through {target}: the foundation lives on this host")]
  ContainerTarget { target: String },

  /// A shell step failed.
  #[error(transparent)]
  Run(#[from] RunError),
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
  pub binary_name: String,
  pub binary_version: String,

  /// Tarball path, relative to the executor's working directory.
  pub tarball: PathBuf,
}
