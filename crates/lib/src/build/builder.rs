//! The build driver.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, info};

use crate::architect::{Architect, BinaryFamily};
use crate::build::types::{BuildError, BuildOptions, BuildResult};
use crate::config;
use crate::consts::{APP_NAME, BLUEPRINT_FILENAME};
use crate::runner::Executor;
use crate::util::shell_quote;

/// Drives a single build of one binary version.
///
/// The foundation directory is created when the builder is constructed and
/// removed when it is dropped.
pub struct Builder<'e, E> {
  options: BuildOptions,
  architect: Box<dyn Architect>,
  foundation: TempDir,
  executor: &'e E,
}

impl<'e, E> Builder<'e, E>
where
  E: Executor + Sync,
{
  /// Builds `options` end to end: foundation, install, tar.
  ///
  /// Stops at the first failing step.
  pub async fn build(options: BuildOptions, executor: &'e E) -> Result<BuildResult, BuildError> {
    let builder = Builder::new(options, executor)?;
    builder.run().await
  }

  /// Create a builder whose architect is chosen by `options.binary_name`.
  pub fn new(options: BuildOptions, executor: &'e E) -> Result<Self, BuildError> {
    let family: BinaryFamily = options.binary_name.parse()?;
    Self::with_architect(options, family.architect(), executor)
  }

  /// Create a builder with an explicit architect, bypassing name lookup.
  pub fn with_architect(
    options: BuildOptions,
    architect: Box<dyn Architect>,
    executor: &'e E,
  ) -> Result<Self, BuildError> {
    let root = config::foundation_root();
    Self::with_architect_in(options, architect, executor, &root)
  }

  /// Like [`Builder::with_architect`], creating the foundation under `root`.
  ///
  /// The blueprint is written with host filesystem calls, so `executor` must
  /// run commands on this host.
  pub fn with_architect_in(
    options: BuildOptions,
    architect: Box<dyn Architect>,
    executor: &'e E,
    root: &Path,
  ) -> Result<Self, BuildError> {
    if let Some(target) = executor.remote_target() {
      return Err(BuildError::ContainerTarget { target });
    }

    let foundation_err = |source| BuildError::Foundation {
      path: root.to_path_buf(),
      source,
    };

    std::fs::create_dir_all(root).map_err(foundation_err)?;
    let foundation = tempfile::Builder::new()
      .prefix(&format!("{}-", APP_NAME))
      .tempdir_in(root)
      .map_err(foundation_err)?;

    debug!(
      name = %options.binary_name,
      version = %options.binary_version,
      foundation = ?foundation.path(),
      "builder created"
    );

    Ok(Self {
      options,
      architect,
      foundation,
      executor,
    })
  }

  /// Run all three steps in order.
  pub async fn run(&self) -> Result<BuildResult, BuildError> {
    info!(
      name = %self.options.binary_name,
      version = %self.options.binary_version,
      "starting build"
    );

    self.set_foundation().await?;
    self.install().await?;
    let tarball = self.tar_installed_binary().await?;

    info!(tarball = ?tarball, "build complete");

    Ok(BuildResult {
      binary_name: self.options.binary_name.clone(),
      binary_version: self.options.binary_version.clone(),
      tarball,
    })
  }

  /// Write the architect's blueprint into the foundation as an executable script.
  pub async fn set_foundation(&self) -> Result<(), BuildError> {
    let blueprint = self.architect.blueprint(&self.options.binary_version);
    let foundation = self.foundation_path();
    let blueprint_path = self.blueprint_path();

    let foundation_err = |source| BuildError::Foundation {
      path: foundation.to_path_buf(),
      source,
    };

    fs::create_dir_all(foundation).await.map_err(foundation_err)?;
    fs::write(&blueprint_path, blueprint).await.map_err(foundation_err)?;
    make_executable(&blueprint_path).await.map_err(foundation_err)?;

    info!(path = ?blueprint_path, "blueprint written");
    Ok(())
  }

  /// Execute the blueprint. A non-zero exit aborts the build.
  pub async fn install(&self) -> Result<(), BuildError> {
    let command = shell_quote(&self.blueprint_path().to_string_lossy());
    let output = self.executor.run_checked(&command).await?;

    debug!(output = %output.output, "blueprint output");
    Ok(())
  }

  /// Remove the blueprint and archive what the install left in the foundation.
  ///
  /// Returns the tarball path relative to the executor's working directory.
  pub async fn tar_installed_binary(&self) -> Result<PathBuf, BuildError> {
    let blueprint_path = self.blueprint_path();
    fs::remove_file(&blueprint_path)
      .await
      .map_err(|source| BuildError::Foundation {
        path: blueprint_path.clone(),
        source,
      })?;

    let tarball = self.options.tarball_name();
    let command = format!(
      "tar czf {} -C {} .",
      shell_quote(&tarball),
      shell_quote(&self.foundation_path().to_string_lossy())
    );
    self.executor.run_checked(&command).await?;

    Ok(PathBuf::from(tarball))
  }

  pub fn options(&self) -> &BuildOptions {
    &self.options
  }

  /// Directory the blueprint is written to and installs into.
  pub fn foundation_path(&self) -> &Path {
    self.foundation.path()
  }

  pub fn blueprint_path(&self) -> PathBuf {
    self.foundation_path().join(BLUEPRINT_FILENAME)
  }
}

/// `chmod +x`: add execute bits wherever read bits are set.
#[cfg(unix)]
async fn make_executable(path: &Path) -> std::io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let mut perms = fs::metadata(path).await?.permissions();
  let mode = perms.mode();
  perms.set_mode(mode | ((mode & 0o444) >> 2));
  fs::set_permissions(path, perms).await
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> std::io::Result<()> {
  Ok(())
}
