//! Disposable Docker containers used as Linux build hosts.
//!
//! Builds produce `linux-x64` tarballs, so on other hosts the CLI itself runs
//! inside a throwaway container with the project directory mounted at
//! `/binary-builder`. The lifecycle is create, use for any number of
//! `docker exec` calls, destroy.

pub mod auxiliary;

pub use auxiliary::AuxiliaryLibs;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config;
use crate::consts::{DEFAULT_ARTIFACT_GLOB, SANDBOX_WORKDIR};
use crate::runner::{ExecTarget, Executor, RunError};
use crate::util::shell_quote;

/// Errors that can occur while managing a sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
  #[error("sandbox command failed: {0}")]
  Run(#[from] RunError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Identifies one sandbox container by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerHandle {
  name: String,
}

impl ContainerHandle {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }

  /// `<prefix>-<unix seconds>-<pid>-<seq>`.
  ///
  /// Distinct for every call within a process, and across processes started
  /// in the same second.
  pub fn timestamped(prefix: &str) -> Self {
    static SEQ: AtomicU32 = AtomicU32::new(0);

    let secs = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    Self::new(format!("{}-{}-{}-{}", prefix, secs, std::process::id(), seq))
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl fmt::Display for ContainerHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// A host directory bind-mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMapping {
  pub host: PathBuf,
  pub container: PathBuf,
}

impl VolumeMapping {
  pub fn new(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
    Self {
      host: host.into(),
      container: container.into(),
    }
  }

  /// The `-v host:container` flag for `docker run`.
  pub fn to_arg(&self) -> String {
    let spec = format!("{}:{}", self.host.display(), self.container.display());
    format!("-v {}", shell_quote(&spec))
  }
}

/// Everything needed to bring a sandbox up and tear it down again.
#[derive(Debug, Clone)]
pub struct Sandbox {
  handle: ContainerHandle,
  image: String,
  workdir: String,
  volumes: Vec<VolumeMapping>,
  prerequisites: Vec<String>,
  artifact_dir: PathBuf,
}

impl Sandbox {
  /// A sandbox with `project_dir` mounted as the container's working directory.
  pub fn for_project(handle: ContainerHandle, project_dir: &Path) -> Self {
    Self {
      handle,
      image: config::sandbox_image(),
      workdir: SANDBOX_WORKDIR.to_string(),
      volumes: vec![VolumeMapping::new(project_dir, SANDBOX_WORKDIR)],
      prerequisites: vec!["apt-get -y install ccache".to_string()],
      artifact_dir: project_dir.to_path_buf(),
    }
  }

  pub fn with_image(mut self, image: impl Into<String>) -> Self {
    self.image = image.into();
    self
  }

  pub fn with_volume(mut self, volume: VolumeMapping) -> Self {
    self.volumes.push(volume);
    self
  }

  /// Replace the commands run inside the container after it starts.
  pub fn with_prerequisites(mut self, prerequisites: Vec<String>) -> Self {
    self.prerequisites = prerequisites;
    self
  }

  pub fn handle(&self) -> &ContainerHandle {
    &self.handle
  }

  /// The detached `docker run` invocation that starts the container.
  pub fn run_command(&self) -> String {
    let mut parts = vec![format!("docker run --name {} -dit", self.handle.name())];
    parts.extend(self.volumes.iter().map(VolumeMapping::to_arg));
    parts.push(format!(
      "-e CCACHE_DIR={}/.ccache -w {} {}",
      self.workdir, self.workdir, self.image
    ));
    parts.push("sh -c 'env PATH=/usr/lib/ccache:$PATH bash'".to_string());
    parts.join(" ")
  }

  /// Start the container and install build prerequisites inside it.
  ///
  /// `host` must run commands on this machine; the first failing step aborts.
  pub async fn setup<E: Executor + Sync>(&self, host: &E) -> Result<(), SandboxError> {
    info!(container = %self.handle, image = %self.image, "starting sandbox");
    host.run_checked(&self.run_command()).await?;

    let target = ExecTarget::Container(self.handle.clone());
    for prerequisite in &self.prerequisites {
      debug!(container = %self.handle, cmd = %prerequisite, "installing prerequisite");
      host.run_checked(&target.wrap(prerequisite)).await?;
    }

    Ok(())
  }

  /// Stop and remove the container, then delete stray artifacts.
  ///
  /// Never fails: problems are logged and cleanup continues. Returns the
  /// artifact files that were removed.
  pub async fn teardown<E: Executor + Sync>(&self, host: &E) -> Vec<PathBuf> {
    info!(container = %self.handle, "tearing down sandbox");

    for action in ["stop", "rm"] {
      let cmd = format!("docker {} {}", action, self.handle.name());
      match host.run(&cmd).await {
        Ok(out) if out.success() => {}
        Ok(out) => warn!(cmd = %cmd, code = ?out.code, output = %out.output, "sandbox cleanup step failed"),
        Err(e) => warn!(cmd = %cmd, error = %e, "sandbox cleanup step failed"),
      }
    }

    remove_matching(&self.artifact_dir, DEFAULT_ARTIFACT_GLOB)
  }
}

/// Delete regular files in `dir` whose names match `pattern`.
fn remove_matching(dir: &Path, pattern: &str) -> Vec<PathBuf> {
  let full = format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), pattern);
  let entries = match glob::glob(&full) {
    Ok(entries) => entries,
    Err(e) => {
      warn!(pattern = %full, error = %e, "invalid artifact pattern");
      return Vec::new();
    }
  };

  let mut removed = Vec::new();
  for entry in entries {
    match entry {
      Ok(path) if path.is_file() => match std::fs::remove_file(&path) {
        Ok(()) => {
          debug!(path = ?path, "removed artifact");
          removed.push(path);
        }
        Err(e) => warn!(path = ?path, error = %e, "failed to remove artifact"),
      },
      Ok(_) => {}
      Err(e) => warn!(error = %e, "failed to read artifact entry"),
    }
  }
  removed
}
