//! Auxiliary client libraries pulled from object storage.
//!
//! Some binaries link against vendor libraries that cannot be downloaded
//! publicly. They are kept as a tarball in object storage, fetched with the
//! `aws` CLI and unpacked next to the project; the extracted `oracle/`
//! directory is then mounted into the sandbox at `/oracle`.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{SandboxError, VolumeMapping};
use crate::config;
use crate::runner::Executor;
use crate::util::shell_quote;

/// Directory the bundle unpacks to.
pub const AUX_LIBS_DIR: &str = "oracle";

/// Where the unpacked libraries are mounted inside the sandbox.
pub const AUX_LIBS_MOUNT: &str = "/oracle";

/// Auxiliary libraries unpacked into a download directory.
///
/// The download directory is removed on drop unless [`AuxiliaryLibs::persist`]
/// was called.
#[derive(Debug)]
pub struct AuxiliaryLibs {
  dir: PathBuf,
  cleanup: bool,
}

impl AuxiliaryLibs {
  /// Download the configured bundle into `dir` and unpack it there.
  pub async fn fetch<E: Executor + Sync>(host: &E, dir: &Path) -> Result<Self, SandboxError> {
    Self::fetch_from(host, dir, &config::aux_libs_url()).await
  }

  /// Download `url` into `dir` and unpack it there.
  ///
  /// `dir` is removed again if either step fails.
  pub async fn fetch_from<E: Executor + Sync>(host: &E, dir: &Path, url: &str) -> Result<Self, SandboxError> {
    tokio::fs::create_dir_all(dir).await?;
    let libs = Self {
      dir: dir.to_path_buf(),
      cleanup: true,
    };

    let archive = archive_name(url);
    let cd = format!("cd {}", shell_quote(&dir.to_string_lossy()));

    info!(url = %url, dir = ?dir, "fetching auxiliary libraries");
    host
      .run_checked(&format!("{} && aws s3 cp {} .", cd, shell_quote(url)))
      .await?;
    host
      .run_checked(&format!("{} && tar -xvf {}", cd, shell_quote(&archive)))
      .await?;

    Ok(libs)
  }

  /// The download directory.
  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// The unpacked libraries.
  pub fn libs_dir(&self) -> PathBuf {
    self.dir.join(AUX_LIBS_DIR)
  }

  /// Volume mapping exposing the libraries to the sandbox at `/oracle`.
  pub fn volume(&self) -> VolumeMapping {
    VolumeMapping::new(self.libs_dir(), AUX_LIBS_MOUNT)
  }

  /// Keep the download directory on disk and return the libraries' path.
  pub fn persist(mut self) -> PathBuf {
    self.cleanup = false;
    self.libs_dir()
  }
}

impl Drop for AuxiliaryLibs {
  fn drop(&mut self) {
    if !self.cleanup {
      return;
    }
    if !removable(&self.dir) {
      warn!(dir = ?self.dir, "refusing to remove auxiliary libraries directory");
      return;
    }
    match std::fs::remove_dir_all(&self.dir) {
      Ok(()) => debug!(dir = ?self.dir, "removed auxiliary libraries"),
      Err(e) => warn!(dir = ?self.dir, error = %e, "failed to remove auxiliary libraries"),
    }
  }
}

/// Filesystem roots are never deleted, even when fetched into.
fn removable(dir: &Path) -> bool {
  dir.parent().is_some()
}

fn archive_name(url: &str) -> String {
  url
    .rsplit('/')
    .next()
    .filter(|name| !name.is_empty())
    .unwrap_or("auxiliary_libs.tgz")
    .to_string()
}
