//! End-to-end builds through the real runner, with fixture architects
//! standing in for families that would need network access.

use std::fs::File;
use std::path::Path;

use binary_builder_lib::architect::Architect;
use binary_builder_lib::build::{BuildError, BuildOptions, Builder};
use binary_builder_lib::runner::{RunError, Runner};
use flate2::read::GzDecoder;
use tempfile::TempDir;

/// Installs a single file under `bin/` next to the blueprint.
struct FixtureArchitect;

impl Architect for FixtureArchitect {
  fn blueprint(&self, version: &str) -> String {
    format!(
      r#"#!/bin/sh
set -e
PREFIX="$(cd "$(dirname "$0")" && pwd)"
mkdir -p "$PREFIX/bin"
echo "fixture {version}" > "$PREFIX/bin/fixture"
echo "installed fixture {version}"
"#
    )
  }
}

/// Blueprint that fails halfway through.
struct BrokenArchitect;

impl Architect for BrokenArchitect {
  fn blueprint(&self, _version: &str) -> String {
    "#!/bin/sh\necho 'configure: error: no acceptable C compiler found' >&2\nexit 7\n".to_string()
  }
}

fn tarball_entries(path: &Path) -> Vec<String> {
  let file = File::open(path).unwrap();
  let mut archive = tar::Archive::new(GzDecoder::new(file));
  archive
    .entries()
    .unwrap()
    .map(|entry| {
      let entry = entry.unwrap();
      let path = entry.path().unwrap().to_string_lossy().to_string();
      path.trim_start_matches("./").to_string()
    })
    .collect()
}

#[tokio::test]
async fn build_produces_tarball_without_blueprint() {
  let root = TempDir::new().unwrap();
  let out = TempDir::new().unwrap();
  let runner = Runner::local().with_cwd(out.path());

  let builder = Builder::with_architect_in(
    BuildOptions::new("node", "v0.12.2"),
    Box::new(FixtureArchitect),
    &runner,
    root.path(),
  )
  .unwrap();
  let result = builder.run().await.unwrap();

  let tarball = out.path().join(&result.tarball);
  assert_eq!(result.tarball.to_str(), Some("node-v0.12.2-linux-x64.tgz"));
  assert!(tarball.is_file());

  let entries = tarball_entries(&tarball);
  assert!(entries.iter().any(|e| e == "bin/fixture"), "entries: {:?}", entries);
  assert!(!entries.iter().any(|e| e.ends_with("blueprint.sh")), "entries: {:?}", entries);
}

#[tokio::test]
async fn installed_files_keep_their_content() {
  let root = TempDir::new().unwrap();
  let out = TempDir::new().unwrap();
  let runner = Runner::local().with_cwd(out.path());

  let builder = Builder::with_architect_in(
    BuildOptions::new("node", "v4.2.1"),
    Box::new(FixtureArchitect),
    &runner,
    root.path(),
  )
  .unwrap();
  builder.run().await.unwrap();

  let file = File::open(out.path().join("node-v4.2.1-linux-x64.tgz")).unwrap();
  let mut archive = tar::Archive::new(GzDecoder::new(file));
  let unpacked = TempDir::new().unwrap();
  archive.unpack(unpacked.path()).unwrap();

  let content = std::fs::read_to_string(unpacked.path().join("bin/fixture")).unwrap();
  assert_eq!(content, "fixture v4.2.1\n");
}

#[tokio::test]
async fn failing_blueprint_aborts_before_tar() {
  let root = TempDir::new().unwrap();
  let out = TempDir::new().unwrap();
  let runner = Runner::local().with_cwd(out.path());

  let builder = Builder::with_architect_in(
    BuildOptions::new("node", "v0.12.2"),
    Box::new(BrokenArchitect),
    &runner,
    root.path(),
  )
  .unwrap();
  let err = builder.run().await.unwrap_err();

  match err {
    BuildError::Run(RunError::Failed { code, output, .. }) => {
      assert_eq!(code, Some(7));
      assert!(output.contains("no acceptable C compiler found"));
    }
    other => panic!("unexpected error: {other}"),
  }
  assert!(!out.path().join("node-v0.12.2-linux-x64.tgz").exists());
  assert!(builder.blueprint_path().exists());
}

#[tokio::test]
async fn unsupported_binary_is_rejected_up_front() {
  let runner = Runner::local();

  let result = Builder::build(BuildOptions::new("erlang", "OTP-18.0"), &runner).await;

  assert!(matches!(result, Err(BuildError::UnsupportedBinary(_))));
}
