//! Successful builds against a stub toolchain.

use predicates::prelude::*;

use super::common::{StubToolchain, tarball_entries};

#[test]
fn stub_build_writes_tarball_and_text_summary() {
  let stub = StubToolchain::new("v0.0.1");
  let out = stub.out_dir();

  stub
    .builder_cmd()
    .args(["--name=node", "--version=v0.0.1"])
    .arg("--output-dir")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Building node v0.0.1"))
    .stdout(predicate::str::contains("Built node v0.0.1"))
    .stdout(predicate::str::contains("node-v0.0.1-linux-x64.tgz"))
    .stdout(predicate::str::contains("size"))
    .stdout(predicate::str::contains("took"));

  let tarball = out.join("node-v0.0.1-linux-x64.tgz");
  let entries = tarball_entries(&tarball);
  assert!(entries.iter().any(|e| e == "bin/node"), "entries: {:?}", entries);
  assert!(!entries.iter().any(|e| e.ends_with("blueprint.sh")));
}

#[test]
fn stub_build_json_summary_is_the_only_stdout() {
  let stub = StubToolchain::new("v0.0.2");
  let out = stub.out_dir();

  let assert = stub
    .builder_cmd()
    .args(["--name=node", "--version=v0.0.2", "--format=json"])
    .arg("--output-dir")
    .arg(&out)
    .assert()
    .success();

  let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  let tarball = dunce::canonicalize(&out).unwrap().join("node-v0.0.2-linux-x64.tgz");
  assert_eq!(summary["name"], "node");
  assert_eq!(summary["version"], "v0.0.2");
  assert_eq!(summary["tarball"], tarball.to_str().unwrap());
  assert_eq!(summary["size_bytes"], std::fs::metadata(&tarball).unwrap().len());
  assert!(summary["elapsed_ms"].is_u64());
}

#[test]
fn stub_build_leaves_no_foundation_behind() {
  let stub = StubToolchain::new("v0.0.3");

  stub
    .builder_cmd()
    .args(["--name=node", "--version=v0.0.3"])
    .arg("--output-dir")
    .arg(stub.out_dir())
    .assert()
    .success();

  let foundations = stub.temp.path().join("foundations");
  assert_eq!(std::fs::read_dir(foundations).unwrap().count(), 0);
}
