//! Full builds of real binaries.

use super::common::{BuildHarness, tarball_entries};

#[test]
#[ignore = "downloads and compiles node; slow and needs network"]
fn node_build_produces_linux_tarball() {
  let harness = BuildHarness::new();

  let output = harness.run_binary_builder("node", "v0.12.2", &[]);

  let tarball = harness.out_dir().join("node-v0.12.2-linux-x64.tgz");
  assert!(tarball.is_file(), "tarball missing, output: {}", output);

  let entries = tarball_entries(&tarball);
  assert!(entries.iter().any(|e| e == "bin/node"), "entries: {:?}", entries);
  assert!(!entries.iter().any(|e| e.ends_with("blueprint.sh")));
}

#[test]
#[ignore = "downloads and compiles node; slow and needs network"]
fn node_build_reports_json_summary() {
  let harness = BuildHarness::new();

  let output = harness.run_binary_builder("node", "v0.12.2", &["--format=json"]);

  assert!(output.contains(r#""name": "node""#), "output: {}", output);
  assert!(output.contains("node-v0.12.2-linux-x64.tgz"));
}
