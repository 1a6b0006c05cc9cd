//! Node.js from the upstream source tarballs.

use super::Architect;

const DIST_URL: &str = "https://nodejs.org/dist";

#[derive(Debug, Clone, Copy, Default)]
pub struct NodeArchitect;

impl NodeArchitect {
  /// Upstream source tarball for `version` (e.g. `v0.12.2`).
  pub fn source_url(version: &str) -> String {
    format!("{DIST_URL}/{version}/node-{version}.tar.gz")
  }
}

impl Architect for NodeArchitect {
  fn blueprint(&self, version: &str) -> String {
    let url = Self::source_url(version);
    format!(
      r#"#!/usr/bin/env bash
set -euo pipefail

# install into the directory holding this script
PREFIX="$(cd "$(dirname "${{BASH_SOURCE[0]}}")" && pwd)"
SCRATCH="$(mktemp -d)"
trap 'rm -rf "$SCRATCH"' EXIT

cd "$SCRATCH"
curl -fsSL "{url}" | tar xz
cd "node-{version}"

./configure --prefix="$PREFIX"
make -j"$(nproc)"
make install
"#
    )
  }
}
