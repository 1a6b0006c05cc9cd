//! Implementation of the default `binary-builder` command.
//!
//! Builds one binary version in a fresh foundation and writes
//! `<name>-<version>-linux-x64.tgz` into the output directory.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use binary_builder_lib::build::{BuildError, BuildOptions, Builder};
use binary_builder_lib::platform;
use binary_builder_lib::runner::Runner;

use crate::output::{self, BuildSummary, OutputFormat};

/// Execute a build.
///
/// Runs the three build steps through a local runner whose working directory
/// is `output_dir`. If any command fails, its captured output is printed
/// before the error is returned.
pub fn cmd_build(name: &str, version: &str, output_dir: &Path, format: OutputFormat) -> Result<()> {
  if platform::needs_sandbox() {
    output::warning("Not running on Linux; the tarball will contain binaries for this host, not linux-x64.");
  }

  std::fs::create_dir_all(output_dir)
    .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
  let output_dir = dunce::canonicalize(output_dir)
    .with_context(|| format!("Failed to resolve output directory: {}", output_dir.display()))?;

  let options = BuildOptions::new(name, version);
  let runner = Runner::local().with_cwd(&output_dir);
  debug!(output_dir = ?output_dir, "runner configured");

  if !format.is_json() {
    output::step(&format!("Building {} {}", name, version));
  }

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = match rt.block_on(Builder::build(options, &runner)) {
    Ok(result) => result,
    Err(err) => {
      if let BuildError::Run(run_err) = &err {
        if let Some(captured) = run_err.output() {
          output::command_output(captured);
        }
      }
      return Err(err).with_context(|| format!("Failed to build {} {}", name, version));
    }
  };
  let elapsed = started.elapsed();

  let tarball = output_dir.join(&result.tarball);
  let size_bytes = std::fs::metadata(&tarball)
    .with_context(|| format!("Tarball missing after build: {}", tarball.display()))?
    .len();

  BuildSummary {
    name: result.binary_name,
    version: result.binary_version,
    tarball,
    size_bytes,
    elapsed,
  }
  .print(format)
}
