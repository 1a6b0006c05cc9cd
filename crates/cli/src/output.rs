//! Terminal output for `binary-builder`.
//!
//! Progress and the build summary go to stdout. Warnings, errors and the
//! output of a failed command go to stderr, so `--format json` leaves stdout
//! holding nothing but the summary document.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Leading glyph of a one-line status message.
#[derive(Debug, Clone, Copy)]
enum Marker {
  Done,
  Failed,
  Caution,
  Step,
}

impl Marker {
  fn glyph(self) -> &'static str {
    match self {
      Marker::Done => "✓",
      Marker::Failed => "✗",
      Marker::Caution => "⚠",
      Marker::Step => "→",
    }
  }
}

/// Announce a build step.
pub fn step(message: &str) {
  println!(
    "{} {}",
    Marker::Step.glyph().if_supports_color(Stream::Stdout, |s| s.cyan()),
    message
  );
}

pub fn warning(message: &str) {
  eprintln!(
    "{} {}",
    Marker::Caution.glyph().if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn failure(message: &str) {
  eprintln!(
    "{} {}",
    Marker::Failed.glyph().if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

/// Dump what a failed command printed, indented, to stderr.
pub fn command_output(output: &str) {
  eprintln!("command output:");
  for line in output.lines() {
    eprintln!("  {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
  }
}

/// What a finished build reports, as text rows or one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
  pub name: String,
  pub version: String,
  pub tarball: PathBuf,
  pub size_bytes: u64,
  #[serde(rename = "elapsed_ms", serialize_with = "millis")]
  pub elapsed: Duration,
}

impl BuildSummary {
  pub fn headline(&self) -> String {
    format!("Built {} {}", self.name, self.version)
  }

  /// Label and value pairs shown under the headline.
  pub fn rows(&self) -> [(&'static str, String); 3] {
    [
      ("tarball", self.tarball.display().to_string()),
      ("size", human_size(self.size_bytes)),
      ("took", human_duration(self.elapsed)),
    ]
  }

  pub fn print(&self, format: OutputFormat) -> anyhow::Result<()> {
    if format.is_json() {
      let json = serde_json::to_string_pretty(self).context("Failed to serialize build summary")?;
      println!("{}", json);
      return Ok(());
    }

    println!(
      "{} {}",
      Marker::Done.glyph().if_supports_color(Stream::Stdout, |s| s.green()),
      self.headline()
    );
    let rows = self.rows();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
      let label = format!("{:<width$}", label);
      println!("  {}  {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
    }
    Ok(())
  }
}

fn millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Binary-prefixed size with one decimal, e.g. `1.5 KiB`.
fn human_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64;
  let mut unit = "B";
  for next in UNITS {
    if value < 1024.0 {
      break;
    }
    value /= 1024.0;
    unit = next;
  }
  format!("{:.1} {}", value, unit)
}

/// Compile times run from milliseconds (stubs) to tens of minutes (node).
fn human_duration(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();
  match secs {
    0 => format!("{} ms", elapsed.as_millis()),
    1..=59 => format!("{:.1} s", elapsed.as_secs_f64()),
    _ => format!("{}m{:02}s", secs / 60, secs % 60),
  }
}
