mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// binary-builder - compile a binary from source and package it as a linux-x64 tarball
#[derive(Parser)]
#[command(name = "binary-builder")]
#[command(author, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
  /// Binary to build (supported: node)
  #[arg(long)]
  name: String,

  /// Version of the binary to build, e.g. v0.12.2
  #[arg(long = "version", value_name = "VERSION")]
  binary_version: String,

  /// Directory the tarball is written to
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,

  /// Format of the build summary
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  /// Enable debug logging
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  init_tracing(cli.verbose);

  match cmd::cmd_build(&cli.name, &cli.binary_version, &cli.output_dir, cli.format) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::failure(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}
