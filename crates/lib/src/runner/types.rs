//! Result and error types for command execution.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a shell command.
#[derive(Debug, Error)]
pub enum RunError {
  /// The shell process could not be started at all.
  #[error("failed to spawn command '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The command ran but exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  Failed {
    cmd: String,
    code: Option<i32>,
    output: String,
  },
}

impl RunError {
  /// Combined stdout/stderr of a failed command, if it got far enough to produce any.
  pub fn output(&self) -> Option<&str> {
    match self {
      RunError::Failed { output, .. } => Some(output),
      RunError::Spawn { .. } => None,
    }
  }
}

/// What a finished command left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
  /// stdout and stderr, interleaved in the order they were written.
  pub output: String,

  /// Exit code; `None` when the process was killed by a signal.
  pub code: Option<i32>,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Converts an unsuccessful exit into [`RunError::Failed`].
  pub fn check(self, cmd: &str) -> Result<Self, RunError> {
    if self.success() {
      Ok(self)
    } else {
      Err(RunError::Failed {
        cmd: cmd.to_string(),
        code: self.code,
        output: self.output,
      })
    }
  }
}
