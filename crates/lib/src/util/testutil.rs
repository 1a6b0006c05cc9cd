//! Test utilities for binary-builder-lib.
//!
//! Provides an [`Executor`] that records commands instead of running them.

use std::sync::Mutex;

use crate::runner::{CommandOutput, Executor, RunError};

/// Records every command it is asked to run and reports success, except for
/// commands containing one of the configured failure patterns.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
  commands: Mutex<Vec<String>>,
  failures: Vec<(String, i32)>,
}

impl RecordingExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make any command containing `pattern` exit with `code`.
  pub fn fail_on(mut self, pattern: &str, code: i32) -> Self {
    self.failures.push((pattern.to_string(), code));
    self
  }

  /// Commands seen so far, in order.
  pub fn commands(&self) -> Vec<String> {
    self.commands.lock().unwrap().clone()
  }
}

impl Executor for RecordingExecutor {
  async fn run(&self, command: &str) -> Result<CommandOutput, RunError> {
    self.commands.lock().unwrap().push(command.to_string());

    let code = self
      .failures
      .iter()
      .find(|(pattern, _)| command.contains(pattern.as_str()))
      .map(|(_, code)| *code)
      .unwrap_or(0);

    let output = if code == 0 {
      String::new()
    } else {
      format!("simulated failure of: {}\n", command)
    };

    Ok(CommandOutput {
      output,
      code: Some(code),
    })
  }
}
