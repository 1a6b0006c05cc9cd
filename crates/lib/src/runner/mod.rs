//! Shell command execution.
//!
//! Every external tool binary-builder drives (tar, docker, aws, the blueprint
//! itself) goes through an [`Executor`]. [`Runner`] is the process-backed
//! implementation; it runs commands through `/bin/sh -c` on the host, or
//! prefixes them with `docker exec <container>` when targeting a sandbox.

mod types;

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::platform;
use crate::sandbox::ContainerHandle;

pub use types::{CommandOutput, RunError};

/// Something that can run a shell command and report its combined output.
pub trait Executor {
  /// Runs `command` to completion. A non-zero exit is *not* an error here.
  fn run(&self, command: &str) -> impl Future<Output = Result<CommandOutput, RunError>> + Send;

  /// Runs `command` and fails with [`RunError::Failed`] on a non-zero exit.
  fn run_checked(&self, command: &str) -> impl Future<Output = Result<CommandOutput, RunError>> + Send
  where
    Self: Sync,
  {
    async move { self.run(command).await?.check(command) }
  }

  /// Where commands run when that is not this host, e.g. `container:<name>`.
  ///
  /// Callers that hand the executor host paths must refuse remote executors.
  fn remote_target(&self) -> Option<String> {
    None
  }
}

/// Where a [`Runner`] sends its commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecTarget {
  /// Directly on this host.
  Local,
  /// Inside a running sandbox container, via `docker exec`.
  Container(ContainerHandle),
}

impl ExecTarget {
  /// Picks the target for this host: the container on non-Linux hosts when
  /// one is provided, the host itself otherwise.
  pub fn for_host(container: Option<&ContainerHandle>) -> Self {
    Self::select(platform::needs_sandbox(), container)
  }

  fn select(needs_sandbox: bool, container: Option<&ContainerHandle>) -> Self {
    match container {
      Some(handle) if needs_sandbox => ExecTarget::Container(handle.clone()),
      _ => ExecTarget::Local,
    }
  }

  /// Rewrites `command` so that it runs on this target.
  pub fn wrap(&self, command: &str) -> String {
    match self {
      ExecTarget::Local => command.to_string(),
      ExecTarget::Container(handle) => format!("docker exec {} {}", handle.name(), command),
    }
  }
}

impl fmt::Display for ExecTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExecTarget::Local => write!(f, "local"),
      ExecTarget::Container(handle) => write!(f, "container:{}", handle.name()),
    }
  }
}

/// Runs commands as child processes of this one.
#[derive(Debug, Clone)]
pub struct Runner {
  target: ExecTarget,
  cwd: Option<PathBuf>,
  shell: Option<String>,
}

impl Runner {
  pub fn new(target: ExecTarget) -> Self {
    Self {
      target,
      cwd: None,
      shell: None,
    }
  }

  pub fn local() -> Self {
    Self::new(ExecTarget::Local)
  }

  /// Sets the working directory commands are started in.
  pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
    self.cwd = Some(cwd.into());
    self
  }

  /// Overrides the POSIX shell used to interpret commands.
  pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
    self.shell = Some(shell.into());
    self
  }
}

impl Executor for Runner {
  async fn run(&self, command: &str) -> Result<CommandOutput, RunError> {
    let wrapped = self.target.wrap(command);
    info!(cmd = %command, target = %self.target, "running command");

    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());

    // stderr is folded into stdout by the shell so ordering is preserved
    let mut process = Command::new(&shell_cmd);
    process
      .args(&shell_args)
      .arg(format!("exec 2>&1\n{}", wrapped))
      .stdin(Stdio::null());

    if let Some(cwd) = &self.cwd {
      process.current_dir(cwd);
    }

    debug!(shell = %shell_cmd, working_dir = ?self.cwd, "spawning process");

    let output = process.output().await.map_err(|source| RunError::Spawn {
      cmd: command.to_string(),
      source,
    })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    // Anything the shell printed before the redirect took effect
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    let code = output.status.code();
    debug!(code = ?code, bytes = combined.len(), "command finished");

    Ok(CommandOutput { output: combined, code })
  }

  fn remote_target(&self) -> Option<String> {
    match &self.target {
      ExecTarget::Local => None,
      target @ ExecTarget::Container(_) => Some(target.to_string()),
    }
  }
}

/// Get the shell command and argument used to interpret command strings.
///
/// Defaults to `/bin/sh` rather than `$SHELL`, which may source profile files.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  let shell = override_shell.unwrap_or("/bin/sh");
  (shell.to_string(), vec!["-c".to_string()])
}
