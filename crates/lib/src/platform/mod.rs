pub mod os;

use os::Os;

/// Returns true when commands must be routed into a sandbox container.
///
/// Unknown operating systems are treated like non-Linux hosts.
pub fn needs_sandbox() -> bool {
  Os::current().is_none_or(|os| os.needs_sandbox())
}
