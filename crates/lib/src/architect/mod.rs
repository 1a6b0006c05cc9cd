//! Blueprint generation per binary family.
//!
//! An architect knows where a family's sources live and how to compile them.
//! Given a version it produces a self-contained shell script (the blueprint)
//! that installs the binary into the directory the script itself sits in.

mod node;

use std::fmt;
use std::str::FromStr;

pub use node::NodeArchitect;

/// Produces blueprint scripts for one binary family.
///
/// Implementations must be pure: the same version always yields the same script.
pub trait Architect: Send + Sync {
  /// Blueprint script text for `version`.
  fn blueprint(&self, version: &str) -> String;
}

/// Binary families with a known architect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryFamily {
  Node,
}

impl BinaryFamily {
  pub const ALL: &'static [BinaryFamily] = &[BinaryFamily::Node];

  /// The `--name` value that selects this family.
  pub fn as_str(&self) -> &'static str {
    match self {
      BinaryFamily::Node => "node",
    }
  }

  /// The architect responsible for this family.
  pub fn architect(&self) -> Box<dyn Architect> {
    match self {
      BinaryFamily::Node => Box::new(NodeArchitect),
    }
  }
}

impl fmt::Display for BinaryFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A binary name with no architect behind it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported binary '{0}' (supported: {names})", names = supported_names())]
pub struct UnknownFamily(pub String);

fn supported_names() -> String {
  BinaryFamily::ALL
    .iter()
    .map(|family| family.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

impl FromStr for BinaryFamily {
  type Err = UnknownFamily;

  fn from_str(name: &str) -> Result<Self, Self::Err> {
    BinaryFamily::ALL
      .iter()
      .copied()
      .find(|family| family.as_str() == name)
      .ok_or_else(|| UnknownFamily(name.to_string()))
  }
}
