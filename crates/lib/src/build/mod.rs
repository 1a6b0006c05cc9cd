//! Building a binary into a tarball.
//!
//! A build runs in three steps, each of which must succeed before the next starts:
//!
//! 1. **Foundation**: the architect's blueprint is written to `<foundation>/blueprint.sh`
//! 2. **Install**: the blueprint is executed and installs into the foundation
//! 3. **Tar**: the blueprint is removed and the foundation is archived as
//!    `<name>-<version>-linux-x64.tgz`
//!
//! # Submodules
//!
//! - [`builder`] - The [`Builder`] driving the three steps

pub mod builder;
mod types;

pub use builder::Builder;
pub use types::*;
