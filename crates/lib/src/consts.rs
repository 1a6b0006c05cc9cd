pub const APP_NAME: &str = "binary-builder";

/// File name of the generated install script inside a foundation.
pub const BLUEPRINT_FILENAME: &str = "blueprint.sh";

/// Platform suffix appended to every produced tarball.
pub const TARBALL_PLATFORM: &str = "linux-x64";

pub const DEFAULT_SANDBOX_IMAGE: &str = "cloudfoundry/cflinuxfs2";

/// Mount point of the project directory inside the sandbox container.
pub const SANDBOX_WORKDIR: &str = "/binary-builder";

pub const DEFAULT_AUX_LIBS_URL: &str = "s3://buildpacks-oracle-client-libs/oracle_client_libs.tgz";

/// Artifacts left behind in the project directory by sandbox builds.
pub const DEFAULT_ARTIFACT_GLOB: &str = "*deb*";
