pub mod context;
pub mod installer;

pub use context::InstallContext;
pub use installer::{InstallerRunner, JavaInstallerRunner, INSTALLER_TIMEOUT};

/// Pinned Fabric installer release.
pub const FABRIC_INSTALLER_URL: &str =
    "https://maven.fabricmc.net/net/fabricmc/fabric-installer/0.11.2/fabric-installer-0.11.2.jar";

/// File name of the shared installer jar inside the state directory.
pub const FABRIC_INSTALLER_FILE: &str = "fabric-installer.jar";
