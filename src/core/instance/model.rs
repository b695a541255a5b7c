use std::path::PathBuf;

use serde::Serialize;

use crate::core::error::{SetupError, SetupResult};
use crate::core::loaders::FABRIC_INSTALLER_FILE;

/// On-disk layout under the root state directory:
///
/// - `<root>/fabric-installer.jar` — installer shared by every version
/// - `<root>/<version>/`           — game directory for one version
/// - `<root>/<version>/mods/`      — mod JARs
#[derive(Debug, Clone)]
pub struct InstallLayout {
    root: PathBuf,
}

impl InstallLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path to the game directory for `version`.
    pub fn install_dir(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Path to the `mods/` directory for `version`.
    pub fn mods_dir(&self, version: &str) -> PathBuf {
        self.install_dir(version).join("mods")
    }

    pub fn installer_path(&self) -> PathBuf {
        self.root.join(FABRIC_INSTALLER_FILE)
    }
}

/// Reject version keys that would escape the root directory once joined.
pub fn validate_version_key(version: &str) -> SetupResult<()> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(SetupError::InvalidRequest("Missing mc_version".into()));
    }
    if trimmed != version
        || version == "."
        || version == ".."
        || version.contains(['/', '\\'])
        || version.contains('\0')
    {
        return Err(SetupError::InvalidRequest(format!(
            "Invalid mc_version: {version:?}"
        )));
    }
    Ok(())
}

/// What the disk says about a version, independent of any tracked job.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DiskInspection {
    pub installed: bool,
    pub fabric_installed: bool,
    pub fabric_api_installed: bool,
    pub ai_mod_installed: bool,
}

impl DiskInspection {
    /// Classify one file name found in `mods/`.
    pub fn observe_mod_file(&mut self, file_name: &str) {
        let lower = file_name.to_lowercase();
        if lower.contains("fabric-api") {
            self.fabric_api_installed = true;
        }
        if lower.contains("ai-builder") || lower.contains("ai_builder") {
            self.ai_mod_installed = true;
        }
    }
}
