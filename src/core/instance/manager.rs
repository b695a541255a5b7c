use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::model::{DiskInspection, InstallLayout};
use crate::core::error::{SetupError, SetupResult};

/// Directory operations on the install layout.
#[derive(Debug, Clone)]
pub struct InstanceManager {
    layout: InstallLayout,
}

impl InstanceManager {
    pub fn new(layout: InstallLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Create `<root>/<version>/mods`. Succeeds when it already exists.
    pub async fn prepare_dirs(&self, version: &str) -> SetupResult<PathBuf> {
        let mods_dir = self.layout.mods_dir(version);
        create_dir_safe(&mods_dir).await?;
        Ok(self.layout.install_dir(version))
    }

    /// Fail with a precondition error unless the install dir exists.
    pub async fn require_install_dir(&self, version: &str) -> SetupResult<PathBuf> {
        let dir = self.layout.install_dir(version);
        if !is_dir(&dir).await {
            return Err(SetupError::Precondition(format!(
                "No install directory for {version}. Run setup first."
            )));
        }
        Ok(dir)
    }

    /// Same as [`Self::require_install_dir`] for `<version>/mods`.
    pub async fn require_mods_dir(&self, version: &str) -> SetupResult<PathBuf> {
        let dir = self.layout.mods_dir(version);
        if !is_dir(&dir).await {
            return Err(SetupError::Precondition(format!(
                "No mods directory for {version}. Run setup first."
            )));
        }
        Ok(dir)
    }

    /// Best-effort look at the disk. Missing directories read as "not installed".
    pub async fn inspect(&self, version: &str) -> DiskInspection {
        let mut inspection = DiskInspection::default();
        let install_dir = self.layout.install_dir(version);
        if !is_dir(&install_dir).await {
            return inspection;
        }
        inspection.installed = true;
        inspection.fabric_installed = true;

        let mods_dir = self.layout.mods_dir(version);
        let mut entries = match tokio::fs::read_dir(&mods_dir).await {
            Ok(entries) => entries,
            Err(_) => return inspection,
        };

        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    inspection.observe_mod_file(&entry.file_name().to_string_lossy());
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Cannot list {:?}: {}", mods_dir, e);
                    break;
                }
            }
        }

        inspection
    }

    /// Copy a pre-built add-on jar into the version's `mods/` directory.
    pub async fn install_addon_jar(&self, version: &str, jar: &Path) -> SetupResult<PathBuf> {
        let mods_dir = self.require_mods_dir(version).await?;

        let file_name = match jar.file_name() {
            Some(name) if is_file(jar).await => name.to_owned(),
            _ => {
                return Err(SetupError::Precondition(format!(
                    "Add-on file not found: {}",
                    jar.display()
                )))
            }
        };

        let dest = mods_dir.join(file_name);
        tokio::fs::copy(jar, &dest)
            .await
            .map_err(|e| SetupError::io(&dest, e))?;

        info!("Installed {:?} into {:?}", jar, mods_dir);
        Ok(dest)
    }
}

async fn create_dir_safe(path: &Path) -> SetupResult<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| SetupError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
