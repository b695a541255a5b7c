use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::loaders::FABRIC_INSTALLER_URL;
use crate::core::registry::{FABRIC_API_PROJECT_ID, MODRINTH_API_BASE};
use crate::core::version::FABRIC_META_BASE;

const STATE_DIR_NAME: &str = ".minecraft-ai-launcher";
const ADDON_JAR_NAME: &str = "minecraft-ai-builder-1.0.0.jar";
const SETTINGS_FILE: &str = "helper_settings.json";
const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration.
///
/// Resolved as: defaults, then `helper_settings.json` in the state directory,
/// then command-line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperSettings {
    /// Root state directory. Chosen before the settings file is read, so it is
    /// never taken from the file.
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Pre-built companion add-on copied by `install-mod`.
    pub addon_jar: PathBuf,
    /// Java executable used to run the Fabric installer.
    pub java_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub fabric_meta_url: String,
    pub modrinth_api_url: String,
    pub addon_project_id: String,
    pub fabric_installer_url: String,
}

impl Default for HelperSettings {
    fn default() -> Self {
        let home = home_dir();
        Self {
            data_dir: home.join(STATE_DIR_NAME),
            addon_jar: home.join(ADDON_JAR_NAME),
            java_path: PathBuf::from("java"),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            fabric_meta_url: FABRIC_META_BASE.to_string(),
            modrinth_api_url: MODRINTH_API_BASE.to_string(),
            addon_project_id: FABRIC_API_PROJECT_ID.to_string(),
            fabric_installer_url: FABRIC_INSTALLER_URL.to_string(),
        }
    }
}

impl HelperSettings {
    /// Load settings for the state directory `data_dir` (default when `None`).
    pub fn load(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(|| Self::default().data_dir);
        let mut settings = load_settings_from_disk(&data_dir).unwrap_or_default();
        settings.data_dir = data_dir;
        settings
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }
}

fn load_settings_from_disk(data_dir: &Path) -> Option<HelperSettings> {
    let path = data_dir.join(SETTINGS_FILE);
    let raw = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => {
            info!("Loaded settings from {:?}", path);
            Some(settings)
        }
        Err(e) => {
            warn!("Ignoring unreadable settings file {:?}: {}", path, e);
            None
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_localhost() {
        let settings = HelperSettings::default();
        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(settings.java_path, PathBuf::from("java"));
        assert!(settings.data_dir.ends_with(STATE_DIR_NAME));
    }

    #[test]
    fn file_overrides_only_listed_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"port": 8123, "java_path": "/opt/jdk/bin/java", "data_dir": "/elsewhere"}"#,
        )
        .unwrap();

        let settings = HelperSettings::load(Some(dir.path().to_path_buf()));

        assert_eq!(settings.port, 8123);
        assert_eq!(settings.java_path, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(settings.data_dir, dir.path());
        assert_eq!(settings.fabric_meta_url, FABRIC_META_BASE);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();

        let settings = HelperSettings::load(Some(dir.path().to_path_buf()));
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.settings_path(), dir.path().join(SETTINGS_FILE));
    }
}
