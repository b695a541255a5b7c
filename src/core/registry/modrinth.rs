use serde::Deserialize;
use tracing::{debug, info};

use crate::core::error::{SetupError, SetupResult};

pub const MODRINTH_API_BASE: &str = "https://api.modrinth.com/v2";

/// Loader name used to filter registry versions.
pub const FABRIC_LOADER_NAME: &str = "fabric";

/// One entry of `GET /project/{id}/version`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectVersion {
    #[serde(default)]
    pub version_number: Option<String>,
    pub game_versions: Vec<String>,
    pub loaders: Vec<String>,
    pub files: Vec<VersionFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionFile {
    pub url: String,
    pub primary: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub hashes: FileHashes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileHashes {
    pub sha1: Option<String>,
}

/// The primary file of the first compatible add-on version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonFile {
    pub url: String,
    pub filename: Option<String>,
    pub sha1: Option<String>,
}

impl AddonFile {
    /// File name to use inside `mods/`: the URL's last path segment, then the
    /// registry's declared name, then `fallback`.
    pub fn local_file_name(&self, fallback: &str) -> String {
        reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_owned))
            })
            .filter(|segment| !segment.is_empty())
            .or_else(|| self.filename.clone())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Client for the Modrinth package registry.
#[derive(Clone)]
pub struct ModrinthRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl ModrinthRegistry {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn project_versions(&self, project_id: &str) -> SetupResult<Vec<ProjectVersion>> {
        let url = format!("{}/project/{}/version", self.base_url, project_id);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let versions: Vec<ProjectVersion> = serde_json::from_str(&body)?;
        debug!("Modrinth lists {} versions of {}", versions.len(), project_id);
        Ok(versions)
    }

    /// Resolve the primary file of `project_id` for `minecraft_version` on Fabric.
    pub async fn resolve_fabric_file(
        &self,
        project_id: &str,
        minecraft_version: &str,
    ) -> SetupResult<AddonFile> {
        let versions = self.project_versions(project_id).await?;
        let file = select_primary_file(&versions, minecraft_version, FABRIC_LOADER_NAME)
            .ok_or_else(|| {
                SetupError::NotFound(format!(
                    "{project_id} for Minecraft {minecraft_version} ({FABRIC_LOADER_NAME})"
                ))
            })?;
        info!("Resolved {} for {}: {}", project_id, minecraft_version, file.url);
        Ok(file)
    }
}

/// Scan versions in registry order for the first one supporting both the game
/// version and the loader, and return its primary file.
///
/// A compatible version without a primary file does not stop the scan.
pub fn select_primary_file(
    versions: &[ProjectVersion],
    minecraft_version: &str,
    loader: &str,
) -> Option<AddonFile> {
    versions
        .iter()
        .filter(|v| v.game_versions.iter().any(|g| g == minecraft_version))
        .filter(|v| v.loaders.iter().any(|l| l == loader))
        .find_map(|v| v.files.iter().find(|f| f.primary))
        .map(|file| AddonFile {
            url: file.url.clone(),
            filename: file.filename.clone(),
            sha1: file.hashes.sha1.clone(),
        })
}
