// ─── Fabric Meta ───
// Game and loader version lookups against meta.fabricmc.net.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{SetupError, SetupResult};

pub const FABRIC_META_BASE: &str = "https://meta.fabricmc.net/v2";

/// One entry of `GET /versions/game`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GameVersion {
    pub version: String,
    pub stable: bool,
}

/// One entry of `GET /versions/loader/{game}`.
#[derive(Debug, Deserialize)]
struct LoaderEntry {
    loader: LoaderVersion,
}

#[derive(Debug, Deserialize)]
struct LoaderVersion {
    version: String,
}

/// Client for the Fabric metadata service.
#[derive(Clone)]
pub struct FabricMeta {
    client: reqwest::Client,
    base_url: String,
}

impl FabricMeta {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// All game versions known to Fabric, newest first.
    pub async fn game_versions(&self) -> SetupResult<Vec<GameVersion>> {
        let url = format!("{}/versions/game", self.base_url);
        let body = self.get_text(&url).await?;
        let versions: Vec<GameVersion> = serde_json::from_str(&body)?;
        info!("Loaded {} game versions from Fabric Meta", versions.len());
        Ok(versions)
    }

    /// The newest loader version for `minecraft_version`.
    ///
    /// An empty list from the service is `NotFound`.
    pub async fn latest_loader_version(&self, minecraft_version: &str) -> SetupResult<String> {
        let url = format!("{}/versions/loader/{}", self.base_url, minecraft_version);
        let body = self.get_text(&url).await?;
        first_loader_version(&body)?.ok_or_else(|| {
            warn!("Fabric Meta lists no loader for {}", minecraft_version);
            SetupError::NotFound(format!("Fabric Loader for Minecraft {minecraft_version}"))
        })
    }

    async fn get_text(&self, url: &str) -> SetupResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

fn first_loader_version(body: &str) -> SetupResult<Option<String>> {
    let entries: Vec<LoaderEntry> = serde_json::from_str(body)?;
    Ok(entries.into_iter().next().map(|entry| entry.loader.version))
}
