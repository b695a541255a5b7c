// ─── Artifact Fetcher ───
// Everything the setup job needs from the network, behind one trait so the
// job pipeline can run against stubs.

use std::path::Path;

use async_trait::async_trait;
use tracing::warn;

use crate::core::downloader::Downloader;
use crate::core::error::SetupResult;
use crate::core::registry::{AddonFile, ModrinthRegistry};
use crate::core::version::{FabricMeta, GameVersion};

#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Game versions offered by the metadata service, in service order.
    async fn game_versions(&self) -> SetupResult<Vec<GameVersion>>;

    /// Loader version for `minecraft_version`, or `None` when the service has
    /// none or cannot be reached.
    async fn resolve_loader_version(&self, minecraft_version: &str) -> Option<String>;

    /// Primary add-on file compatible with `minecraft_version`, or `None`.
    async fn resolve_addon(&self, minecraft_version: &str) -> Option<AddonFile>;

    /// Stream `url` into `dest`.
    async fn download(&self, url: &str, dest: &Path) -> SetupResult<()>;
}

/// Production source: Fabric Meta + Modrinth + the streaming downloader.
pub struct HttpArtifactSource {
    meta: FabricMeta,
    registry: ModrinthRegistry,
    downloader: Downloader,
    addon_project_id: String,
}

impl HttpArtifactSource {
    pub fn new(
        meta: FabricMeta,
        registry: ModrinthRegistry,
        downloader: Downloader,
        addon_project_id: impl Into<String>,
    ) -> Self {
        Self {
            meta,
            registry,
            downloader,
            addon_project_id: addon_project_id.into(),
        }
    }
}

#[async_trait]
impl ArtifactSource for HttpArtifactSource {
    async fn game_versions(&self) -> SetupResult<Vec<GameVersion>> {
        self.meta.game_versions().await
    }

    async fn resolve_loader_version(&self, minecraft_version: &str) -> Option<String> {
        match self.meta.latest_loader_version(minecraft_version).await {
            Ok(version) => Some(version),
            Err(err) => {
                warn!("Cannot resolve Fabric Loader for {}: {}", minecraft_version, err);
                None
            }
        }
    }

    async fn resolve_addon(&self, minecraft_version: &str) -> Option<AddonFile> {
        match self
            .registry
            .resolve_fabric_file(&self.addon_project_id, minecraft_version)
            .await
        {
            Ok(file) => Some(file),
            Err(err) => {
                warn!(
                    "Cannot resolve {} for {}: {}",
                    self.addon_project_id, minecraft_version, err
                );
                None
            }
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> SetupResult<()> {
        self.downloader.download_file(url, dest).await.map(|_| ())
    }
}
