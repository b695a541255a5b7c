use std::sync::Arc;

use crate::core::artifacts::{ArtifactSource, HttpArtifactSource};
use crate::core::downloader::Downloader;
use crate::core::error::SetupResult;
use crate::core::http::build_http_client;
use crate::core::instance::{InstallLayout, InstanceManager};
use crate::core::jobs::{JobStore, SetupPipeline};
use crate::core::loaders::{InstallerRunner, JavaInstallerRunner};
use crate::core::registry::ModrinthRegistry;
use crate::core::version::FabricMeta;

use super::settings::HelperSettings;

/// Shared by every request handler.
pub struct AppState {
    pub settings: HelperSettings,
    pub jobs: JobStore,
    pub instance_manager: InstanceManager,
    pub source: Arc<dyn ArtifactSource>,
    pub pipeline: Arc<SetupPipeline>,
}

impl AppState {
    /// Wire the production HTTP source and Java installer runner.
    pub fn new(settings: HelperSettings) -> SetupResult<Self> {
        let http_client = build_http_client()?;
        let source = HttpArtifactSource::new(
            FabricMeta::new(http_client.clone(), settings.fabric_meta_url.clone()),
            ModrinthRegistry::new(http_client.clone(), settings.modrinth_api_url.clone()),
            Downloader::new(http_client),
            settings.addon_project_id.clone(),
        );
        let runner = JavaInstallerRunner::new(settings.java_path.clone());

        Ok(Self::with_parts(settings, Arc::new(source), Arc::new(runner)))
    }

    pub fn with_parts(
        settings: HelperSettings,
        source: Arc<dyn ArtifactSource>,
        runner: Arc<dyn InstallerRunner>,
    ) -> Self {
        let jobs = JobStore::new();
        let instance_manager = InstanceManager::new(InstallLayout::new(settings.data_dir.clone()));
        let pipeline = Arc::new(SetupPipeline::new(
            jobs.clone(),
            instance_manager.clone(),
            source.clone(),
            runner,
            settings.fabric_installer_url.clone(),
        ));

        Self {
            settings,
            jobs,
            instance_manager,
            source,
            pipeline,
        }
    }
}
