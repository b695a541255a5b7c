// ─── Setup Pipeline ───
// The background sequence behind `POST /api/setup`:
//   resolve loader → create dirs → fetch installer → run installer → fetch Fabric API
// Each phase upserts the job before moving on. Failures are typed per phase
// and only turned into a user-facing message at the top.

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::model::Job;
use super::store::JobStore;
use crate::core::artifacts::ArtifactSource;
use crate::core::downloader::Downloader;
use crate::core::error::SetupError;
use crate::core::instance::InstanceManager;
use crate::core::loaders::{InstallContext, InstallerRunner};

const MSG_RESOLVING: &str = "Resolving Fabric Loader version...";
const MSG_DIRS_READY: &str = "Working directory created. Downloading Fabric installer...";
const MSG_RUNNING_INSTALLER: &str = "Running Fabric installer...";
const MSG_DOWNLOADING_ADDON: &str = "Downloading Fabric API...";
const MSG_ADDON_MISSING: &str =
    "Warning: no matching Fabric API version found. Please download it manually.";

const MSG_INSTALLER_DOWNLOAD_FAILED: &str = "Failed to download the Fabric installer.";
const MSG_INSTALLER_RUN_FAILED: &str = "Fabric installer failed to run. Check the Java installation.";
const MSG_ADDON_DOWNLOAD_FAILED: &str = "Failed to download Fabric API.";
const MSG_UNEXPECTED: &str = "Unexpected error while setting up the environment.";

const ADDON_FALLBACK_FILE: &str = "fabric-api.jar";

/// Why a setup run stopped. The wrapped error is kept for logging only.
#[derive(Debug, thiserror::Error)]
enum SetupFailure {
    #[error("no Fabric Loader version available")]
    NoLoaderVersion,
    #[error("installer download failed: {0}")]
    InstallerDownload(#[source] SetupError),
    #[error("installer run failed: {0}")]
    InstallerRun(#[source] SetupError),
    #[error("add-on download failed: {0}")]
    AddonDownload(#[source] SetupError),
    #[error("unexpected failure: {0}")]
    Unexpected(#[source] SetupError),
}

impl SetupFailure {
    fn user_message(&self, minecraft_version: &str) -> String {
        match self {
            SetupFailure::NoLoaderVersion => {
                format!("No compatible Fabric Loader version found for Minecraft {minecraft_version}.")
            }
            SetupFailure::InstallerDownload(_) => MSG_INSTALLER_DOWNLOAD_FAILED.into(),
            SetupFailure::InstallerRun(_) => MSG_INSTALLER_RUN_FAILED.into(),
            SetupFailure::AddonDownload(_) => MSG_ADDON_DOWNLOAD_FAILED.into(),
            SetupFailure::Unexpected(_) => MSG_UNEXPECTED.into(),
        }
    }
}

pub struct SetupPipeline {
    jobs: JobStore,
    instances: InstanceManager,
    source: Arc<dyn ArtifactSource>,
    runner: Arc<dyn InstallerRunner>,
    installer_url: String,
}

impl SetupPipeline {
    pub fn new(
        jobs: JobStore,
        instances: InstanceManager,
        source: Arc<dyn ArtifactSource>,
        runner: Arc<dyn InstallerRunner>,
        installer_url: impl Into<String>,
    ) -> Self {
        Self {
            jobs,
            instances,
            source,
            runner,
            installer_url: installer_url.into(),
        }
    }

    /// Record a fresh `installing` job for `minecraft_version` and run the
    /// setup in the background. Returns without waiting for it.
    pub async fn start(self: &Arc<Self>, minecraft_version: &str) -> Uuid {
        let run_id = Uuid::new_v4();
        let job = Job::started(minecraft_version, run_id, MSG_RESOLVING);
        self.jobs.upsert(job.clone()).await;

        let pipeline = Arc::clone(self);
        let span = info_span!("setup", mc_version = %minecraft_version, %run_id);
        tokio::spawn(
            async move {
                let fallback = job.clone();
                if AssertUnwindSafe(pipeline.run(job)).catch_unwind().await.is_err() {
                    error!("Setup task panicked");
                    let mut failed = fallback;
                    failed.fail(MSG_UNEXPECTED);
                    pipeline.jobs.upsert(failed).await;
                }
            }
            .instrument(span),
        );

        run_id
    }

    /// Drive `job` to a terminal state and return it.
    pub async fn run(&self, mut job: Job) -> Job {
        if let Err(failure) = self.execute(&mut job).await {
            error!(cause = %failure, "Setup of Minecraft {} failed", job.key);
            let message = failure.user_message(&job.key);
            job.fail(message);
            self.jobs.upsert(job.clone()).await;
        }
        job
    }

    async fn execute(&self, job: &mut Job) -> Result<(), SetupFailure> {
        let version = job.key.clone();

        let loader_version = self
            .source
            .resolve_loader_version(&version)
            .await
            .ok_or(SetupFailure::NoLoaderVersion)?;
        info!("Using Fabric Loader {} for Minecraft {}", loader_version, version);

        let install_dir = self
            .instances
            .prepare_dirs(&version)
            .await
            .map_err(SetupFailure::Unexpected)?;
        self.checkpoint(job, 20, MSG_DIRS_READY).await;

        let installer_path = self.instances.layout().installer_path();
        if tokio::fs::try_exists(&installer_path).await.unwrap_or(false) {
            info!("Fabric installer already present at {:?}", installer_path);
        } else {
            self.source
                .download(&self.installer_url, &installer_path)
                .await
                .map_err(SetupFailure::InstallerDownload)?;
        }
        self.checkpoint(job, 40, MSG_RUNNING_INSTALLER).await;

        self.runner
            .run(InstallContext {
                installer_path: &installer_path,
                minecraft_version: &version,
                loader_version: &loader_version,
                install_dir: &install_dir,
            })
            .await
            .map_err(SetupFailure::InstallerRun)?;
        self.checkpoint(job, 60, MSG_DOWNLOADING_ADDON).await;

        let warning = match self.source.resolve_addon(&version).await {
            Some(file) => {
                let dest = self
                    .instances
                    .layout()
                    .mods_dir(&version)
                    .join(file.local_file_name(ADDON_FALLBACK_FILE));
                self.source
                    .download(&file.url, &dest)
                    .await
                    .map_err(SetupFailure::AddonDownload)?;
                if let Some(expected) = file.sha1.as_deref() {
                    Downloader::validate_sha1(&dest, expected)
                        .await
                        .map_err(SetupFailure::AddonDownload)?;
                }
                None
            }
            None => {
                warn!("No Fabric API build for Minecraft {}", version);
                let progress = job.progress;
                self.checkpoint(job, progress, MSG_ADDON_MISSING).await;
                Some(MSG_ADDON_MISSING)
            }
        };

        job.succeed(install_dir.clone(), success_message(&version, &install_dir, warning));
        self.jobs.upsert(job.clone()).await;
        info!("Minecraft {} Fabric environment ready", version);
        Ok(())
    }

    async fn checkpoint(&self, job: &mut Job, progress: u8, message: &str) {
        job.advance(progress, message);
        self.jobs.upsert(job.clone()).await;
    }
}

fn success_message(version: &str, install_dir: &Path, warning: Option<&str>) -> String {
    let base = format!(
        "Minecraft {version} Fabric environment ready at {}",
        install_dir.display()
    );
    match warning {
        Some(warning) => format!("{base}. {warning}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::core::error::SetupResult;
    use crate::core::instance::InstallLayout;
    use crate::core::jobs::JobPhase;
    use crate::core::registry::AddonFile;
    use crate::core::version::GameVersion;

    #[derive(Default)]
    struct StubSource {
        loader: Option<String>,
        addon: Option<AddonFile>,
        fail_urls: Vec<String>,
        downloads: Mutex<Vec<(String, PathBuf)>>,
    }

    impl StubSource {
        fn with_loader() -> Self {
            Self {
                loader: Some("0.16.10".into()),
                ..Default::default()
            }
        }

        fn downloaded_urls(&self) -> Vec<String> {
            self.downloads
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ArtifactSource for StubSource {
        async fn game_versions(&self) -> SetupResult<Vec<GameVersion>> {
            Ok(vec![])
        }

        async fn resolve_loader_version(&self, _minecraft_version: &str) -> Option<String> {
            self.loader.clone()
        }

        async fn resolve_addon(&self, _minecraft_version: &str) -> Option<AddonFile> {
            self.addon.clone()
        }

        async fn download(&self, url: &str, dest: &Path) -> SetupResult<()> {
            self.downloads
                .lock()
                .unwrap()
                .push((url.to_string(), dest.to_path_buf()));
            if self.fail_urls.iter().any(|u| u == url) {
                return Err(SetupError::DownloadFailed {
                    url: url.to_string(),
                    status: 503,
                });
            }
            tokio::fs::write(dest, b"payload").await?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct StubRunner {
        fail: AtomicBool,
        calls: Mutex<Vec<(String, String, PathBuf)>>,
    }

    #[async_trait]
    impl InstallerRunner for StubRunner {
        async fn run(&self, ctx: InstallContext<'_>) -> SetupResult<()> {
            self.calls.lock().unwrap().push((
                ctx.minecraft_version.to_string(),
                ctx.loader_version.to_string(),
                ctx.install_dir.to_path_buf(),
            ));
            if self.fail.load(Ordering::SeqCst) {
                return Err(SetupError::InstallerExit { code: Some(1) });
            }
            Ok(())
        }
    }

    const INSTALLER_URL: &str = "https://maven.example/fabric-installer.jar";

    struct Harness {
        root: tempfile::TempDir,
        jobs: JobStore,
        source: Arc<StubSource>,
        runner: Arc<StubRunner>,
        pipeline: Arc<SetupPipeline>,
    }

    fn harness(source: StubSource, runner: StubRunner) -> Harness {
        let root = tempfile::tempdir().unwrap();
        let jobs = JobStore::new();
        let source = Arc::new(source);
        let runner = Arc::new(runner);
        let pipeline = Arc::new(SetupPipeline::new(
            jobs.clone(),
            InstanceManager::new(InstallLayout::new(root.path())),
            source.clone(),
            runner.clone(),
            INSTALLER_URL,
        ));
        Harness {
            root,
            jobs,
            source,
            runner,
            pipeline,
        }
    }

    async fn wait_for_terminal(h: &Harness, version: &str) -> Job {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let job = h.jobs.get(version).await.unwrap();
                if job.phase.is_terminal() {
                    return job;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap()
    }

    async fn run_to_end(h: &Harness, version: &str) -> Job {
        let job = Job::started(version, Uuid::new_v4(), MSG_RESOLVING);
        h.jobs.upsert(job.clone()).await;
        h.pipeline.run(job).await
    }

    fn fabric_api_file() -> AddonFile {
        AddonFile {
            url: "https://cdn.example/data/fabric-api-0.92.1+1.20.1.jar".into(),
            filename: None,
            sha1: None,
        }
    }

    #[tokio::test]
    async fn unresolvable_loader_ends_in_error_at_progress_zero() {
        let h = harness(StubSource::default(), StubRunner::default());

        let job = run_to_end(&h, "99.99").await;

        assert_eq!(job.phase, JobPhase::Error);
        assert_eq!(job.progress, 0);
        assert!(job.message.contains("No compatible Fabric Loader"));
        assert!(h.runner.calls.lock().unwrap().is_empty());
        assert_eq!(h.jobs.get("99.99").await.unwrap().phase, JobPhase::Error);
    }

    #[tokio::test]
    async fn existing_installer_is_not_downloaded_again() {
        let h = harness(StubSource::with_loader(), StubRunner::default());
        tokio::fs::write(h.root.path().join("fabric-installer.jar"), b"jar")
            .await
            .unwrap();

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Success);
        assert!(!h.source.downloaded_urls().contains(&INSTALLER_URL.to_string()));
        let calls = h.runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "0.16.10");
        assert_eq!(calls[0].2, h.root.path().join("1.20.1"));
    }

    #[tokio::test]
    async fn missing_installer_is_downloaded_first() {
        let h = harness(StubSource::with_loader(), StubRunner::default());

        run_to_end(&h, "1.20.1").await;

        let downloads = h.source.downloads.lock().unwrap();
        assert_eq!(downloads[0].0, INSTALLER_URL);
        assert_eq!(downloads[0].1, h.root.path().join("fabric-installer.jar"));
    }

    #[tokio::test]
    async fn installer_download_failure_stops_before_running() {
        let source = StubSource {
            fail_urls: vec![INSTALLER_URL.into()],
            ..StubSource::with_loader()
        };
        let h = harness(source, StubRunner::default());

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Error);
        assert_eq!(job.message, MSG_INSTALLER_DOWNLOAD_FAILED);
        assert_eq!(job.progress, 20);
        assert!(h.runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn installer_failure_is_reported_generically() {
        let runner = StubRunner {
            fail: AtomicBool::new(true),
            ..Default::default()
        };
        let h = harness(StubSource::with_loader(), runner);

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Error);
        assert_eq!(job.message, MSG_INSTALLER_RUN_FAILED);
        assert_eq!(job.progress, 40);
        assert!(job.result_path.is_none());
    }

    #[tokio::test]
    async fn compatible_addon_lands_in_mods_dir() {
        let source = StubSource {
            addon: Some(fabric_api_file()),
            ..StubSource::with_loader()
        };
        let h = harness(source, StubRunner::default());

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Success);
        assert_eq!(job.progress, 100);
        assert_eq!(job.result_path.as_deref(), Some(h.root.path().join("1.20.1").as_path()));
        assert!(job.message.contains(&h.root.path().join("1.20.1").display().to_string()));
        assert!(h
            .root
            .path()
            .join("1.20.1/mods/fabric-api-0.92.1+1.20.1.jar")
            .is_file());
    }

    #[tokio::test]
    async fn addon_download_failure_is_an_error() {
        let file = fabric_api_file();
        let source = StubSource {
            fail_urls: vec![file.url.clone()],
            addon: Some(file),
            ..StubSource::with_loader()
        };
        let h = harness(source, StubRunner::default());

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Error);
        assert_eq!(job.message, MSG_ADDON_DOWNLOAD_FAILED);
        assert_eq!(job.progress, 60);
    }

    #[tokio::test]
    async fn addon_checksum_mismatch_is_an_error() {
        let source = StubSource {
            addon: Some(AddonFile {
                sha1: Some("0000000000000000000000000000000000000000".into()),
                ..fabric_api_file()
            }),
            ..StubSource::with_loader()
        };
        let h = harness(source, StubRunner::default());

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Error);
        assert_eq!(job.message, MSG_ADDON_DOWNLOAD_FAILED);
    }

    #[tokio::test]
    async fn missing_addon_still_succeeds_with_warning() {
        let h = harness(StubSource::with_loader(), StubRunner::default());

        let job = run_to_end(&h, "1.20.1").await;

        assert_eq!(job.phase, JobPhase::Success);
        assert!(job.message.contains(MSG_ADDON_MISSING));
    }

    #[tokio::test]
    async fn rerun_replaces_previous_entry() {
        let h = harness(StubSource::with_loader(), StubRunner::default());
        let first = run_to_end(&h, "1.20.1").await;
        assert_eq!(first.phase, JobPhase::Success);
        assert!(first.result_path.is_some());

        h.runner.fail.store(true, Ordering::SeqCst);
        let run_id = h.pipeline.start("1.20.1").await;
        let finished = wait_for_terminal(&h, "1.20.1").await;

        assert_eq!(finished.run_id, run_id);
        assert_ne!(finished.run_id, first.run_id);
        assert_eq!(finished.phase, JobPhase::Error);
        assert_eq!(finished.message, MSG_INSTALLER_RUN_FAILED);
        assert!(finished.result_path.is_none());
        assert_eq!(h.jobs.snapshot_all().await.len(), 1);
    }

    #[tokio::test]
    async fn start_returns_before_completion_and_job_finishes() {
        let h = harness(StubSource::default(), StubRunner::default());

        let run_id = h.pipeline.start("99.99").await;
        let initial = h.jobs.get("99.99").await.unwrap();
        assert_eq!(initial.run_id, run_id);

        let finished = wait_for_terminal(&h, "99.99").await;

        assert_eq!(finished.phase, JobPhase::Error);
        assert_eq!(finished.progress, 0);
    }
}
