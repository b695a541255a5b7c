use super::model::Job;
use super::store::JobStore;
use crate::core::instance::{DiskInspection, InstanceManager};

/// Answer to a status poll.
#[derive(Debug, Clone)]
pub enum StatusReport {
    /// A job for this version is (or was) tracked by this process.
    Tracked(Job),
    /// Nothing tracked; best-effort look at the install directory instead.
    /// May disagree with reality, e.g. after a run from a previous process.
    OnDisk(DiskInspection),
}

pub async fn query_status(jobs: &JobStore, instances: &InstanceManager, key: &str) -> StatusReport {
    match jobs.get(key).await {
        Some(job) => StatusReport::Tracked(job),
        None => StatusReport::OnDisk(instances.inspect(key).await),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::core::instance::InstallLayout;

    #[tokio::test]
    async fn untracked_and_absent_is_not_installed() {
        let root = tempfile::tempdir().unwrap();
        let instances = InstanceManager::new(InstallLayout::new(root.path()));

        match query_status(&JobStore::new(), &instances, "1.20.1").await {
            StatusReport::OnDisk(inspection) => {
                assert!(!inspection.installed);
                assert!(!inspection.fabric_api_installed);
                assert!(!inspection.ai_mod_installed);
            }
            other => panic!("expected disk report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tracked_job_wins_over_disk() {
        let root = tempfile::tempdir().unwrap();
        let instances = InstanceManager::new(InstallLayout::new(root.path()));
        instances.prepare_dirs("1.20.1").await.unwrap();
        let jobs = JobStore::new();
        jobs.upsert(Job::started("1.20.1", Uuid::nil(), "working")).await;

        assert!(matches!(
            query_status(&jobs, &instances, "1.20.1").await,
            StatusReport::Tracked(job) if job.message == "working"
        ));
    }
}
