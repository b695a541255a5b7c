use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::model::Job;

/// Process-wide map from game version to its latest job.
///
/// Every read and write is synchronized, but nothing stops two jobs for the
/// same key from running at once: both upsert the same entry and their
/// updates interleave. The last write wins.
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `job.key` wholesale.
    pub async fn upsert(&self, job: Job) {
        self.jobs.write().await.insert(job.key.clone(), job);
    }

    pub async fn get(&self, key: &str) -> Option<Job> {
        self.jobs.read().await.get(key).cloned()
    }

    /// All tracked jobs, ordered by key.
    pub async fn snapshot_all(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| a.key.cmp(&b.key));
        jobs
    }
}
