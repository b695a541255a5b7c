use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle of a setup job. `Success` and `Error` are terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Installing,
    Success,
    Error,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobPhase::Installing)
    }
}

/// One tracked installation attempt for a game version.
///
/// Serialized in the shape the web UI polls for: `status`, `progress`,
/// `message` and, on success, `install_dir`.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    #[serde(rename = "mc_version")]
    pub key: String,
    #[serde(rename = "status")]
    pub phase: JobPhase,
    pub progress: u8,
    pub message: String,
    #[serde(rename = "install_dir", skip_serializing_if = "Option::is_none")]
    pub result_path: Option<PathBuf>,
    pub run_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Fresh `installing` entry at progress 0.
    pub fn started(key: impl Into<String>, run_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: JobPhase::Installing,
            progress: 0,
            message: message.into(),
            result_path: None,
            run_id,
            updated_at: Utc::now(),
        }
    }

    pub fn advance(&mut self, progress: u8, message: impl Into<String>) {
        self.progress = progress;
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    /// Terminal failure. Progress stays where the failing phase left it.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = JobPhase::Error;
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    pub fn succeed(&mut self, install_dir: PathBuf, message: impl Into<String>) {
        self.phase = JobPhase::Success;
        self.progress = 100;
        self.message = message.into();
        self.result_path = Some(install_dir);
        self.updated_at = Utc::now();
    }
}
