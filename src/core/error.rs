use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the setup helper.
/// Every module returns `Result<T, SetupError>`.
#[derive(Debug, Error)]
pub enum SetupError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Remote metadata not found: {0}")]
    NotFound(String),

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {path:?}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("Unexpected response shape: {0}")]
    SchemaMismatch(#[from] serde_json::Error),

    // ── Installer process ───────────────────────────────
    #[error("Cannot start installer with {program:?}: {source}")]
    InstallerLaunch {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("Installer exited with code {code:?}")]
    InstallerExit { code: Option<i32> },

    #[error("Installer did not finish within {0} seconds")]
    InstallerTimeout(u64),

    // ── Request / local state ───────────────────────────
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    InvalidRequest(String),
}

/// Convenience alias used throughout the crate.
pub type SetupResult<T> = Result<T, SetupError>;

impl SetupError {
    /// Wraps an IO error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SetupError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the failure was caused by the caller rather than the helper.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SetupError::Precondition(_) | SetupError::InvalidRequest(_)
        )
    }
}

impl From<std::io::Error> for SetupError {
    fn from(source: std::io::Error) -> Self {
        SetupError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl serde::Serialize for SetupError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
