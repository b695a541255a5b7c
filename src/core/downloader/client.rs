use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{SetupError, SetupResult};

/// Streaming downloader writing response bodies straight to disk.
///
/// A failed download leaves whatever was already written in place. Callers
/// must treat the destination as undefined after an error.
#[derive(Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, chunk by chunk.
    ///
    /// Creates parent directories as needed. Returns the number of bytes written.
    pub async fn download_file(&self, url: &str, dest: &Path) -> SetupResult<u64> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SetupError::io(parent, e))?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SetupError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut written = 0_u64;
        // Scoped so the handle is closed before callers touch the file again.
        {
            let mut file = tokio::fs::File::create(dest)
                .await
                .map_err(|e| SetupError::io(dest, e))?;

            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk)
                    .await
                    .map_err(|e| SetupError::io(dest, e))?;
                written = written.saturating_add(chunk.len() as u64);
            }

            file.flush().await.map_err(|e| SetupError::io(dest, e))?;
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, written);
        Ok(written)
    }

    /// Validate an existing file's SHA-1.
    pub async fn validate_sha1(path: &Path, expected: &str) -> SetupResult<()> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| SetupError::io(path, e))?;
        let mut hasher = Sha1::new();
        hasher.update(&bytes);
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(SetupError::Sha1Mismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(())
    }
}
