//! Downloader
//!
//! Stream one remote video to the local video directory, skipping files
//! that already exist there.

use super::{DriveClient, RemoteVideo};
use crate::auth::AuthError;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Download progress callback
pub type ProgressCallback = Box<dyn Fn(DownloadProgress) + Send>;

/// Coarse download progress: one tick per received chunk, clamped to a
/// percentage scale. Deliberately not byte-accurate.
#[derive(Debug, Clone, Copy)]
pub struct DownloadProgress {
    pub ticks: u64,
    pub percent: u8,
}

/// Result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A file with the same name already exists locally; the remote
    /// content was not requested.
    Skipped,
    /// The video was written to this path.
    Downloaded(PathBuf),
}

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("authentication: {0}")]
    Auth(#[from] AuthError),

    #[error("network error: {0}")]
    Network(String),

    #[error("Drive API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriveClient {
    /// Download `video` into `dest_dir`, keeping its remote name.
    ///
    /// Returns [`DownloadOutcome::Skipped`] without touching the network
    /// when `{dest_dir}/{name}` already exists. The local filename is the
    /// completion marker consulted by later runs; a failed transfer leaves
    /// whatever was written so far in place.
    pub async fn download(
        &self,
        video: &RemoteVideo,
        dest_dir: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadOutcome, DownloadError> {
        let dest_path = dest_dir.join(&video.name);
        if dest_path.exists() {
            tracing::debug!("{} already present, skipping", video.name);
            return Ok(DownloadOutcome::Skipped);
        }

        tracing::info!("[DOWNLOAD] Downloading: {}", video.name);
        let token = self.tokens.bearer_token().await?;
        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, video.id))
            .query(&[("alt", "media")])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| DownloadError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DownloadError::Api(format!("HTTP {}: {}", status, body)));
        }

        let mut file = tokio::fs::File::create(&dest_path).await?;
        let mut stream = response.bytes_stream();
        let mut ticks: u64 = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| DownloadError::Network(e.to_string()))?;
            file.write_all(&chunk).await?;

            ticks += 1;
            if let Some(ref callback) = progress {
                callback(DownloadProgress {
                    ticks,
                    percent: ticks.min(100) as u8,
                });
            }
        }

        file.flush().await?;
        Ok(DownloadOutcome::Downloaded(dest_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct FixedToken;

    #[async_trait]
    impl TokenProvider for FixedToken {
        async fn bearer_token(&self) -> Result<String, AuthError> {
            Ok("test-token".to_string())
        }
    }

    fn client(base_url: &str) -> DriveClient {
        DriveClient::with_base_url(Arc::new(FixedToken), base_url)
    }

    fn video(id: &str, name: &str) -> RemoteVideo {
        RemoteVideo {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_download_writes_file_under_remote_name() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files/vid-1")
            .match_query(mockito::Matcher::UrlEncoded("alt".into(), "media".into()))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(b"fake video bytes")
            .create();

        let tmp = tempfile::tempdir().unwrap();
        let outcome = client(&server.url())
            .download(&video("vid-1", "clip1.mp4"), tmp.path(), None)
            .await
            .unwrap();

        let expected = tmp.path().join("clip1.mp4");
        assert_eq!(outcome, DownloadOutcome::Downloaded(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"fake video bytes");
    }

    #[tokio::test]
    async fn test_existing_file_skips_without_network() {
        let mut server = mockito::Server::new_async().await;
        let media = server
            .mock("GET", "/files/vid-1")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(b"remote bytes")
            .expect(0)
            .create();

        let tmp = tempfile::tempdir().unwrap();
        let local = tmp.path().join("clip1.mp4");
        std::fs::write(&local, b"already here").unwrap();

        let outcome = client(&server.url())
            .download(&video("vid-1", "clip1.mp4"), tmp.path(), None)
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Skipped);
        // The local copy is left untouched
        assert_eq!(std::fs::read(local).unwrap(), b"already here");
        media.assert();
    }

    #[tokio::test]
    async fn test_progress_ticks_per_chunk() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files/vid-1")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(vec![0u8; 32 * 1024])
            .create();

        let tmp = tempfile::tempdir().unwrap();
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_seen = ticks.clone();
        let callback: ProgressCallback = Box::new(move |p| {
            ticks_seen.store(p.ticks, Ordering::SeqCst);
            assert!(p.percent <= 100);
        });

        client(&server.url())
            .download(&video("vid-1", "clip1.mp4"), tmp.path(), Some(callback))
            .await
            .unwrap();

        assert!(ticks.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_backend_error_fails_the_download() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files/vid-1")
            .match_query(mockito::Matcher::Any)
            .with_status(404)
            .with_body("not found")
            .create();

        let tmp = tempfile::tempdir().unwrap();
        let result = client(&server.url())
            .download(&video("vid-1", "clip1.mp4"), tmp.path(), None)
            .await;

        assert!(matches!(result, Err(DownloadError::Api(_))));
        // No destination file is created for a rejected request
        assert!(!tmp.path().join("clip1.mp4").exists());
    }
}
