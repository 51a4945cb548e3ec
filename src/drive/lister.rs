//! Remote Lister
//!
//! Enumerate the video files of one Drive folder.

use super::DriveClient;
use crate::auth::AuthError;
use serde::Deserialize;

/// MIME type the folder query is filtered to
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// One video file as reported by the backend
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVideo {
    pub id: String,
    pub name: String,
}

/// Listing errors
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("authentication: {0}")]
    Auth(#[from] AuthError),

    #[error("network error: {0}")]
    Network(String),

    #[error("Drive API error: {0}")]
    Api(String),
}

/// `files.list` response envelope
#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<RemoteVideo>,
}

impl DriveClient {
    /// List the videos of `folder_id` in whatever order the backend yields.
    ///
    /// An empty result is a valid terminal state, not an error.
    pub async fn list_videos(&self, folder_id: &str) -> Result<Vec<RemoteVideo>, DriveError> {
        let token = self.tokens.bearer_token().await?;
        let query = format!("'{}' in parents and mimeType='{}'", folder_id, VIDEO_MIME_TYPE);

        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .query(&[("q", query.as_str()), ("fields", "files(id, name)")])
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| DriveError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DriveError::Api(format!("HTTP {}: {}", status, body)));
        }

        let list: FileList = response
            .json()
            .await
            .map_err(|e| DriveError::Api(e.to_string()))?;

        tracing::debug!("folder {} listed {} video(s)", folder_id, list.files.len());
        Ok(list.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenProvider;
    use async_trait::async_trait;
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

    #[test]
    fn test_file_list_deserialization() {
        let json = r#"{"files": [{"id": "abc", "name": "clip1.mp4"}]}"#;
        let list: FileList = serde_json::from_str(json).unwrap();
        assert_eq!(list.files.len(), 1);
        assert_eq!(list.files[0].id, "abc");
        assert_eq!(list.files[0].name, "clip1.mp4");
    }

    #[test]
    fn test_file_list_missing_files_field() {
        // Drive omits `files` entirely for an empty folder
        let list: FileList = serde_json::from_str("{}").unwrap();
        assert!(list.files.is_empty());
    }

    #[tokio::test]
    async fn test_list_videos_sends_folder_query() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "q".into(),
                    "'folder-1' in parents and mimeType='video/mp4'".into(),
                ),
                mockito::Matcher::UrlEncoded("fields".into(), "files(id, name)".into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(r#"{"files": [{"id": "a1", "name": "one.mp4"}, {"id": "b2", "name": "two.mp4"}]}"#)
            .create();

        let videos = client(&server.url()).list_videos("folder-1").await.unwrap();

        // Backend order is preserved
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].name, "one.mp4");
        assert_eq!(videos[1].name, "two.mp4");
    }

    #[tokio::test]
    async fn test_list_videos_empty_folder() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"files": []}"#)
            .create();

        let videos = client(&server.url()).list_videos("folder-1").await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_list_videos_backend_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("insufficient permissions")
            .create();

        let result = client(&server.url()).list_videos("folder-1").await;
        match result {
            Err(DriveError::Api(msg)) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("insufficient permissions"));
            }
            other => panic!("expected API error, got {:?}", other.map(|v| v.len())),
        }
    }
}
