//! Whisper API Client
//!
//! Cloud transcription of local video files via OpenAI's Whisper API.

use std::path::{Path, PathBuf};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const DEFAULT_MODEL: &str = "whisper-1";
const TRANSCRIPT_EXTENSION: &str = "txt";

/// Transcription errors
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("transcription failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whisper API response
#[derive(Debug, serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Whisper API transcription client
pub struct WhisperClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl WhisperClient {
    /// Create a client against the production endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.into(),
        }
    }

    /// Transcribe the file at `path` and persist the text next to the
    /// other transcripts as `{transcript_dir}/{base name}.txt`.
    ///
    /// The call suspends until the service has produced the full text;
    /// there is no partial or streaming result. The returned string is
    /// byte-identical to the persisted transcript file.
    pub async fn transcribe_file(
        &self,
        path: &Path,
        name: &str,
        transcript_dir: &Path,
    ) -> Result<String, TranscriptionError> {
        let bytes = tokio::fs::read(path).await?;

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str("video/mp4")
            .map_err(|e| TranscriptionError::Failed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Failed(e.to_string()))?;

        let transcript_path = transcript_path(transcript_dir, name);
        tokio::fs::write(&transcript_path, &parsed.text).await?;
        tracing::debug!("transcript saved to {:?}", transcript_path);

        Ok(parsed.text)
    }
}

/// Derive the transcript path for a video name by swapping the extension.
pub fn transcript_path(transcript_dir: &Path, video_name: &str) -> PathBuf {
    transcript_dir.join(Path::new(video_name).with_extension(TRANSCRIPT_EXTENSION))
}
