//! Configuration
//!
//! Process-wide settings read once at startup from environment variables
//! and passed explicitly into every component.

use std::path::PathBuf;

/// Logical sheet tab that receives the appended rows.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

const DEFAULT_KEY_FILE: &str = "credentials.json";
const DEFAULT_VIDEO_DIR: &str = "videos";
const DEFAULT_TRANSCRIPT_DIR: &str = "transcripts";

/// Immutable run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Drive folder id that is scanned for videos
    pub folder_id: String,
    /// Spreadsheet id that receives one row per processed video
    pub spreadsheet_id: String,
    /// Sheet tab name within the spreadsheet
    pub sheet_name: String,
    /// Path to the service-account key file
    pub key_file: PathBuf,
    /// API key for the transcription service
    pub openai_api_key: String,
    /// Directory that downloaded videos land in
    pub video_dir: PathBuf,
    /// Directory that transcript text files land in
    pub transcript_dir: PathBuf,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// `DRIVE_FOLDER_ID`, `SPREADSHEET_ID` and `OPENAI_API_KEY` are
    /// required. The key file and the local directories default to
    /// conventional paths in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            folder_id: require("DRIVE_FOLDER_ID")?,
            spreadsheet_id: require("SPREADSHEET_ID")?,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            key_file: optional("GOOGLE_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KEY_FILE)),
            openai_api_key: require("OPENAI_API_KEY")?,
            video_dir: optional("VIDEO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VIDEO_DIR)),
            transcript_dir: optional("TRANSCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_DIR)),
        })
    }

    /// Create the video and transcript directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.video_dir)?;
        std::fs::create_dir_all(&self.transcript_dir)?;
        Ok(())
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
