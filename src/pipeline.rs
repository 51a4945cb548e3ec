//! Pipeline Orchestrator
//!
//! Wires authentication, listing, download, transcription and sheet
//! logging into one sequential pass. A failure in any per-file step aborts
//! the whole run; remaining files are left for a later invocation.

use crate::auth::{GoogleAuth, TokenProvider};
use crate::config::Config;
use crate::drive::{DownloadOutcome, DownloadProgress, DriveClient, ProgressCallback};
use crate::sheets::{viewer_link, SheetsClient};
use crate::transcription::WhisperClient;
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

const BAR_WIDTH: usize = 40;

/// Counters for one pipeline pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Videos reported by the remote folder
    pub listed: usize,
    /// Videos fetched in this pass
    pub downloaded: usize,
    /// Videos skipped because a local file already existed
    pub skipped: usize,
    /// Rows appended to the spreadsheet
    pub logged: usize,
}

/// One-pass batch pipeline over a Drive folder
pub struct Pipeline {
    config: Config,
    drive: DriveClient,
    transcriber: WhisperClient,
    sheets: SheetsClient,
}

impl Pipeline {
    /// Authenticate and assemble the API clients.
    pub async fn new(config: Config) -> Result<Self> {
        info!("[INFO] Authenticating with Google Drive and Sheets...");
        let auth = GoogleAuth::from_key_file(&config.key_file)
            .await
            .context("authentication failed")?;
        let tokens: Arc<dyn TokenProvider> = Arc::new(auth);

        let drive = DriveClient::new(tokens.clone());
        let sheets = SheetsClient::new(tokens, &config.spreadsheet_id, &config.sheet_name);
        let transcriber = WhisperClient::new(&config.openai_api_key);

        Ok(Self {
            config,
            drive,
            transcriber,
            sheets,
        })
    }

    /// Assemble a pipeline from preconstructed clients (used by tests).
    pub fn with_clients(
        config: Config,
        drive: DriveClient,
        transcriber: WhisperClient,
        sheets: SheetsClient,
    ) -> Self {
        Self {
            config,
            drive,
            transcriber,
            sheets,
        }
    }

    /// Execute one full pass: list, then per file download, transcribe and
    /// log, strictly in listing order.
    pub async fn run(&self) -> Result<RunSummary> {
        let videos = self
            .drive
            .list_videos(&self.config.folder_id)
            .await
            .context("listing the Drive folder failed")?;

        let mut summary = RunSummary {
            listed: videos.len(),
            ..RunSummary::default()
        };

        if videos.is_empty() {
            info!("[INFO] No new videos found.");
            return Ok(summary);
        }

        info!("[DOWNLOAD] Found {} new video(s) to download.", videos.len());

        for video in &videos {
            let outcome = self
                .drive
                .download(video, &self.config.video_dir, Some(console_bar()))
                .await
                .with_context(|| format!("downloading {} failed", video.name))?;

            let video_path = match outcome {
                DownloadOutcome::Skipped => {
                    summary.skipped += 1;
                    continue;
                }
                DownloadOutcome::Downloaded(path) => {
                    finish_console_bar();
                    summary.downloaded += 1;
                    path
                }
            };
            info!("[DOWNLOAD] Saved to: {}", video_path.display());

            info!("[TRANSCRIBE] Transcribing: {}", video.name);
            let transcript = self
                .transcriber
                .transcribe_file(&video_path, &video.name, &self.config.transcript_dir)
                .await
                .with_context(|| format!("transcribing {} failed", video.name))?;

            info!("[LOG] Logging transcript to Google Sheet...");
            self.sheets
                .append_row(&video.name, &transcript, &video.id)
                .await
                .with_context(|| format!("logging {} failed", video.name))?;
            info!("[LOG] Entry added: {} | {}", video.name, viewer_link(&video.id));
            summary.logged += 1;
        }

        info!("[SUCCESS] All videos processed successfully.");
        Ok(summary)
    }
}

/// Coarse console progress bar, advanced one tick per chunk event.
fn console_bar() -> ProgressCallback {
    Box::new(|progress: DownloadProgress| {
        let filled = (progress.percent as usize * BAR_WIDTH) / 100;
        print!(
            "\r[DOWNLOAD] [{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            progress.percent
        );
        let _ = std::io::stdout().flush();
    })
}

fn finish_console_bar() {
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_starts_empty() {
        let summary = RunSummary::default();
        assert_eq!(summary.listed, 0);
        assert_eq!(summary.downloaded, 0);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.logged, 0);
    }

    #[test]
    fn test_console_bar_accepts_clamped_percent() {
        let bar = console_bar();
        bar(DownloadProgress {
            ticks: 250,
            percent: 100,
        });
        finish_console_bar();
    }
}
