//! Sheet Logger
//!
//! Append one row per processed video to a fixed spreadsheet range.

use crate::auth::{AuthError, TokenProvider};
use std::sync::Arc;

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_VIEWER_URL: &str = "https://drive.google.com/file/d";

/// Spreadsheet errors
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("authentication: {0}")]
    Auth(#[from] AuthError),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("Sheets API error: {0}")]
    ApiError(String),
}

/// Sheets v4 REST client bound to one spreadsheet tab
pub struct SheetsClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    spreadsheet_id: String,
    sheet_name: String,
    base_url: String,
}

impl SheetsClient {
    /// Create a client against the production endpoint
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self::with_base_url(tokens, spreadsheet_id, sheet_name, SHEETS_API_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(
        tokens: Arc<dyn TokenProvider>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            base_url: base_url.into(),
        }
    }

    /// Append `[title, transcript, viewer link]` to the `A:C` range of the
    /// configured tab. The backend chooses the next empty row; nothing is
    /// updated in place and nothing guards against duplicates.
    pub async fn append_row(
        &self,
        title: &str,
        transcript: &str,
        file_id: &str,
    ) -> Result<(), SheetsError> {
        let token = self.tokens.bearer_token().await?;
        let link = viewer_link(file_id);
        let url = format!(
            "{}/{}/values/{}!A:C:append",
            self.base_url, self.spreadsheet_id, self.sheet_name
        );
        let body = serde_json::json!({ "values": [[title, transcript, link]] });

        let response = self
            .http
            .post(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetsError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SheetsError::ApiError(format!("HTTP {}: {}", status, text)));
        }

        Ok(())
    }
}

/// Construct the web viewer URL for a remote file id.
///
/// Pure string interpolation; the target is never checked against the
/// backend.
pub fn viewer_link(file_id: &str) -> String {
    format!("{}/{}/view", DRIVE_VIEWER_URL, file_id)
}
