//! Drive Module
//!
//! Listing and downloading of the remote video folder.

mod downloader;
mod lister;

pub use downloader::*;
pub use lister::*;

use crate::auth::TokenProvider;
use std::sync::Arc;

const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

/// Drive v3 REST client
pub struct DriveClient {
    pub(crate) http: reqwest::Client,
    pub(crate) tokens: Arc<dyn TokenProvider>,
    pub(crate) base_url: String,
}

impl DriveClient {
    /// Create a client against the production endpoint
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(tokens, DRIVE_API_URL)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(tokens: Arc<dyn TokenProvider>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            base_url: base_url.into(),
        }
    }
}
