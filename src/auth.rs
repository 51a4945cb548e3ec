//! Google Authentication
//!
//! Service-account credentials authorized for the fixed Drive + Sheets
//! scope pair. One handle is built per run and shared read-only by every
//! remote call.

use async_trait::async_trait;
use std::path::Path;
use yup_oauth2::authenticator::{Authenticator, DefaultHyperClient, HyperClientBuilder};
use yup_oauth2::ServiceAccountAuthenticator;

type DefaultConnector = <DefaultHyperClient as HyperClientBuilder>::Connector;

/// Scopes requested for the service account: Drive for listing and
/// downloading, Sheets for appending rows.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/spreadsheets",
];

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to load service account key: {0}")]
    Key(#[from] std::io::Error),

    #[error("token exchange failed: {0}")]
    Token(#[from] yup_oauth2::Error),

    #[error("authorizer returned an empty access token")]
    EmptyToken,
}

/// Source of bearer tokens for the Google REST clients.
///
/// The production implementation is [`GoogleAuth`]; tests substitute a
/// fixture that hands out a constant token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, AuthError>;
}

/// Service-account credential handle
pub struct GoogleAuth {
    inner: Authenticator<DefaultConnector>,
}

impl GoogleAuth {
    /// Read the service-account key file and build the authenticator.
    ///
    /// Fails if the key file is missing or malformed; nothing is retried.
    pub async fn from_key_file(path: &Path) -> Result<Self, AuthError> {
        let key = yup_oauth2::read_service_account_key(path).await?;
        let inner = ServiceAccountAuthenticator::builder(key).build().await?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl TokenProvider for GoogleAuth {
    async fn bearer_token(&self) -> Result<String, AuthError> {
        let token = self.inner.token(SCOPES).await?;
        match token.token() {
            Some(t) => Ok(t.to_string()),
            None => Err(AuthError::EmptyToken),
        }
    }
}
