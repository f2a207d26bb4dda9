//! Account service - protected reads and settings
//!
//! Everything here requires a live session; the token is attached
//! per-request and the operations are idempotent reads plus two small
//! settings actions (change PIN, presence re-check).

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{AccountInfo, AuthenticatedSession, SessionStore, TransactionHistory};
use crate::ports::{BankingApi, CaptureProvider};

/// Protected account operations
pub struct AccountService {
    api: Arc<dyn BankingApi>,
    capture: Arc<dyn CaptureProvider>,
    sessions: Arc<SessionStore>,
}

impl AccountService {
    pub fn new(
        api: Arc<dyn BankingApi>,
        capture: Arc<dyn CaptureProvider>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            api,
            capture,
            sessions,
        }
    }

    fn session(&self) -> Result<AuthenticatedSession> {
        self.sessions.current().ok_or(Error::NoSession)
    }

    /// Sent and received transaction history for the session's account
    pub async fn transactions(&self) -> Result<TransactionHistory> {
        let session = self.session()?;
        let response = self
            .api
            .transactions(&session.token, &session.account_number)
            .await?;
        if !response.is_http_success() {
            return Err(Error::server(
                response.message(),
                "Failed to load transactions",
            ));
        }
        serde_json::from_value(response.payload()).map_err(|_| Error::InvalidResponse)
    }

    /// Profile and balance for the session's account
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let session = self.session()?;
        let response = self
            .api
            .user_info(&session.token, &session.account_number)
            .await?;
        if !response.is_http_success() {
            return Err(Error::server(
                response.message(),
                "Failed to load account info",
            ));
        }
        serde_json::from_value(response.payload()).map_err(|_| Error::InvalidResponse)
    }

    /// Change the account PIN. The backend keys this on the enrolled email,
    /// which is looked up from the account profile.
    pub async fn change_pin(&self, new_pin: &str) -> Result<String> {
        self.session()?;
        let new_pin = new_pin.trim();
        if new_pin.len() < 4 {
            return Err(Error::validation("PIN must be at least 4 digits long"));
        }

        let email = self.account_info().await?.email;
        if email.is_empty() {
            return Err(Error::validation("account email unavailable"));
        }

        let response = self.api.change_pin(&email, new_pin).await?;
        if !response.is_http_success() {
            return Err(Error::server(response.message(), "PIN change failed"));
        }
        Ok(response
            .message()
            .unwrap_or_else(|| "PIN changed successfully".to_string()))
    }

    /// Take a fresh capture and submit it for an in-session biometric
    /// re-check. Returns the backend's verdict message.
    pub async fn verify_presence(&self) -> Result<String> {
        let session = self.session()?;
        let mut camera = self.capture.acquire().await?;
        let frame = camera.snapshot()?;
        drop(camera);

        let response = self
            .api
            .face_verify(&session.token, &session.account_number, frame.as_base64())
            .await?;
        if !response.is_http_success() {
            return Err(Error::server(response.message(), "Verification failed"));
        }
        Ok(response
            .message()
            .unwrap_or_else(|| "Verification submitted".to_string()))
    }
}
