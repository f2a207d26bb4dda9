//! Login service - single-shot credential + biometric verification
//!
//! One request carries the account number, PIN, and a mandatory face
//! capture. Success requires the HTTP layer to report success AND the
//! unwrapped payload to carry the literal success sentinel; only then is a
//! session installed in the store.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthenticatedSession, SessionStore, SessionToken};
use crate::ports::{BankingApi, CapturedFrame};

const LOGIN_SENTINEL: &str = "Login successful";

/// Credential + biometric login workflow
pub struct LoginService {
    api: Arc<dyn BankingApi>,
    sessions: Arc<SessionStore>,
}

impl LoginService {
    pub fn new(api: Arc<dyn BankingApi>, sessions: Arc<SessionStore>) -> Self {
        Self { api, sessions }
    }

    /// Attempt a login. The biometric factor is mandatory: a missing frame
    /// short-circuits before any network call. There is no automatic retry;
    /// the caller resubmits with a fresh capture.
    pub async fn login(
        &self,
        account_number: &str,
        pin: &str,
        frame: &CapturedFrame,
    ) -> Result<AuthenticatedSession> {
        if frame.is_empty() {
            return Err(Error::validation("capture a face image before logging in"));
        }
        let account_number = account_number.trim();
        if account_number.is_empty() || pin.is_empty() {
            return Err(Error::validation("account number and PIN are required"));
        }

        let response = self
            .api
            .login(account_number, pin, frame.as_base64())
            .await?;

        let payload = response.payload();
        let sentinel_matched = response.is_http_success()
            && payload.get("message").and_then(Value::as_str) == Some(LOGIN_SENTINEL);
        if !sentinel_matched {
            return Err(Error::server(response.message(), "Login failed"));
        }

        // The sentinel without a token is a malformed success; the caller
        // must never receive a session for it.
        let token = payload
            .get("session_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(Error::InvalidResponse)?;

        let session = AuthenticatedSession {
            token: SessionToken::new(token),
            account_number: account_number.to_string(),
        };
        self.sessions.set(session.clone());
        tracing::debug!(account = %session.account_number, "session established");
        Ok(session)
    }
}
