//! Registration service - four-step enrollment state machine
//!
//! Drives `Identity → OtpPending → BiometricPending → Complete`. Every
//! operation checks its precondition step before touching the network, and a
//! try-lock on the attempt rejects double submissions instead of
//! interleaving them. The camera is activated when the OTP is verified and
//! released as soon as enrollment completes (or the service is dropped).

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::{IssuedCredentials, RegistrationState, RegistrationStep};
use crate::ports::{BankingApi, CaptureGuard, CaptureProvider};

struct Attempt {
    state: RegistrationState,
    camera: Option<CaptureGuard>,
}

/// Enrollment workflow
pub struct RegistrationService {
    api: Arc<dyn BankingApi>,
    capture: Arc<dyn CaptureProvider>,
    attempt: Mutex<Attempt>,
}

impl RegistrationService {
    pub fn new(api: Arc<dyn BankingApi>, capture: Arc<dyn CaptureProvider>) -> Self {
        Self {
            api,
            capture,
            attempt: Mutex::new(Attempt {
                state: RegistrationState::new(),
                camera: None,
            }),
        }
    }

    /// Current step, for presentation
    pub fn step(&self) -> RegistrationStep {
        self.attempt
            .try_lock()
            .map(|attempt| attempt.state.step)
            .unwrap_or(RegistrationStep::Identity)
    }

    /// Submit name and email; on success the backend mails an OTP and the
    /// workflow moves to `OtpPending`.
    pub async fn submit_identity(&self, name: &str, email: &str) -> Result<()> {
        let mut attempt = self.attempt.try_lock().map_err(|_| Error::Busy)?;
        attempt.state.require_step(RegistrationStep::Identity)?;

        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(Error::validation("both name and email are required"));
        }

        let response = self.api.send_otp(name, email).await?;
        if response.status == 200
            && response.message().as_deref() == Some("OTP sent successfully")
        {
            attempt.state.name = name.to_string();
            attempt.state.email = email.to_string();
            attempt.state.step = RegistrationStep::OtpPending;
            tracing::debug!(email, "OTP issued");
            Ok(())
        } else {
            Err(Error::server(response.message(), "Failed to send OTP"))
        }
    }

    /// Submit the one-time passcode. A wrong code leaves the workflow in
    /// `OtpPending` for re-entry; a verified code activates the capture
    /// provider for the biometric step.
    pub async fn submit_otp(&self, code: &str) -> Result<()> {
        let mut attempt = self.attempt.try_lock().map_err(|_| Error::Busy)?;
        attempt.state.require_step(RegistrationStep::OtpPending)?;

        let code = code.trim();
        if code.is_empty() {
            return Err(Error::validation("OTP code is required"));
        }

        let email = attempt.state.email.clone();
        let response = self.api.verify_otp(&email, code).await?;
        let verified =
            response.status == 200 && response.payload().get("success") == Some(&Value::Bool(true));
        if !verified {
            return Err(Error::server(response.message(), "OTP verification failed"));
        }

        attempt.state.step = RegistrationStep::BiometricPending;
        // A camera failure here is not fatal; the biometric step fails fast
        // until a stream is available.
        match self.capture.acquire().await {
            Ok(guard) => attempt.camera = Some(guard),
            Err(e) => tracing::warn!(error = %e, "could not activate capture provider"),
        }
        Ok(())
    }

    /// Take one snapshot and enroll it. Fails fast with a local error when
    /// no frame is available; on success the backend issues the account
    /// number and PIN and the workflow completes.
    pub async fn submit_biometric(&self) -> Result<IssuedCredentials> {
        let mut attempt = self.attempt.try_lock().map_err(|_| Error::Busy)?;
        attempt.state.require_step(RegistrationStep::BiometricPending)?;

        let camera = attempt
            .camera
            .as_mut()
            .ok_or_else(|| Error::capture("no active capture"))?;
        let frame = camera.snapshot()?;

        let email = attempt.state.email.clone();
        let response = self.api.enroll_face(&email, frame.as_base64()).await?;
        let payload = response.payload();
        let issued = match (
            string_field(&payload, "account_number"),
            string_field(&payload, "pin"),
        ) {
            (Some(account_number), Some(pin)) if response.status == 200 => IssuedCredentials {
                account_number,
                pin,
            },
            _ => {
                return Err(Error::server(response.message(), "Failed to register user"));
            }
        };

        attempt.state.issued = Some(issued.clone());
        attempt.state.step = RegistrationStep::Complete;
        attempt.camera = None; // releases the stream
        tracing::debug!(account = %issued.account_number, "enrollment complete");
        Ok(issued)
    }
}

/// Backend numeric fields (account numbers, PINs) sometimes arrive as JSON
/// numbers; normalize either shape to a string.
fn string_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
