//! Transfer service - step-up-authorized fund movement
//!
//! Every transfer attempt needs its own capture: the step-up frame is held
//! in a per-attempt draft and cleared the moment a transfer succeeds, so a
//! frame from an already-submitted transfer can never be reused. All
//! preconditions are checked locally before the request goes anywhere near
//! the network, and a try-lock on the draft rejects a double submission
//! while one is in flight.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::{SessionStore, TransferReceipt, TransferRequest};
use crate::ports::{BankingApi, CaptureProvider, CapturedFrame, NetworkInfo};
use crate::services::AccountService;

struct Draft {
    frame: Option<CapturedFrame>,
}

/// Step-up-authenticated transfer workflow
pub struct TransferService {
    api: Arc<dyn BankingApi>,
    capture: Arc<dyn CaptureProvider>,
    network: Arc<dyn NetworkInfo>,
    sessions: Arc<SessionStore>,
    account: AccountService,
    draft: Mutex<Draft>,
}

impl TransferService {
    pub fn new(
        api: Arc<dyn BankingApi>,
        capture: Arc<dyn CaptureProvider>,
        network: Arc<dyn NetworkInfo>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        let account = AccountService::new(
            Arc::clone(&api),
            Arc::clone(&capture),
            Arc::clone(&sessions),
        );
        Self {
            api,
            capture,
            network,
            sessions,
            account,
            draft: Mutex::new(Draft { frame: None }),
        }
    }

    /// Take the step-up capture for the next transfer attempt. Requires a
    /// live session; the camera is released before this returns, on every
    /// path.
    pub async fn capture_step_up(&self) -> Result<()> {
        let mut draft = self.draft.try_lock().map_err(|_| Error::Busy)?;
        self.sessions.current().ok_or(Error::NoSession)?;

        let mut camera = self.capture.acquire().await?;
        let frame = camera.snapshot()?;
        draft.frame = Some(frame);
        Ok(())
    }

    /// Whether a step-up capture is staged for the current attempt
    pub fn has_step_up_capture(&self) -> bool {
        self.draft
            .try_lock()
            .map(|draft| draft.frame.is_some())
            .unwrap_or(false)
    }

    /// Submit a transfer. Preconditions (fresh capture, destination, positive
    /// amount) are validated locally first; the session token observed at
    /// submission authorizes the request, and a logout while the transfer is
    /// in flight prevents its result from being presented as current state.
    pub async fn request_transfer(
        &self,
        to_account: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt> {
        let mut draft = self.draft.try_lock().map_err(|_| Error::Busy)?;
        let session = self.sessions.current().ok_or(Error::NoSession)?;
        let epoch = self.sessions.epoch();

        let mut request = TransferRequest {
            from_account: session.account_number.clone(),
            to_account: to_account.trim().to_string(),
            amount,
            face_image_base64: draft
                .frame
                .as_ref()
                .map(|frame| frame.as_base64().to_string())
                .unwrap_or_default(),
            user_ip: "Unknown".to_string(),
        };
        request.validate()?;

        // Best-effort address declaration; the echo service being down must
        // not block a transfer.
        match self.network.public_ip().await {
            Ok(ip) => request.user_ip = ip,
            Err(e) => tracing::debug!(error = %e, "IP lookup failed; declaring Unknown"),
        }

        let response = self.api.transfer(&request, &session.token).await?;
        let payload = response.payload();
        if response.outer_status() >= 400 {
            // Server-reported failure: surface the inner message, keep the
            // staged capture for a retry.
            return Err(Error::server(response.message(), "Transfer failed"));
        }

        // Success: the capture is spent. The next attempt must take a fresh one.
        draft.frame = None;
        drop(draft);

        let message = payload
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Transfer successful")
            .to_string();

        if !self.sessions.is_current(epoch) {
            // The session ended while the transfer was in flight. The money
            // moved, but the result must not be presented as current state.
            tracing::warn!("transfer completed after session ended; result discarded");
            return Err(Error::NoSession);
        }

        // Refresh history and balance (idempotent reads, best-effort).
        let history = match self.account.transactions().await {
            Ok(history) => Some(history),
            Err(e) => {
                tracing::warn!(error = %e, "post-transfer history refresh failed");
                None
            }
        };
        let account = match self.account.account_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(error = %e, "post-transfer balance refresh failed");
                None
            }
        };

        Ok(TransferReceipt {
            message,
            history,
            account,
        })
    }
}
