//! Remote banking API port
//!
//! The trait covers every backend operation the workflows need. All methods
//! return the raw outer response; interpreting success predicates (sentinel
//! messages, expected fields) is workflow logic, while unwrapping the proxy
//! envelope is handled once by [`ApiResponse::payload`].

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::result::Result;
use crate::domain::{SessionToken, TransferRequest};

/// Outer response from the banking gateway: HTTP status plus the JSON body
/// as received, envelope and all.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the HTTP layer reported success
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The gateway wraps some responses in a proxy envelope whose real
    /// payload sits in a `body` field that may itself be a JSON-encoded
    /// string. Fallback chain: string `body` is parsed (a parse failure
    /// degrades to a generic invalid-response payload rather than an error),
    /// an object `body` is used as-is, and with no `body` field the outer
    /// object is the payload.
    pub fn payload(&self) -> Value {
        match self.body.get("body") {
            Some(Value::String(inner)) => serde_json::from_str(inner).unwrap_or_else(|_| {
                serde_json::json!({ "message": "Invalid response from server" })
            }),
            Some(Value::Object(_)) => self.body["body"].clone(),
            _ => self.body.clone(),
        }
    }

    /// Status code the gateway itself reports inside the envelope, falling
    /// back to the HTTP status. The transfer flow treats >= 400 here as a
    /// server-reported failure even when the HTTP layer said 200.
    pub fn outer_status(&self) -> u16 {
        self.body
            .get("statusCode")
            .and_then(Value::as_u64)
            .map(|code| code as u16)
            .unwrap_or(self.status)
    }

    /// Convenience accessor for the unwrapped payload's message field
    pub fn message(&self) -> Option<String> {
        self.payload()
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Remote banking API
///
/// Implementations perform the HTTP calls; they never interpret business
/// outcomes. The session token is caller-supplied per request (it is opaque;
/// no renewal semantics are assumed).
#[async_trait]
pub trait BankingApi: Send + Sync {
    /// POST /register/send-otp
    async fn send_otp(&self, name: &str, email: &str) -> Result<ApiResponse>;

    /// POST /register/verify-otp
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<ApiResponse>;

    /// POST /register/capture-face
    async fn enroll_face(&self, email: &str, face_image_base64: &str) -> Result<ApiResponse>;

    /// POST /login
    async fn login(
        &self,
        account_number: &str,
        pin: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse>;

    /// POST /transfer (bearer auth)
    async fn transfer(
        &self,
        request: &TransferRequest,
        token: &SessionToken,
    ) -> Result<ApiResponse>;

    /// GET /transactions?AccountNumber=… (auth header)
    async fn transactions(
        &self,
        token: &SessionToken,
        account_number: &str,
    ) -> Result<ApiResponse>;

    /// POST /settings/change-pin
    async fn change_pin(&self, email: &str, new_pin: &str) -> Result<ApiResponse>;

    /// POST /session/face-verify (auth header)
    async fn face_verify(
        &self,
        token: &SessionToken,
        account_number: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse>;

    /// GET /user-info?AccountNumber=… (auth header)
    async fn user_info(&self, token: &SessionToken, account_number: &str) -> Result<ApiResponse>;

    /// POST /session/vpn-check
    async fn vpn_check(
        &self,
        account_number: &str,
        ip_address: &str,
        email: &str,
    ) -> Result<ApiResponse>;
}
