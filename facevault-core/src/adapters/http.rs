//! HTTP banking API client
//!
//! Implements the [`BankingApi`] port against the banking gateway. This
//! layer only moves JSON over HTTPS; success predicates and envelope
//! interpretation belong to the workflows.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{SessionToken, TransferRequest};
use crate::ports::{ApiResponse, BankingApi};

/// Banking gateway client
#[derive(Debug)]
pub struct HttpBankingApi {
    client: Client,
    base_url: String,
}

impl HttpBankingApi {
    /// Create a client for the given gateway base URL.
    ///
    /// Credentials and biometrics travel in request bodies, so anything but
    /// HTTPS is rejected outright.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|_| Error::Config(format!("invalid API base URL: {}", base_url)))?;

        if parsed.scheme() != "https" {
            return Err(Error::Config(
                "banking API base URL must use HTTPS".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post(&self, path: &str, body: Value, token: Option<&SessionToken>) -> Result<ApiResponse> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.as_str());
        }
        Self::into_response(request.send().await).await
    }

    async fn get(&self, path: &str, token: &SessionToken) -> Result<ApiResponse> {
        let request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, token.as_str());
        Self::into_response(request.send().await).await
    }

    async fn into_response(
        sent: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<ApiResponse> {
        let response = sent.map_err(map_request_error)?;
        let status = response.status().as_u16();
        // A non-JSON body degrades to an invalid-response error; it never
        // propagates a parser panic into the workflows.
        let body: Value = response.json().await.map_err(|_| Error::InvalidResponse)?;
        Ok(ApiResponse::new(status, body))
    }
}

/// Map request errors to user-facing transport messages
fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::transport("connection timed out")
    } else if error.is_connect() {
        Error::transport("unable to reach the banking service")
    } else {
        Error::transport(format!("request failed: {}", error))
    }
}

#[async_trait]
impl BankingApi for HttpBankingApi {
    async fn send_otp(&self, name: &str, email: &str) -> Result<ApiResponse> {
        self.post(
            "/register/send-otp",
            json!({ "name": name, "email": email }),
            None,
        )
        .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<ApiResponse> {
        self.post(
            "/register/verify-otp",
            json!({ "email": email, "otp": otp }),
            None,
        )
        .await
    }

    async fn enroll_face(&self, email: &str, face_image_base64: &str) -> Result<ApiResponse> {
        self.post(
            "/register/capture-face",
            json!({ "email": email, "face_image_base64": face_image_base64 }),
            None,
        )
        .await
    }

    async fn login(
        &self,
        account_number: &str,
        pin: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.post(
            "/login",
            json!({
                "account_number": account_number,
                "pin": pin,
                "face_image_base64": face_image_base64,
            }),
            None,
        )
        .await
    }

    async fn transfer(
        &self,
        request: &TransferRequest,
        token: &SessionToken,
    ) -> Result<ApiResponse> {
        // The transfer endpoint is the one place the gateway expects a
        // Bearer-prefixed credential.
        let sent = self
            .client
            .post(format!("{}/transfer", self.base_url))
            .bearer_auth(token.as_str())
            .json(request)
            .send()
            .await;
        Self::into_response(sent).await
    }

    async fn transactions(
        &self,
        token: &SessionToken,
        account_number: &str,
    ) -> Result<ApiResponse> {
        self.get(&format!("/transactions?AccountNumber={}", account_number), token)
            .await
    }

    async fn change_pin(&self, email: &str, new_pin: &str) -> Result<ApiResponse> {
        self.post(
            "/settings/change-pin",
            json!({ "email": email, "new_pin": new_pin }),
            None,
        )
        .await
    }

    async fn face_verify(
        &self,
        token: &SessionToken,
        account_number: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.post(
            "/session/face-verify",
            json!({
                "account_number": account_number,
                "face_image_base64": face_image_base64,
            }),
            Some(token),
        )
        .await
    }

    async fn user_info(&self, token: &SessionToken, account_number: &str) -> Result<ApiResponse> {
        self.get(&format!("/user-info?AccountNumber={}", account_number), token)
            .await
    }

    async fn vpn_check(
        &self,
        account_number: &str,
        ip_address: &str,
        email: &str,
    ) -> Result<ApiResponse> {
        self.post(
            "/session/vpn-check",
            json!({
                "account_number": account_number,
                "ip_address": ip_address,
                "email": email,
            }),
            None,
        )
        .await
    }
}
