//! Shared test collaborators
//!
//! Network and camera IO are mocked at the trait level. The banking mock
//! records every call with its payload, so tests can assert both that an
//! operation reached the network and that an invalid one never did.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use facevault_core::domain::result::{Error, Result};
use facevault_core::domain::{SessionToken, TransferRequest};
use facevault_core::ports::{
    ActiveCapture, ApiResponse, BankingApi, CaptureGuard, CaptureProvider, CapturedFrame,
    NetworkInfo,
};

/// Gateway-style response: outer statusCode plus a string-encoded body
pub fn enveloped(status: u16, inner: Value) -> ApiResponse {
    ApiResponse::new(
        200,
        json!({ "statusCode": status, "body": inner.to_string() }),
    )
}

/// Plain response with the payload as the outer object
pub fn plain(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body)
}

#[derive(Default)]
pub struct MockBankingApi {
    calls: Mutex<Vec<(String, Value)>>,
    responses: Mutex<HashMap<&'static str, VecDeque<ApiResponse>>>,
}

impl MockBankingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next response for an endpoint
    pub fn enqueue(&self, endpoint: &'static str, response: ApiResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(response);
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to one endpoint
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == endpoint)
            .count()
    }

    fn invoke(&self, endpoint: &'static str, payload: Value) -> Result<ApiResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload));
        self.responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| Error::transport(format!("no scripted response for {}", endpoint)))
    }
}

#[async_trait]
impl BankingApi for MockBankingApi {
    async fn send_otp(&self, name: &str, email: &str) -> Result<ApiResponse> {
        self.invoke("send_otp", json!({ "name": name, "email": email }))
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<ApiResponse> {
        self.invoke("verify_otp", json!({ "email": email, "otp": otp }))
    }

    async fn enroll_face(&self, email: &str, face_image_base64: &str) -> Result<ApiResponse> {
        self.invoke(
            "enroll_face",
            json!({ "email": email, "face_image_base64": face_image_base64 }),
        )
    }

    async fn login(
        &self,
        account_number: &str,
        pin: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.invoke(
            "login",
            json!({
                "account_number": account_number,
                "pin": pin,
                "face_image_base64": face_image_base64,
            }),
        )
    }

    async fn transfer(
        &self,
        request: &TransferRequest,
        token: &SessionToken,
    ) -> Result<ApiResponse> {
        let mut payload = serde_json::to_value(request).unwrap();
        payload["token"] = json!(token.as_str());
        self.invoke("transfer", payload)
    }

    async fn transactions(
        &self,
        token: &SessionToken,
        account_number: &str,
    ) -> Result<ApiResponse> {
        self.invoke(
            "transactions",
            json!({ "token": token.as_str(), "account_number": account_number }),
        )
    }

    async fn change_pin(&self, email: &str, new_pin: &str) -> Result<ApiResponse> {
        self.invoke("change_pin", json!({ "email": email, "new_pin": new_pin }))
    }

    async fn face_verify(
        &self,
        token: &SessionToken,
        account_number: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.invoke(
            "face_verify",
            json!({
                "token": token.as_str(),
                "account_number": account_number,
                "face_image_base64": face_image_base64,
            }),
        )
    }

    async fn user_info(&self, token: &SessionToken, account_number: &str) -> Result<ApiResponse> {
        self.invoke(
            "user_info",
            json!({ "token": token.as_str(), "account_number": account_number }),
        )
    }

    async fn vpn_check(
        &self,
        account_number: &str,
        ip_address: &str,
        email: &str,
    ) -> Result<ApiResponse> {
        self.invoke(
            "vpn_check",
            json!({
                "account_number": account_number,
                "ip_address": ip_address,
                "email": email,
            }),
        )
    }
}

/// Wrapper that holds one endpoint's request until the test opens the gate,
/// keeping that request in flight deliberately
pub struct GatedBankingApi {
    pub inner: MockBankingApi,
    gated: &'static str,
    gate: Semaphore,
}

impl GatedBankingApi {
    pub fn new(inner: MockBankingApi, gated: &'static str) -> Self {
        Self {
            inner,
            gated,
            gate: Semaphore::new(0),
        }
    }

    /// Let one gated request through
    pub fn open(&self) {
        self.gate.add_permits(1);
    }

    async fn pass(&self, endpoint: &str) {
        if endpoint == self.gated {
            self.gate.acquire().await.expect("gate dropped").forget();
        }
    }
}

#[async_trait]
impl BankingApi for GatedBankingApi {
    async fn send_otp(&self, name: &str, email: &str) -> Result<ApiResponse> {
        self.pass("send_otp").await;
        self.inner.send_otp(name, email).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<ApiResponse> {
        self.pass("verify_otp").await;
        self.inner.verify_otp(email, otp).await
    }

    async fn enroll_face(&self, email: &str, face_image_base64: &str) -> Result<ApiResponse> {
        self.pass("enroll_face").await;
        self.inner.enroll_face(email, face_image_base64).await
    }

    async fn login(
        &self,
        account_number: &str,
        pin: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.pass("login").await;
        self.inner.login(account_number, pin, face_image_base64).await
    }

    async fn transfer(
        &self,
        request: &TransferRequest,
        token: &SessionToken,
    ) -> Result<ApiResponse> {
        self.pass("transfer").await;
        self.inner.transfer(request, token).await
    }

    async fn transactions(
        &self,
        token: &SessionToken,
        account_number: &str,
    ) -> Result<ApiResponse> {
        self.pass("transactions").await;
        self.inner.transactions(token, account_number).await
    }

    async fn change_pin(&self, email: &str, new_pin: &str) -> Result<ApiResponse> {
        self.pass("change_pin").await;
        self.inner.change_pin(email, new_pin).await
    }

    async fn face_verify(
        &self,
        token: &SessionToken,
        account_number: &str,
        face_image_base64: &str,
    ) -> Result<ApiResponse> {
        self.pass("face_verify").await;
        self.inner
            .face_verify(token, account_number, face_image_base64)
            .await
    }

    async fn user_info(&self, token: &SessionToken, account_number: &str) -> Result<ApiResponse> {
        self.pass("user_info").await;
        self.inner.user_info(token, account_number).await
    }

    async fn vpn_check(
        &self,
        account_number: &str,
        ip_address: &str,
        email: &str,
    ) -> Result<ApiResponse> {
        self.pass("vpn_check").await;
        self.inner.vpn_check(account_number, ip_address, email).await
    }
}

/// Capture provider that always returns the same frame
pub struct StaticCapture {
    frame: String,
}

impl StaticCapture {
    pub fn new(frame: &str) -> Self {
        Self {
            frame: frame.to_string(),
        }
    }
}

struct StaticStream {
    frame: String,
}

impl ActiveCapture for StaticStream {
    fn snapshot(&mut self) -> Result<CapturedFrame> {
        Ok(CapturedFrame::new(self.frame.clone()))
    }

    fn release(&mut self) {}
}

#[async_trait]
impl CaptureProvider for StaticCapture {
    async fn acquire(&self) -> Result<CaptureGuard> {
        Ok(CaptureGuard::new(Box::new(StaticStream {
            frame: self.frame.clone(),
        })))
    }
}

/// Capture provider whose device is unavailable
pub struct UnavailableCapture;

#[async_trait]
impl CaptureProvider for UnavailableCapture {
    async fn acquire(&self) -> Result<CaptureGuard> {
        Err(Error::capture("camera unavailable"))
    }
}

/// Network info returning a fixed public address
pub struct StaticNetworkInfo {
    ip: String,
}

impl StaticNetworkInfo {
    pub fn new(ip: &str) -> Self {
        Self { ip: ip.to_string() }
    }
}

#[async_trait]
impl NetworkInfo for StaticNetworkInfo {
    async fn public_ip(&self) -> Result<String> {
        Ok(self.ip.clone())
    }
}

/// Network info whose echo service is unreachable
pub struct FailingNetworkInfo;

#[async_trait]
impl NetworkInfo for FailingNetworkInfo {
    async fn public_ip(&self) -> Result<String> {
        Err(Error::transport("echo service unreachable"))
    }
}
