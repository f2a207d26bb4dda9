//! Public IP lookup via an ipify-style JSON echo service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::result::{Error, Result};
use crate::ports::NetworkInfo;

#[derive(Debug, Deserialize)]
struct IpEchoResponse {
    ip: String,
}

/// [`NetworkInfo`] backed by an HTTP IP echo endpoint
/// (e.g. `https://api64.ipify.org?format=json`)
#[derive(Debug)]
pub struct IpifyNetworkInfo {
    client: Client,
    echo_url: String,
}

impl IpifyNetworkInfo {
    pub fn new(echo_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            echo_url: echo_url.to_string(),
        })
    }
}

#[async_trait]
impl NetworkInfo for IpifyNetworkInfo {
    async fn public_ip(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.echo_url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("IP lookup failed: {}", e)))?;

        let echo: IpEchoResponse = response.json().await.map_err(|_| Error::InvalidResponse)?;
        Ok(echo.ip)
    }
}
