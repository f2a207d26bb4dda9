//! Network information port
//!
//! The session-security monitor needs the client's current public address;
//! the transfer flow declares it best-effort. The reported address is passed
//! through to the backend unmodified.

use async_trait::async_trait;

use crate::domain::result::Result;

/// Public network address lookup (an IP echo service, in production)
#[async_trait]
pub trait NetworkInfo: Send + Sync {
    async fn public_ip(&self) -> Result<String>;
}
