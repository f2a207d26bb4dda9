//! Facevault Core - workflow logic for biometric banking
//!
//! This crate implements the client-side orchestration for a multi-factor
//! banking workflow, following hexagonal architecture:
//!
//! - **domain**: entities, the session store, and the error taxonomy
//! - **ports**: trait definitions for external collaborators (BankingApi,
//!   CaptureProvider, NetworkInfo)
//! - **services**: the registration, login, monitor, transfer, and account
//!   workflows
//! - **adapters**: concrete implementations (reqwest gateway client, IP
//!   echo, file-backed capture)
//!
//! Session state is memory-only: nothing here ever persists a credential.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use adapters::{HttpBankingApi, IpifyNetworkInfo};
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{
    AccountInfo, AuthenticatedSession, IssuedCredentials, RegistrationStep, SecurityNotice,
    SessionStore, TransactionHistory, TransferReceipt,
};
pub use ports::{BankingApi, CaptureProvider, CapturedFrame, NetworkInfo};
pub use services::MonitorHandle;

/// Main context for Facevault operations
///
/// This is the primary entry point. It owns the session store and all
/// workflow services, wired over shared collaborators.
pub struct FacevaultContext {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub registration: RegistrationService,
    pub login: LoginService,
    pub transfer: TransferService,
    pub account: AccountService,
    api: Arc<dyn BankingApi>,
    network: Arc<dyn NetworkInfo>,
}

impl FacevaultContext {
    /// Create a context backed by the HTTP gateway and IP echo adapters.
    /// The capture provider is platform-specific and supplied by the caller.
    pub fn new(config: Config, capture: Arc<dyn CaptureProvider>) -> Result<Self> {
        let timeout = config.request_timeout();
        let api: Arc<dyn BankingApi> = Arc::new(HttpBankingApi::new(&config.api_base_url, timeout)?);
        let network: Arc<dyn NetworkInfo> =
            Arc::new(IpifyNetworkInfo::new(&config.ip_echo_url, timeout)?);
        Ok(Self::with_collaborators(config, api, capture, network))
    }

    /// Create a context with every collaborator injected
    pub fn with_collaborators(
        config: Config,
        api: Arc<dyn BankingApi>,
        capture: Arc<dyn CaptureProvider>,
        network: Arc<dyn NetworkInfo>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::new());

        let registration = RegistrationService::new(Arc::clone(&api), Arc::clone(&capture));
        let login = LoginService::new(Arc::clone(&api), Arc::clone(&sessions));
        let transfer = TransferService::new(
            Arc::clone(&api),
            Arc::clone(&capture),
            Arc::clone(&network),
            Arc::clone(&sessions),
        );
        let account = AccountService::new(
            Arc::clone(&api),
            Arc::clone(&capture),
            Arc::clone(&sessions),
        );

        Self {
            config,
            sessions,
            registration,
            login,
            transfer,
            account,
            api,
            network,
        }
    }

    /// Spawn the session security monitor for the current session.
    /// `email` is the account's enrolled address (from account info).
    pub fn start_monitor(&self, email: String) -> MonitorHandle {
        SecurityMonitor::new(
            Arc::clone(&self.api),
            Arc::clone(&self.network),
            Arc::clone(&self.sessions),
            self.config.security_poll_interval(),
        )
        .spawn(email)
    }

    /// End the current session. Safe to call with none active.
    pub fn logout(&self) {
        self.sessions.clear();
    }
}
