//! Session security monitor - periodic network-trust re-validation
//!
//! Runs as a spawned task only while a session exists: one immediate check,
//! then one per interval, with at most one check in flight. A transport or
//! parse failure on a tick is logged and absorbed; the session stays usable.
//! Only the backend's exact forced-logout sentinel tears the session down,
//! and a watch subscription on the session store stops the loop the moment
//! the session ends for any other reason, so no pending tick can act on a
//! stale session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::result::Result;
use crate::domain::{
    AuthenticatedSession, SecurityCheckResult, SecurityNotice, SessionStore,
};
use crate::ports::{BankingApi, NetworkInfo};

/// Background network-trust monitor
pub struct SecurityMonitor {
    api: Arc<dyn BankingApi>,
    network: Arc<dyn NetworkInfo>,
    sessions: Arc<SessionStore>,
    interval: Duration,
}

impl SecurityMonitor {
    pub fn new(
        api: Arc<dyn BankingApi>,
        network: Arc<dyn NetworkInfo>,
        sessions: Arc<SessionStore>,
        interval: Duration,
    ) -> Self {
        Self {
            api,
            network,
            sessions,
            interval,
        }
    }

    /// Spawn the monitor for the current session. `email` is the account's
    /// verified address, which the trust check submits alongside the account
    /// number and observed IP.
    pub fn spawn(self, email: String) -> MonitorHandle {
        let (notices, notice_rx) = watch::channel(None);
        let task = tokio::spawn(self.run(email, notices));
        MonitorHandle {
            notices: notice_rx,
            task,
        }
    }

    async fn run(self, email: String, notices: watch::Sender<Option<SecurityNotice>>) {
        let Some(session) = self.sessions.current() else {
            return;
        };
        let epoch = self.sessions.epoch();
        let mut changed = self.sessions.subscribe();

        // First tick fires immediately, then once per interval.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.sessions.is_current(epoch) {
                        break;
                    }
                    match self.check(&session, &email).await {
                        Ok(result) => {
                            if result.forces_logout() {
                                // Epoch re-check: never clear a session that
                                // was replaced while the check was in flight.
                                if self.sessions.is_current(epoch) {
                                    self.sessions.clear();
                                    let _ = notices.send(Some(SecurityNotice::forced_logout()));
                                    tracing::warn!(reason = %result.reason, "forced logout");
                                }
                                break;
                            }
                            if result.suspicious {
                                tracing::warn!(reason = %result.reason, "suspicious trust check");
                            } else {
                                tracing::trace!(reason = %result.reason, "trust check clean");
                            }
                        }
                        // Routine tick failures never block use of the session.
                        Err(e) => tracing::debug!(error = %e, "trust check failed; ignoring"),
                    }
                }
                recv = changed.changed() => {
                    if recv.is_err() || !self.sessions.is_current(epoch) {
                        break;
                    }
                }
            }
        }
    }

    async fn check(
        &self,
        session: &AuthenticatedSession,
        email: &str,
    ) -> Result<SecurityCheckResult> {
        // The observed address is forwarded unmodified.
        let ip = self.network.public_ip().await?;
        let response = self
            .api
            .vpn_check(&session.account_number, &ip, email)
            .await?;
        let message = response
            .message()
            .unwrap_or_else(|| "No message".to_string());
        Ok(SecurityCheckResult::from_message(message))
    }
}

/// Handle to a spawned monitor
pub struct MonitorHandle {
    notices: watch::Receiver<Option<SecurityNotice>>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Subscribe to user-visible security notices (forced logouts)
    pub fn notices(&self) -> watch::Receiver<Option<SecurityNotice>> {
        self.notices.clone()
    }

    /// True once the monitor loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the monitor without waiting for the next tick
    pub fn shutdown(&self) {
        self.task.abort();
    }

    /// Wait for the monitor loop to exit
    pub async fn join(&mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
