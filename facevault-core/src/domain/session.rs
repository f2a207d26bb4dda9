//! Authenticated session and its single-owner store
//!
//! The session is memory-only and never persisted. Exactly one
//! `SessionStore` owns it; the login workflow installs it, logout (user- or
//! monitor-triggered) clears it, and everything else observes the store
//! rather than holding aliased copies. Every mutation bumps an epoch so that
//! work started under an old session can detect it finished too late, and
//! notifies a watch channel so background tasks cancel deterministically.

use std::sync::Mutex;

use tokio::sync::watch;

/// Opaque bearer credential issued by the backend at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An established session: the bearer token plus the account it belongs to
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: SessionToken,
    pub account_number: String,
}

struct Inner {
    session: Option<AuthenticatedSession>,
    epoch: u64,
}

/// Single owner of the mutable shared session state
pub struct SessionStore {
    inner: Mutex<Inner>,
    changed: watch::Sender<u64>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner {
                session: None,
                epoch: 0,
            }),
            changed,
        }
    }

    /// Install a freshly established session, invalidating any prior one
    pub fn set(&self, session: AuthenticatedSession) {
        let epoch = {
            let mut inner = self.inner.lock().expect("session store poisoned");
            inner.session = Some(session);
            inner.epoch += 1;
            inner.epoch
        };
        let _ = self.changed.send(epoch);
    }

    /// End the session. Idempotent; a clear with no session still bumps the
    /// epoch so racing observers converge on "not current".
    pub fn clear(&self) {
        let epoch = {
            let mut inner = self.inner.lock().expect("session store poisoned");
            inner.session = None;
            inner.epoch += 1;
            inner.epoch
        };
        let _ = self.changed.send(epoch);
    }

    /// Snapshot of the live session, if any
    pub fn current(&self) -> Option<AuthenticatedSession> {
        self.inner
            .lock()
            .expect("session store poisoned")
            .session
            .clone()
    }

    /// Epoch of the current store state, for later `is_current` checks
    pub fn epoch(&self) -> u64 {
        self.inner.lock().expect("session store poisoned").epoch
    }

    /// True while the session observed at `epoch` is still the live one
    pub fn is_current(&self, epoch: u64) -> bool {
        let inner = self.inner.lock().expect("session store poisoned");
        inner.session.is_some() && inner.epoch == epoch
    }

    /// Subscribe to epoch changes; used by the security monitor to stop
    /// scheduling ticks the moment the session ends
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
