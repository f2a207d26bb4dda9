//! Registration enrollment state machine data
//!
//! The enrollment flow is linear: identity → OTP → biometric → complete.
//! The only repeatable state is `OtpPending` (a wrong code may be re-entered).
//! `RegistrationService` owns one `RegistrationState` and drives transitions;
//! the state itself only knows which operations its current step permits.

use serde::{Deserialize, Serialize};

use crate::domain::account::IssuedCredentials;
use crate::domain::result::{Error, Result};

/// Current step of the enrollment state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    /// Waiting for name and email
    Identity,
    /// OTP issued; waiting for the code
    OtpPending,
    /// OTP verified; waiting for a face capture
    BiometricPending,
    /// Account issued
    Complete,
}

/// State owned by one registration attempt
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub step: RegistrationStep,
    pub name: String,
    pub email: String,
    /// Account number and PIN issued by the backend on completion
    pub issued: Option<IssuedCredentials>,
}

impl RegistrationState {
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::Identity,
            name: String::new(),
            email: String::new(),
            issued: None,
        }
    }

    /// Reject any operation whose precondition step does not match.
    ///
    /// Out-of-order steps fail here, before any network call is made.
    pub fn require_step(&self, expected: RegistrationStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "registration step {:?} not valid while in {:?}",
                expected, self.step
            )))
        }
    }
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}
