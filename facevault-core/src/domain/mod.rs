//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod registration;
mod security;
mod session;
mod transfer;
pub mod result;

pub use account::{AccountInfo, IssuedCredentials, TransactionHistory, TransactionRecord};
pub use registration::{RegistrationState, RegistrationStep};
pub use security::{
    SecurityCheckResult, SecurityNotice, FORCED_LOGOUT_SENTINEL, SUSPICIOUS_FLAG,
};
pub use session::{AuthenticatedSession, SessionStore, SessionToken};
pub use transfer::{TransferReceipt, TransferRequest};
