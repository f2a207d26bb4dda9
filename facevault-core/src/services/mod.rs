//! Service layer - workflow orchestration
//!
//! Services coordinate domain state machines and port interactions. Each
//! service owns one workflow and serializes its own transitions.

mod account;
mod login;
mod monitor;
mod registration;
mod transfer;

pub use account::AccountService;
pub use login::LoginService;
pub use monitor::{MonitorHandle, SecurityMonitor};
pub use registration::RegistrationService;
pub use transfer::TransferService;
