//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod banking;
mod capture;
mod network;

pub use banking::{ApiResponse, BankingApi};
pub use capture::{ActiveCapture, CaptureGuard, CaptureProvider, CapturedFrame};
pub use network::NetworkInfo;
