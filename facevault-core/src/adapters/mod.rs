//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the BankingApi port
//! - ipify-style IP echo for the NetworkInfo port
//! - file-backed still images for the CaptureProvider port (terminal
//!   environments have no camera API; tests mock the port directly)

pub mod file_capture;
pub mod http;
pub mod ipify;

pub use file_capture::FileCaptureProvider;
pub use http::HttpBankingApi;
pub use ipify::IpifyNetworkInfo;
