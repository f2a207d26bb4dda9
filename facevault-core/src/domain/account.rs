//! Account-facing domain entities
//!
//! These mirror the payloads the banking backend returns for the protected
//! read endpoints, plus the credentials issued at the end of enrollment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account number and PIN issued by the backend when enrollment completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredentials {
    pub account_number: String,
    pub pin: String,
}

/// Profile data returned by the user-info endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub email: String,
}

/// One ledger entry as reported by the transactions endpoint.
///
/// `from_account` is present on received entries, `to_account` on sent ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub from_account: Option<String>,
    #[serde(default)]
    pub to_account: Option<String>,
    pub amount: Decimal,
}

/// Sent and received halves of the account's transaction history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionHistory {
    #[serde(default)]
    pub sent: Vec<TransactionRecord>,
    #[serde(default)]
    pub received: Vec<TransactionRecord>,
}
