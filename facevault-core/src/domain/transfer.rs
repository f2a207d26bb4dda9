//! Fund transfer request and receipt
//!
//! A `TransferRequest` is built fresh for every attempt and validated
//! locally before it is allowed anywhere near the network. Field names match
//! the transfer endpoint's wire format.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::account::{AccountInfo, TransactionHistory};
use crate::domain::result::{Error, Result};

/// One step-up-authorized transfer attempt
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    /// Fresh step-up capture for this attempt, base64 JPEG
    pub face_image_base64: String,
    /// Client's public address as reported by the IP echo service,
    /// "Unknown" when the lookup failed
    pub user_ip: String,
}

impl TransferRequest {
    /// Local preconditions. A request that fails here never produces a
    /// network call.
    pub fn validate(&self) -> Result<()> {
        if self.face_image_base64.is_empty() {
            return Err(Error::validation(
                "capture a face image before transferring",
            ));
        }
        if self.to_account.trim().is_empty() {
            return Err(Error::validation("destination account is required"));
        }
        if self.from_account.trim().is_empty() {
            return Err(Error::validation("source account is required"));
        }
        if self.amount <= Decimal::ZERO {
            return Err(Error::validation("amount must be positive"));
        }
        Ok(())
    }
}

/// Outcome of a successful transfer, including the post-transfer refresh
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    /// Server confirmation message
    pub message: String,
    /// Refreshed history; `None` when the (idempotent) refresh read failed
    pub history: Option<TransactionHistory>,
    /// Refreshed profile and balance; `None` when the refresh read failed
    pub account: Option<AccountInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: Decimal, image: &str) -> TransferRequest {
        TransferRequest {
            from_account: "1000200030".to_string(),
            to_account: "2000300040".to_string(),
            amount,
            face_image_base64: image.to_string(),
            user_ip: "Unknown".to_string(),
        }
    }

    #[test]
    fn test_zero_amount_rejected() {
        let req = request(Decimal::ZERO, "frame");
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let req = request(Decimal::new(-50, 0), "frame");
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_capture_rejected() {
        let req = request(Decimal::new(50, 0), "");
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("face image"));
    }

    #[test]
    fn test_valid_request_passes() {
        let req = request(Decimal::new(50, 0), "frame");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_wire_field_names() {
        let req = request(Decimal::new(50, 0), "frame");
        let value = serde_json::to_value(&req).expect("serializable");
        assert!(value.get("from_account").is_some());
        assert!(value.get("face_image_base64").is_some());
        assert!(value.get("user_ip").is_some());
    }
}
