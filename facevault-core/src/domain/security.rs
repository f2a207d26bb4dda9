//! Session-security check results and sentinel messages
//!
//! Two deliberately distinct rules apply to the network-trust response:
//! the per-tick `suspicious` flag compares the message case-insensitively
//! against "vpn detected", while the forced-logout decision requires the
//! backend's exact phrase. Only the latter ends the session.

use chrono::{DateTime, Utc};

/// Message fragment that marks a check as suspicious (case-insensitive)
pub const SUSPICIOUS_FLAG: &str = "vpn detected";

/// Exact backend phrase that forces session termination
pub const FORCED_LOGOUT_SENTINEL: &str = "VPN detected, email sent";

/// Outcome of one network-trust check tick
#[derive(Debug, Clone)]
pub struct SecurityCheckResult {
    pub suspicious: bool,
    /// The backend's message, unmodified
    pub reason: String,
}

impl SecurityCheckResult {
    /// Classify a trust-check message
    pub fn from_message(message: impl Into<String>) -> Self {
        let reason = message.into();
        let suspicious = reason.eq_ignore_ascii_case(SUSPICIOUS_FLAG);
        Self { suspicious, reason }
    }

    /// True only for the literal forced-logout sentinel
    pub fn forces_logout(&self) -> bool {
        self.reason == FORCED_LOGOUT_SENTINEL
    }
}

/// User-visible notice published when the monitor tears a session down
#[derive(Debug, Clone)]
pub struct SecurityNotice {
    pub message: String,
    pub at: DateTime<Utc>,
}

impl SecurityNotice {
    pub fn forced_logout() -> Self {
        Self {
            message: "VPN detected. You have been logged out for security reasons.".to_string(),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspicious_flag_is_case_insensitive() {
        assert!(SecurityCheckResult::from_message("VPN Detected").suspicious);
        assert!(SecurityCheckResult::from_message("vpn detected").suspicious);
        assert!(!SecurityCheckResult::from_message("No anomaly").suspicious);
    }

    #[test]
    fn test_forced_logout_requires_exact_sentinel() {
        assert!(SecurityCheckResult::from_message("VPN detected, email sent").forces_logout());
        // Case-folded or partial matches flag suspicion at most; they never log out
        assert!(!SecurityCheckResult::from_message("vpn detected, email sent").forces_logout());
        assert!(!SecurityCheckResult::from_message("vpn detected").forces_logout());
    }

    #[test]
    fn test_forced_logout_notice_is_timestamped() {
        let before = Utc::now();
        let notice = SecurityNotice::forced_logout();
        assert!(notice.at >= before && notice.at <= Utc::now());
    }

    #[test]
    fn test_sentinel_is_not_itself_the_suspicious_flag() {
        let result = SecurityCheckResult::from_message(FORCED_LOGOUT_SENTINEL);
        assert!(result.forces_logout());
        assert!(!result.suspicious);
    }
}
