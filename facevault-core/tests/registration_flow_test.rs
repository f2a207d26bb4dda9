//! Registration workflow tests
//!
//! Covers the linear enrollment state machine: happy path, wrong-OTP
//! re-entry, and the invariant that out-of-order steps are rejected before
//! any network call.

mod common;

use std::sync::Arc;

use serde_json::json;

use common::{enveloped, GatedBankingApi, MockBankingApi, StaticCapture, UnavailableCapture};
use facevault_core::domain::result::Error;
use facevault_core::domain::RegistrationStep;
use facevault_core::services::RegistrationService;

fn service(api: Arc<MockBankingApi>) -> RegistrationService {
    RegistrationService::new(api, Arc::new(StaticCapture::new("enroll-frame")))
}

#[tokio::test]
async fn test_full_enrollment_happy_path() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.enqueue("verify_otp", enveloped(200, json!({ "success": true })));
    api.enqueue(
        "enroll_face",
        enveloped(200, json!({ "account_number": "1000200030", "pin": "4321" })),
    );

    let registration = service(Arc::clone(&api));

    registration
        .submit_identity("Alice", "a@x.com")
        .await
        .expect("identity accepted");
    assert_eq!(registration.step(), RegistrationStep::OtpPending);

    registration.submit_otp("123456").await.expect("OTP verified");
    assert_eq!(registration.step(), RegistrationStep::BiometricPending);

    let issued = registration.submit_biometric().await.expect("enrolled");
    assert_eq!(issued.account_number, "1000200030");
    assert_eq!(issued.pin, "4321");
    assert_eq!(registration.step(), RegistrationStep::Complete);

    // The enrollment call carried the verified email and the captured frame.
    let calls = api.calls();
    let (_, enroll_payload) = calls.iter().find(|(name, _)| name == "enroll_face").unwrap();
    assert_eq!(enroll_payload["email"], json!("a@x.com"));
    assert_eq!(enroll_payload["face_image_base64"], json!("enroll-frame"));
}

#[tokio::test]
async fn test_wrong_otp_allows_reentry() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.enqueue(
        "verify_otp",
        enveloped(400, json!({ "success": false, "message": "Invalid OTP" })),
    );
    api.enqueue("verify_otp", enveloped(200, json!({ "success": true })));

    let registration = service(Arc::clone(&api));
    registration.submit_identity("Alice", "a@x.com").await.unwrap();

    let err = registration.submit_otp("000000").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid OTP");
    assert_eq!(registration.step(), RegistrationStep::OtpPending);

    registration.submit_otp("123456").await.expect("second code accepted");
    assert_eq!(registration.step(), RegistrationStep::BiometricPending);
}

#[tokio::test]
async fn test_identity_failure_surfaces_server_message_and_keeps_state() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue(
        "send_otp",
        enveloped(400, json!({ "message": "Email already registered" })),
    );

    let registration = service(Arc::clone(&api));
    let err = registration.submit_identity("Alice", "a@x.com").await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
    assert_eq!(registration.step(), RegistrationStep::Identity);
}

#[tokio::test]
async fn test_blank_identity_never_reaches_network() {
    let api = Arc::new(MockBankingApi::new());
    let registration = service(Arc::clone(&api));

    let err = registration.submit_identity("", "a@x.com").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_biometric_out_of_order_is_rejected_locally() {
    let api = Arc::new(MockBankingApi::new());
    let registration = service(Arc::clone(&api));

    let err = registration.submit_biometric().await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_otp_after_complete_is_rejected_without_reissue() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.enqueue("verify_otp", enveloped(200, json!({ "success": true })));
    api.enqueue(
        "enroll_face",
        enveloped(200, json!({ "account_number": "1000200030", "pin": "4321" })),
    );

    let registration = service(Arc::clone(&api));
    registration.submit_identity("Alice", "a@x.com").await.unwrap();
    registration.submit_otp("123456").await.unwrap();
    registration.submit_biometric().await.unwrap();

    let verify_calls_before = api.call_count("verify_otp");
    let err = registration.submit_otp("123456").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    // No duplicate verification or issuance happened.
    assert_eq!(api.call_count("verify_otp"), verify_calls_before);
    assert_eq!(api.call_count("enroll_face"), 1);
}

#[tokio::test]
async fn test_otp_submission_in_flight_rejects_second() {
    let api = Arc::new(GatedBankingApi::new(MockBankingApi::new(), "verify_otp"));
    api.inner
        .enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.inner
        .enqueue("verify_otp", enveloped(200, json!({ "success": true })));

    let registration = Arc::new(RegistrationService::new(
        Arc::clone(&api) as Arc<dyn facevault_core::BankingApi>,
        Arc::new(StaticCapture::new("enroll-frame")),
    ));
    registration.submit_identity("Alice", "a@x.com").await.unwrap();

    // First submission parks on the gated endpoint, still holding the attempt.
    let first = tokio::spawn({
        let registration = Arc::clone(&registration);
        async move { registration.submit_otp("123456").await }
    });
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    let err = registration.submit_otp("123456").await.unwrap_err();
    assert!(matches!(err, Error::Busy));
    // The rejected submission never reached the network.
    assert_eq!(api.inner.call_count("verify_otp"), 0);

    api.open();
    first.await.expect("join").expect("first submission verified");
    assert_eq!(api.inner.call_count("verify_otp"), 1);
    assert_eq!(registration.step(), RegistrationStep::BiometricPending);
}

#[tokio::test]
async fn test_camera_failure_fails_fast_at_biometric_step() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.enqueue("verify_otp", enveloped(200, json!({ "success": true })));

    let registration = RegistrationService::new(
        Arc::clone(&api) as Arc<dyn facevault_core::BankingApi>,
        Arc::new(UnavailableCapture),
    );
    registration.submit_identity("Alice", "a@x.com").await.unwrap();
    // OTP verification succeeds even though the camera could not start.
    registration.submit_otp("123456").await.unwrap();
    assert_eq!(registration.step(), RegistrationStep::BiometricPending);

    let err = registration.submit_biometric().await.unwrap_err();
    assert!(matches!(err, Error::Capture(_)));
    // The failure was local; no enrollment request was sent.
    assert_eq!(api.call_count("enroll_face"), 0);
}

#[tokio::test]
async fn test_enrollment_failure_keeps_biometric_pending() {
    let api = Arc::new(MockBankingApi::new());
    api.enqueue("send_otp", enveloped(200, json!({ "message": "OTP sent successfully" })));
    api.enqueue("verify_otp", enveloped(200, json!({ "success": true })));
    api.enqueue(
        "enroll_face",
        enveloped(400, json!({ "message": "Face not recognized" })),
    );

    let registration = service(Arc::clone(&api));
    registration.submit_identity("Alice", "a@x.com").await.unwrap();
    registration.submit_otp("123456").await.unwrap();

    let err = registration.submit_biometric().await.unwrap_err();
    assert_eq!(err.to_string(), "Face not recognized");
    assert_eq!(registration.step(), RegistrationStep::BiometricPending);
}
