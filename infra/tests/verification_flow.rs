//! End-to-end verification flows over the in-memory store and mock e-mail

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use sf_core::errors::DomainError;
use sf_core::services::verification::{ManualClock, VerificationService, VerificationServiceConfig};
use sf_infra::cache::InMemoryCodeStore;
use sf_infra::email::{EmailDelivery, MockEmailService};
use sf_shared::AppConfig;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

struct Harness {
    mock: Arc<MockEmailService>,
    clock: Arc<ManualClock>,
    service: Arc<VerificationService<InMemoryCodeStore, EmailDelivery>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_mock(MockEmailService::with_options(false, false))
    }

    fn with_mock(mock: MockEmailService) -> Self {
        init_tracing();
        let mock = Arc::new(mock);
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = VerificationService::new(
            Arc::new(InMemoryCodeStore::new()),
            Arc::new(EmailDelivery::new(Box::new(mock.clone()))),
            VerificationServiceConfig::default(),
        )
        .with_clock(clock.clone());

        Self {
            mock,
            clock,
            service: Arc::new(service),
        }
    }

    /// Code from the last e-mail sent to `to`
    fn code_in_inbox(&self, to: &str) -> String {
        let email = self.mock.last_email_to(to).expect("an e-mail should have been sent");
        email
            .body
            .strip_prefix("Your 2FA code is ")
            .expect("body should follow the default template")
            .to_string()
    }
}

#[tokio::test]
async fn test_send_then_verify() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();

    let email = h.mock.last_email_to("a@x.com").unwrap();
    assert_eq!(email.subject, "Your 2FA Verification Code");

    let code = h.code_in_inbox("a@x.com");
    assert_eq!(code.len(), 6);

    h.clock.advance(Duration::seconds(10));
    assert!(h.service.verify_code("a@x.com", &code).await.is_ok());
    assert_eq!(h.service.pending_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_replay_rejected() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();
    let code = h.code_in_inbox("a@x.com");

    assert!(h.service.verify_code("a@x.com", &code).await.is_ok());
    assert!(matches!(
        h.service.verify_code("a@x.com", &code).await,
        Err(DomainError::InvalidOrExpired)
    ));
}

#[tokio::test]
async fn test_expired_code_rejected_and_kept() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();
    let code = h.code_in_inbox("a@x.com");

    h.clock.advance(Duration::seconds(301));
    assert!(matches!(
        h.service.verify_code("a@x.com", &code).await,
        Err(DomainError::InvalidOrExpired)
    ));
    assert_eq!(h.service.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_resend_invalidates_first_code() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();
    let first = h.code_in_inbox("a@x.com");
    h.service.send_verification_code("a@x.com").await.unwrap();
    let second = h.code_in_inbox("a@x.com");

    assert_eq!(h.mock.sent_emails().len(), 2);
    if first != second {
        assert!(h.service.verify_code("a@x.com", &first).await.is_err());
    }
    assert!(h.service.verify_code("a@x.com", &second).await.is_ok());
}

#[tokio::test]
async fn test_wrong_code_then_correct_code() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();
    let code = h.code_in_inbox("a@x.com");

    assert!(h.service.verify_code("a@x.com", "000000").await.is_err());
    assert!(h.service.verify_code("a@x.com", &code).await.is_ok());
}

#[tokio::test]
async fn test_delivery_failure_surfaces() {
    let h = Harness::with_mock(MockEmailService::with_options(false, true));

    let result = h.service.send_verification_code("a@x.com").await;
    assert!(matches!(result, Err(DomainError::DeliveryFailure { .. })));
    assert_eq!(h.service.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_address_is_delivery_failure() {
    let h = Harness::new();
    let result = h.service.send_verification_code("not-an-address").await;
    assert!(matches!(result, Err(DomainError::DeliveryFailure { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_verification_succeeds_once() {
    let h = Harness::new();
    h.service.send_verification_code("a@x.com").await.unwrap();
    let code = h.code_in_inbox("a@x.com");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = h.service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service.verify_code("a@x.com", &code).await.is_ok()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
}

#[tokio::test]
async fn test_initialize_from_default_config() {
    init_tracing();
    let mut config = AppConfig::default();
    config.email.console_output = false;

    let services = sf_infra::initialize(&config);
    let service = &services.verification_service;

    assert_eq!(service.config().code_ttl_seconds, 300);
    let sent = service.send_verification_code("a@x.com").await.unwrap();
    assert!(sent.message_id.starts_with("mock_"));
    assert!(service.verify_code("a@x.com", &sent.record.code).await.is_ok());
}
