//! Mock e-mail service for development and tests
//!
//! Prints each message to stdout instead of sending it and keeps the most
//! recent messages in a bounded outbox so tests can read back the code.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;

use super::email_service::{is_valid_email, mask_email, EmailService};
use crate::InfrastructureError;

/// Messages kept in the outbox; older ones are dropped
pub const OUTBOX_CAPACITY: usize = 64;

/// A message captured by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mock e-mail service
pub struct MockEmailService {
    message_count: AtomicU64,
    outbox: Mutex<VecDeque<SentEmail>>,
    console_output: bool,
    simulate_failure: bool,
}

impl MockEmailService {
    /// Mock with console output enabled
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: AtomicU64::new(0),
            outbox: Mutex::new(VecDeque::with_capacity(OUTBOX_CAPACITY)),
            console_output,
            simulate_failure,
        }
    }

    pub fn set_simulate_failure(&mut self, fail: bool) {
        self.simulate_failure = fail;
    }

    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Retained messages, oldest first
    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Most recent message sent to `to`
    pub fn last_email_to(&self, to: &str) -> Option<SentEmail> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|email| email.to == to)
            .cloned()
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if self.simulate_failure {
            return Err(InfrastructureError::Email(
                "Simulated e-mail delivery failure".to_string(),
            ));
        }

        if !is_valid_email(to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid e-mail address: {}",
                mask_email(to)
            )));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = format!("mock_{}_{}", count, uuid::Uuid::new_v4().simple());

        if self.console_output {
            println!("==================== MOCK E-MAIL ====================");
            println!("To:      {}", to);
            println!("Subject: {}", subject);
            println!("Id:      {}", message_id);
            println!("-----------------------------------------------------");
            println!("{}", body);
            println!("=====================================================");
        }

        info!(
            to = %mask_email(to),
            message_id = %message_id,
            "Mock e-mail sent"
        );

        let mut outbox = self.outbox.lock().unwrap_or_else(|e| e.into_inner());
        if outbox.len() == OUTBOX_CAPACITY {
            outbox.pop_front();
        }
        outbox.push_back(SentEmail {
            message_id: message_id.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }

    async fn is_available(&self) -> bool {
        !self.simulate_failure
    }
}
