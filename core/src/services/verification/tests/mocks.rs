//! Mock implementations for testing verification service

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::domain::entities::VerificationRecord;
use crate::services::verification::traits::{
    CodeStoreTrait, DeliveryChannelTrait, RecordPredicate,
};

/// A message captured by the mock delivery channel
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub destination: String,
    pub subject: String,
    pub body: String,
}

// Mock delivery channel for testing
pub struct MockDeliveryChannel {
    pub sent_messages: Arc<Mutex<Vec<SentMessage>>>,
    pub should_fail: AtomicBool,
}

impl MockDeliveryChannel {
    pub fn new(should_fail: bool) -> Self {
        Self {
            sent_messages: Arc::new(Mutex::new(Vec::new())),
            should_fail: AtomicBool::new(should_fail),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryChannelTrait for MockDeliveryChannel {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("Email service error".to_string());
        }
        self.sent_messages.lock().unwrap().push(SentMessage {
            destination: destination.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(format!("mock-msg-{}", uuid::Uuid::new_v4()))
    }

    fn channel_name(&self) -> &str {
        "mock"
    }
}

// Mock code store for testing
pub struct MockCodeStore {
    pub records: Arc<Mutex<HashMap<String, VerificationRecord>>>,
    pub should_fail: bool,
}

impl MockCodeStore {
    pub fn new(should_fail: bool) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            should_fail,
        }
    }

    fn check(&self) -> Result<(), String> {
        if self.should_fail {
            Err("Code store error".to_string())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CodeStoreTrait for MockCodeStore {
    async fn put(&self, record: VerificationRecord) -> Result<(), String> {
        self.check()?;
        self.records.lock().unwrap().insert(record.key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String> {
        self.check()?;
        Ok(self.records.lock().unwrap().get(key).cloned())
    }

    async fn consume_if(&self, key: &str, predicate: RecordPredicate<'_>) -> Result<bool, String> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        match records.get(key) {
            Some(record) if predicate(record) => {
                records.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, String> {
        self.check()?;
        Ok(self.records.lock().unwrap().remove(key).is_some())
    }

    async fn pending_count(&self) -> Result<usize, String> {
        self.check()?;
        Ok(self.records.lock().unwrap().len())
    }
}
