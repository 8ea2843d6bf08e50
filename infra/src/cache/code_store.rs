//! In-memory code store implementation
//!
//! One map guarded by one async mutex. Every operation takes the lock for
//! its whole duration, so `consume_if` evaluates its predicate and removes
//! the record without another caller observing the record in between.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

use sf_core::domain::entities::VerificationRecord;
use sf_core::services::verification::{CodeStoreTrait, RecordPredicate};
use sf_shared::mask_email;

/// Process-wide store of pending verification records, keyed by e-mail
#[derive(Debug, Default)]
pub struct InMemoryCodeStore {
    records: Mutex<HashMap<String, VerificationRecord>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CodeStoreTrait for InMemoryCodeStore {
    async fn put(&self, record: VerificationRecord) -> Result<(), String> {
        let mut records = self.records.lock().await;
        if let Some(previous) = records.insert(record.key.clone(), record) {
            debug!(
                email = %mask_email(&previous.key),
                replaced_session_id = %previous.id,
                "Replaced pending verification code"
            );
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn consume_if(&self, key: &str, predicate: RecordPredicate<'_>) -> Result<bool, String> {
        let mut records = self.records.lock().await;
        let matched = records.get(key).is_some_and(predicate);
        if matched {
            records.remove(key);
        }
        Ok(matched)
    }

    async fn remove(&self, key: &str) -> Result<bool, String> {
        Ok(self.records.lock().await.remove(key).is_some())
    }

    async fn pending_count(&self) -> Result<usize, String> {
        Ok(self.records.lock().await.len())
    }
}
