//! Traits for code store and delivery channel integration

use async_trait::async_trait;

use crate::domain::entities::VerificationRecord;

/// Condition evaluated against a stored record while the store is locked
pub type RecordPredicate<'a> = &'a (dyn Fn(&VerificationRecord) -> bool + Send + Sync);

/// Trait for delivering a code to its destination
#[async_trait]
pub trait DeliveryChannelTrait: Send + Sync {
    /// Deliver a message, returning the provider's message id
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String>;
    /// Name of the channel for logging
    fn channel_name(&self) -> &str;
}

/// Trait for the keyed store of pending codes
///
/// Implementations must make every operation atomic with respect to the
/// others for the same key.
#[async_trait]
pub trait CodeStoreTrait: Send + Sync {
    /// Insert or replace the record for `record.key`
    async fn put(&self, record: VerificationRecord) -> Result<(), String>;
    /// Fetch a copy of the record for a key
    async fn get(&self, key: &str) -> Result<Option<VerificationRecord>, String>;
    /// Remove the record only if `predicate` holds for it; returns whether it was removed
    async fn consume_if(&self, key: &str, predicate: RecordPredicate<'_>) -> Result<bool, String>;
    /// Remove the record for a key; returns whether one existed
    async fn remove(&self, key: &str) -> Result<bool, String>;
    /// Number of records currently held, expired ones included
    async fn pending_count(&self) -> Result<usize, String>;
}
