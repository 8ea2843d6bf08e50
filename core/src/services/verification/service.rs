//! Main verification service implementation

use std::sync::Arc;

use sf_shared::mask_email;

use crate::domain::entities::VerificationRecord;
use crate::errors::{DomainError, DomainResult};

use super::clock::{Clock, SystemClock};
use super::config::VerificationServiceConfig;
use super::traits::{CodeStoreTrait, DeliveryChannelTrait};
use super::types::SendCodeResult;

/// Verification service for issuing and checking one-time e-mail codes
pub struct VerificationService<C: CodeStoreTrait, D: DeliveryChannelTrait> {
    /// Store holding at most one pending record per key
    code_store: Arc<C>,
    /// Channel the code is delivered through
    delivery_channel: Arc<D>,
    /// Service configuration
    config: VerificationServiceConfig,
    /// Time source for issuance and expiry
    clock: Arc<dyn Clock>,
}

impl<C: CodeStoreTrait, D: DeliveryChannelTrait> VerificationService<C, D> {
    /// Create a new verification service using the system clock
    ///
    /// # Arguments
    ///
    /// * `code_store` - Code store implementation
    /// * `delivery_channel` - Delivery channel implementation
    /// * `config` - Service configuration
    pub fn new(
        code_store: Arc<C>,
        delivery_channel: Arc<D>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            code_store,
            delivery_channel,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a fresh code for `key` and deliver it
    ///
    /// This method:
    /// 1. Rejects a blank key
    /// 2. Generates a new code and stores it, replacing any pending one
    /// 3. Sends the code through the delivery channel
    ///
    /// The stored record survives a delivery failure, so a code that did
    /// arrive late still verifies.
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - The stored record and the provider message id
    /// * `Err(DomainError)` - Validation, storage or delivery failure
    pub async fn send_verification_code(&self, key: &str) -> DomainResult<SendCodeResult> {
        if key.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Email is required".to_string(),
            });
        }

        let masked = mask_email(key);
        let record = VerificationRecord::issue(key, self.clock.now(), self.config.code_ttl());

        self.code_store.put(record.clone()).await.map_err(|e| {
            tracing::error!(
                email = %masked,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store verification code"
            );
            DomainError::Internal {
                message: format!("Failed to store verification code: {}", e),
            }
        })?;

        tracing::info!(
            email = %masked,
            session_id = %record.id,
            expires_at = %record.expires_at,
            event = "otp_generated",
            "Generated new verification code"
        );

        let body = self.config.render_body(&record.code);
        match self
            .delivery_channel
            .send(key, &self.config.email_subject, &body)
            .await
        {
            Ok(message_id) => {
                tracing::info!(
                    email = %masked,
                    session_id = %record.id,
                    message_id = %message_id,
                    channel = self.delivery_channel.channel_name(),
                    event = "otp_delivered",
                    "Verification code delivered"
                );
                Ok(SendCodeResult { record, message_id })
            }
            Err(e) => {
                tracing::error!(
                    email = %masked,
                    session_id = %record.id,
                    channel = self.delivery_channel.channel_name(),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code, record kept"
                );
                Err(DomainError::DeliveryFailure { message: e })
            }
        }
    }

    /// Check `candidate` against the pending code for `key`
    ///
    /// The record is removed only when the code matches and has not expired.
    /// A wrong or expired attempt leaves the record in place. The match and
    /// the removal happen as one step in the store, so of two concurrent
    /// correct attempts only one succeeds.
    pub async fn verify_code(&self, key: &str, candidate: &str) -> DomainResult<()> {
        let masked = mask_email(key);
        let now = self.clock.now();
        let predicate = |record: &VerificationRecord| record.accepts(candidate, now);

        let consumed = self
            .code_store
            .consume_if(key, &predicate)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %masked,
                    error = %e,
                    event = "otp_lookup_failed",
                    "Failed to check verification code"
                );
                DomainError::Internal {
                    message: format!("Failed to check verification code: {}", e),
                }
            })?;

        if consumed {
            tracing::info!(
                email = %masked,
                event = "otp_verified",
                "Verification code accepted"
            );
            Ok(())
        } else {
            tracing::warn!(
                email = %masked,
                event = "otp_rejected",
                "Verification code rejected"
            );
            Err(DomainError::InvalidOrExpired)
        }
    }

    /// Number of records currently held by the store
    pub async fn pending_count(&self) -> DomainResult<usize> {
        self.code_store
            .pending_count()
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to count pending codes: {}", e),
            })
    }

    /// Drop any pending code for `key`
    pub async fn clear_verification(&self, key: &str) -> DomainResult<bool> {
        let removed = self
            .code_store
            .remove(key)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to clear verification code: {}", e),
            })?;

        if removed {
            tracing::debug!(email = %mask_email(key), event = "otp_cleared", "Cleared verification code");
        }
        Ok(removed)
    }
}
