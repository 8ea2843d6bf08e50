//! Adapter exposing an [`EmailService`] as the core delivery channel

use async_trait::async_trait;
use sf_core::services::verification::DeliveryChannelTrait;
use sf_shared::EmailConfig;

use super::create_email_service;
use super::email_service::EmailService;

/// Delivery channel backed by an e-mail provider
pub struct EmailDelivery {
    inner: Box<dyn EmailService>,
}

impl EmailDelivery {
    pub fn new(inner: Box<dyn EmailService>) -> Self {
        Self { inner }
    }

    /// Build the configured provider and wrap it
    pub fn from_config(config: &EmailConfig) -> Self {
        Self::new(create_email_service(config))
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl DeliveryChannelTrait for EmailDelivery {
    async fn send(&self, destination: &str, subject: &str, body: &str) -> Result<String, String> {
        self.inner
            .send_email(destination, subject, body)
            .await
            .map_err(|e| e.to_string())
    }

    fn channel_name(&self) -> &str {
        self.inner.provider_name()
    }
}
