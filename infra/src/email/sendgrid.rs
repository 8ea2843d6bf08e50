//! SendGrid e-mail service implementation
//!
//! Sends plain-text mail through the SendGrid v3 `mail/send` endpoint.
//! A 202 response carries the message id in the `X-Message-Id` header.
//! Rate limits and server errors are retried with exponential backoff.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

use sf_shared::EmailConfig;

use super::email_service::{format_sender, is_valid_email, mask_email, EmailService};
use super::retry::{send_with_retry, AttemptError};
use crate::InfrastructureError;

/// SendGrid service configuration
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// Mail send endpoint
    pub api_url: String,
    pub from_address: String,
    pub from_name: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl SendGridConfig {
    /// Build from the e-mail section of the application config
    pub fn from_email_config(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .sendgrid_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("sendgrid_api_key not set".to_string()))?;

        if !is_valid_email(&config.from_address) {
            return Err(InfrastructureError::Config(
                "from_address must be a valid e-mail address".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            api_url: config.sendgrid_api_url.clone(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

/// SendGrid e-mail service
pub struct SendGridEmailService {
    client: reqwest::Client,
    config: SendGridConfig,
}

impl SendGridEmailService {
    pub fn new(config: SendGridConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            from = %mask_email(&config.from_address),
            "SendGrid e-mail service initialized"
        );

        Ok(Self { client, config })
    }

    /// Request body for one plain-text message
    pub fn build_payload(&self, to: &str, subject: &str, body: &str) -> Value {
        let mut from = json!({ "email": self.config.from_address });
        if !self.config.from_name.trim().is_empty() {
            from["name"] = json!(self.config.from_name);
        }

        json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": from,
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }],
        })
    }

    async fn attempt(&self, payload: &Value) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let message_id = response
                .headers()
                .get("x-message-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| format!("sendgrid_{}", uuid::Uuid::new_v4().simple()));
            return Ok(message_id);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AttemptError::from_status(status, &body))
    }

    /// Sender line as SendGrid renders it
    pub fn sender(&self) -> String {
        format_sender(&self.config.from_name, &self.config.from_address)
    }
}

#[async_trait]
impl EmailService for SendGridEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        if !is_valid_email(to) {
            return Err(InfrastructureError::Email(format!(
                "Invalid e-mail address: {}",
                mask_email(to)
            )));
        }

        let payload = self.build_payload(to, subject, body);
        let result = send_with_retry(
            self.provider_name(),
            self.config.max_retries,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.attempt(&payload),
        )
        .await;

        match &result {
            Ok(message_id) => info!(
                to = %mask_email(to),
                message_id = %message_id,
                sender = %self.sender(),
                "E-mail sent via SendGrid"
            ),
            Err(e) => error!(to = %mask_email(to), error = %e, "SendGrid delivery failed"),
        }
        result
    }

    fn provider_name(&self) -> &str {
        "SendGrid"
    }
}
