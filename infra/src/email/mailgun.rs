//! Mailgun e-mail service implementation
//!
//! Posts form-encoded messages to `{api_url}/{domain}/messages` with HTTP
//! basic auth (`api:<key>`). The JSON response carries the message id.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use sf_shared::EmailConfig;

use super::email_service::{format_sender, is_valid_email, mask_email, EmailService};
use super::retry::{send_with_retry, AttemptError};
use crate::InfrastructureError;

/// Mailgun service configuration
#[derive(Debug, Clone)]
pub struct MailgunConfig {
    pub api_key: String,
    /// Sending domain registered with Mailgun
    pub domain: String,
    /// API base URL, region specific
    pub api_url: String,
    pub from_address: String,
    pub from_name: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl MailgunConfig {
    /// Build from the e-mail section of the application config
    pub fn from_email_config(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let api_key = config
            .mailgun_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("mailgun_api_key not set".to_string()))?;
        let domain = config
            .mailgun_domain
            .clone()
            .filter(|domain| !domain.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("mailgun_domain not set".to_string()))?;

        Ok(Self {
            api_key,
            domain,
            api_url: config.mailgun_api_url.trim_end_matches('/').to_string(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
        })
    }

    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_url, self.domain)
    }
}

#[derive(Debug, Deserialize)]
struct MailgunResponse {
    id: Option<String>,
}

/// Mailgun e-mail service
pub struct MailgunEmailService {
    client: reqwest::Client,
    config: MailgunConfig,
}

impl MailgunEmailService {
    pub fn new(config: MailgunConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(domain = %config.domain, "Mailgun e-mail service initialized");

        Ok(Self { client, config })
    }

    /// Form fields for one plain-text message
    pub fn build_form(&self, to: &str, subject: &str, body: &str) -> Vec<(&'static str, String)> {
        vec![
            (
                "from",
                format_sender(&self.config.from_name, &self.config.from_address),
            ),
            ("to", to.to_string()),
            ("subject", subject.to_string()),
            ("text", body.to_string()),
        ]
    }

    async fn attempt(&self, form: &[(&'static str, String)]) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth("api", Some(&self.config.api_key))
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::from_status(status, &body));
        }

        // Accepted at this point; an unreadable body must not trigger a resend
        let message_id = response
            .json::<MailgunResponse>()
            .await
            .ok()
            .and_then(|parsed| parsed.id);
        Ok(message_id.unwrap_or_else(|| format!("mailgun_{}", uuid::Uuid::new_v4().simple())))
    }
}

#[async_trait]
impl EmailService for MailgunEmailService {
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

        let form = self.build_form(to, subject, body);
        let result = send_with_retry(
            self.provider_name(),
            self.config.max_retries,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.attempt(&form),
        )
        .await;

        match &result {
            Ok(message_id) => info!(
                to = %mask_email(to),
                message_id = %message_id,
                "E-mail sent via Mailgun"
            ),
            Err(e) => error!(to = %mask_email(to), error = %e, "Mailgun delivery failed"),
        }
        result
    }

    fn provider_name(&self) -> &str {
        "Mailgun"
    }
}
