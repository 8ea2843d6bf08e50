//! SMTP e-mail service implementation
//!
//! Sends plain-text mail through any SMTP relay (Gmail with an app password
//! by default). Transient SMTP replies (4xx) and connection failures are
//! retried with exponential backoff; permanent replies (5xx) are not.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use sf_shared::EmailConfig;

use super::email_service::{format_sender, is_valid_email, mask_email, EmailService};
use super::retry::{send_with_retry, AttemptError};
use crate::InfrastructureError;

/// How the connection to the relay is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// TLS from the first byte, usually port 465
    Tls,
    /// Plain connection upgraded with STARTTLS, usually port 587
    StartTls,
    /// No encryption; local relays and tests only
    None,
}

impl FromStr for SmtpSecurity {
    type Err = InfrastructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tls" | "ssl" => Ok(SmtpSecurity::Tls),
            "starttls" => Ok(SmtpSecurity::StartTls),
            "none" => Ok(SmtpSecurity::None),
            other => Err(InfrastructureError::Config(format!(
                "Unknown smtp_security '{}'",
                other
            ))),
        }
    }
}

/// SMTP service configuration
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Login and password; both or neither
    pub credentials: Option<(String, String)>,
    pub from_address: String,
    pub from_name: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for each SMTP command in seconds
    pub request_timeout_secs: u64,
}

impl SmtpConfig {
    /// Build from the e-mail section of the application config
    pub fn from_email_config(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        if config.smtp_host.trim().is_empty() {
            return Err(InfrastructureError::Config("smtp_host not set".to_string()));
        }

        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let credentials = match (non_empty(&config.smtp_username), non_empty(&config.smtp_password)) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => {
                return Err(InfrastructureError::Config(
                    "smtp_username and smtp_password must be set together".to_string(),
                ))
            }
        };

        if !is_valid_email(&config.from_address) {
            return Err(InfrastructureError::Config(
                "from_address must be a valid e-mail address".to_string(),
            ));
        }

        Ok(Self {
            host: config.smtp_host.trim().to_string(),
            port: config.smtp_port,
            security: config.smtp_security.parse()?,
            credentials,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

/// SMTP e-mail service
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    config: SmtpConfig,
}

impl SmtpEmailService {
    pub fn new(config: SmtpConfig) -> Result<Self, InfrastructureError> {
        let builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
            SmtpSecurity::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &config.host,
            )),
        }
        .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?;

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.request_timeout_secs)));
        if let Some((username, password)) = &config.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let address = Address::from_str(&config.from_address)
            .map_err(|e| InfrastructureError::Config(format!("Invalid from_address: {}", e)))?;
        let name = Some(config.from_name.trim().to_string()).filter(|n| !n.is_empty());

        info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            from = %mask_email(&config.from_address),
            "SMTP e-mail service initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from: Mailbox::new(name, address),
            config,
        })
    }

    /// Plain-text message with a generated `Message-ID`; returns both
    pub fn build_message(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(Message, String), InfrastructureError> {
        let recipient = Mailbox::from_str(to).map_err(|_| {
            InfrastructureError::Email(format!("Invalid e-mail address: {}", mask_email(to)))
        })?;

        let domain = self.from.email.domain().to_string();
        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4().simple(), domain);

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))?;

        Ok((message, message_id))
    }

    async fn attempt(&self, message: &Message, message_id: &str) -> Result<String, AttemptError> {
        match self.transport.send(message.clone()).await {
            Ok(_) => Ok(message_id.to_string()),
            Err(e) if e.is_permanent() => Err(AttemptError::Fatal(e.to_string())),
            Err(e) => Err(AttemptError::Retryable(e.to_string())),
        }
    }

    /// Sender line as it appears in the `From` header
    pub fn sender(&self) -> String {
        format_sender(&self.config.from_name, &self.config.from_address)
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
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

        let (message, message_id) = self.build_message(to, subject, body)?;
        let result = send_with_retry(
            self.provider_name(),
            self.config.max_retries,
            Duration::from_millis(self.config.retry_delay_ms),
            || self.attempt(&message, &message_id),
        )
        .await;

        match &result {
            Ok(message_id) => info!(
                to = %mask_email(to),
                message_id = %message_id,
                sender = %self.sender(),
                "E-mail sent via SMTP"
            ),
            Err(e) => error!(to = %mask_email(to), error = %e, "SMTP delivery failed"),
        }
        result
    }

    fn provider_name(&self) -> &str {
        "SMTP"
    }
}
