//! Email Service Module
//!
//! Outbound e-mail used to deliver verification codes.
//!
//! ## Features
//!
//! - **EmailService trait**: common interface for all providers
//! - **Mock implementation**: console output and an in-memory outbox
//! - **SMTP**: any SMTP relay through `lettre`
//! - **SendGrid and Mailgun**: HTTP API providers
//! - **Retry**: exponential backoff shared by the real providers
//! - **Failover**: primary/backup pair with automatic recovery
//! - **EmailDelivery**: adapter onto the core delivery channel trait

use std::time::Duration;

use sf_shared::EmailConfig;

pub mod delivery;
pub mod email_service;
pub mod failover_email;
pub mod mailgun;
pub mod mock_email;
pub mod retry;
pub mod sendgrid;
pub mod smtp;

pub use delivery::EmailDelivery;
pub use email_service::{format_sender, is_valid_email, EmailService};
pub use failover_email::FailoverEmailService;
pub use mailgun::{MailgunConfig, MailgunEmailService};
pub use mock_email::{MockEmailService, SentEmail};
pub use sendgrid::{SendGridConfig, SendGridEmailService};
pub use smtp::{SmtpConfig, SmtpEmailService, SmtpSecurity};

#[cfg(test)]
mod tests;

/// Create an e-mail service based on configuration
///
/// Unknown providers and providers that fail to initialize fall back to
/// the mock implementation, with an error logged.
pub fn create_email_service(config: &EmailConfig) -> Box<dyn EmailService> {
    match config.provider.as_str() {
        "failover" => create_failover_email_service(config),
        name => match build_provider(name, config) {
            Ok(service) => service,
            Err(e) => {
                tracing::error!(provider = name, error = %e, "Failed to initialize e-mail service");
                tracing::warn!("Falling back to mock e-mail service");
                Box::new(MockEmailService::with_options(config.console_output, false))
            }
        },
    }
}

/// Build a single named provider
pub fn build_provider(
    name: &str,
    config: &EmailConfig,
) -> Result<Box<dyn EmailService>, crate::InfrastructureError> {
    match name {
        "mock" => Ok(Box::new(MockEmailService::with_options(
            config.console_output,
            false,
        ))),
        "smtp" => {
            let smtp = SmtpConfig::from_email_config(config)?;
            Ok(Box::new(SmtpEmailService::new(smtp)?))
        }
        "sendgrid" => {
            let sendgrid = SendGridConfig::from_email_config(config)?;
            Ok(Box::new(SendGridEmailService::new(sendgrid)?))
        }
        "mailgun" => {
            let mailgun = MailgunConfig::from_email_config(config)?;
            Ok(Box::new(MailgunEmailService::new(mailgun)?))
        }
        other => Err(crate::InfrastructureError::Config(format!(
            "Unknown e-mail provider '{}'",
            other
        ))),
    }
}

/// Create a failover service from `failover_primary` and `failover_backup`
///
/// With only one usable provider, that provider is returned on its own.
pub fn create_failover_email_service(config: &EmailConfig) -> Box<dyn EmailService> {
    let primary = build_optional(&config.failover_primary, config);
    let backup = build_optional(&config.failover_backup, config);

    match (primary, backup) {
        (Some(primary), Some(backup)) => Box::new(FailoverEmailService::new(
            primary,
            backup,
            Duration::from_secs(config.failover_timeout_secs),
        )),
        (Some(service), None) | (None, Some(service)) => {
            tracing::warn!("Only one e-mail provider available, failover disabled");
            service
        }
        (None, None) => {
            tracing::error!("No e-mail providers available, using mock implementation");
            Box::new(MockEmailService::with_options(config.console_output, false))
        }
    }
}

fn build_optional(name: &str, config: &EmailConfig) -> Option<Box<dyn EmailService>> {
    match build_provider(name, config) {
        Ok(service) => Some(service),
        Err(e) => {
            tracing::warn!(provider = name, error = %e, "E-mail provider unavailable");
            None
        }
    }
}
