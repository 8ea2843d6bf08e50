//! Configuration for verification service

use chrono::Duration;
use sf_shared::config::verification::CODE_PLACEHOLDER;
use sf_shared::VerificationConfig;

use crate::domain::entities::DEFAULT_EXPIRATION_SECONDS;

/// Configuration for verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// How long an issued code stays valid, in seconds
    pub code_ttl_seconds: i64,
    /// Subject line of the delivered message
    pub email_subject: String,
    /// Body of the delivered message; `{code}` is replaced with the code
    pub email_body_template: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: DEFAULT_EXPIRATION_SECONDS,
            email_subject: "Your 2FA Verification Code".to_string(),
            email_body_template: format!("Your 2FA code is {}", CODE_PLACEHOLDER),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_ttl_seconds: i64::try_from(config.code_ttl_seconds)
                .unwrap_or(DEFAULT_EXPIRATION_SECONDS),
            email_subject: config.email_subject.clone(),
            email_body_template: config.email_body_template.clone(),
        }
    }
}

impl VerificationServiceConfig {
    pub fn code_ttl(&self) -> Duration {
        Duration::seconds(self.code_ttl_seconds)
    }

    /// Render the message body for a code
    pub fn render_body(&self, code: &str) -> String {
        self.email_body_template.replace(CODE_PLACEHOLDER, code)
    }
}
