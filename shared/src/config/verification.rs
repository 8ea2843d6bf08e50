//! Verification code configuration module

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the generated code in the message body
pub const CODE_PLACEHOLDER: &str = "{code}";

/// One-time code lifetime and delivery message templates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Seconds between issuance and expiry of a code
    #[serde(default = "default_code_ttl_seconds")]
    pub code_ttl_seconds: u64,

    /// Subject line of the delivery message
    #[serde(default = "default_email_subject")]
    pub email_subject: String,

    /// Body of the delivery message; must contain `{code}`
    #[serde(default = "default_email_body_template")]
    pub email_body_template: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl_seconds(),
            email_subject: default_email_subject(),
            email_body_template: default_email_body_template(),
        }
    }
}

impl VerificationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.code_ttl_seconds == 0 {
            return Err("verification.code_ttl_seconds must be greater than zero".to_string());
        }
        if !self.email_body_template.contains(CODE_PLACEHOLDER) {
            return Err(format!(
                "verification.email_body_template must contain {}",
                CODE_PLACEHOLDER
            ));
        }
        Ok(())
    }
}

fn default_code_ttl_seconds() -> u64 {
    300  // 5 minutes
}

fn default_email_subject() -> String {
    String::from("Your 2FA Verification Code")
}

fn default_email_body_template() -> String {
    String::from("Your 2FA code is {code}")
}
