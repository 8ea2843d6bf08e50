//! Outbound e-mail configuration module

use serde::{Deserialize, Serialize};

/// E-mail delivery provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider name ("mock", "smtp", "sendgrid", "mailgun", "failover")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// SMTP server host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP server port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Connection security: "tls" (implicit), "starttls" or "none"
    #[serde(default = "default_smtp_security")]
    pub smtp_security: String,

    /// SMTP login, usually the sender address
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password or app password
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// SendGrid API key
    #[serde(default)]
    pub sendgrid_api_key: Option<String>,

    /// SendGrid mail send endpoint
    #[serde(default = "default_sendgrid_api_url")]
    pub sendgrid_api_url: String,

    /// Mailgun API key
    #[serde(default)]
    pub mailgun_api_key: Option<String>,

    /// Mailgun sending domain
    #[serde(default)]
    pub mailgun_domain: Option<String>,

    /// Mailgun API base URL (US or EU region)
    #[serde(default = "default_mailgun_api_url")]
    pub mailgun_api_url: String,

    /// Maximum send attempts per message
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (doubled after each attempt)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Timeout for provider API requests in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Primary provider when `provider = "failover"`
    #[serde(default = "default_failover_primary")]
    pub failover_primary: String,

    /// Backup provider when `provider = "failover"`
    #[serde(default = "default_failover_backup")]
    pub failover_backup: String,

    /// Seconds to stay on the backup after a primary failure
    #[serde(default = "default_failover_timeout_secs")]
    pub failover_timeout_secs: u64,

    /// Print mock e-mails to stdout
    #[serde(default = "default_console_output")]
    pub console_output: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            from_address: default_from_address(),
            from_name: default_from_name(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_security: default_smtp_security(),
            smtp_username: None,
            smtp_password: None,
            sendgrid_api_key: None,
            sendgrid_api_url: default_sendgrid_api_url(),
            mailgun_api_key: None,
            mailgun_domain: None,
            mailgun_api_url: default_mailgun_api_url(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            failover_primary: default_failover_primary(),
            failover_backup: default_failover_backup(),
            failover_timeout_secs: default_failover_timeout_secs(),
            console_output: default_console_output(),
        }
    }
}

impl EmailConfig {
    /// Production must deliver real mail
    ///
    /// Rejects the mock provider (also as a failover leg) and providers
    /// missing their credentials, so a misconfiguration stops startup
    /// instead of falling back to the mock.
    pub fn validate_for_production(&self) -> Result<(), String> {
        if self.console_output {
            return Err("email.console_output must be off in production".to_string());
        }

        if self.provider == "failover" {
            self.check_provider(&self.failover_primary)?;
            return self.check_provider(&self.failover_backup);
        }
        self.check_provider(&self.provider)
    }

    fn check_provider(&self, name: &str) -> Result<(), String> {
        let configured = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        let missing = match name {
            "mock" => return Err("email.provider 'mock' is not allowed in production".to_string()),
            "smtp" if !configured(&self.smtp_username) || !configured(&self.smtp_password) => {
                "smtp_username and smtp_password"
            }
            "sendgrid" if !configured(&self.sendgrid_api_key) => "sendgrid_api_key",
            "mailgun" if !configured(&self.mailgun_api_key) || !configured(&self.mailgun_domain) => {
                "mailgun_api_key and mailgun_domain"
            }
            "smtp" | "sendgrid" | "mailgun" => return Ok(()),
            other => return Err(format!("email.provider '{}' is unknown", other)),
        };
        Err(format!("email.{} must be set for provider '{}'", missing, name))
    }
}

fn default_provider() -> String {
    String::from("mock")
}

fn default_from_address() -> String {
    String::from("no-reply@storefront.local")
}

fn default_from_name() -> String {
    String::from("Storefront")
}

fn default_smtp_host() -> String {
    String::from("smtp.gmail.com")
}

fn default_smtp_port() -> u16 {
    465
}

fn default_smtp_security() -> String {
    String::from("tls")
}

fn default_sendgrid_api_url() -> String {
    String::from("https://api.sendgrid.com/v3/mail/send")
}

fn default_mailgun_api_url() -> String {
    String::from("https://api.mailgun.net/v3")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_failover_primary() -> String {
    String::from("sendgrid")
}

fn default_failover_backup() -> String {
    String::from("mailgun")
}

fn default_failover_timeout_secs() -> u64 {
    30
}

fn default_console_output() -> bool {
    true
}
