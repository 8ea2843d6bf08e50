//! Retry loop shared by the SMTP and HTTP e-mail providers

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::InfrastructureError;

/// Outcome of a single failed send attempt
#[derive(Debug)]
pub enum AttemptError {
    /// Rate limit, server error or transport failure
    Retryable(String),
    /// The provider rejected the request outright
    Fatal(String),
}

impl AttemptError {
    /// Classify an HTTP status returned by a provider
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!("HTTP {}: {}", status.as_u16(), body);
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            AttemptError::Retryable(message)
        } else {
            AttemptError::Fatal(message)
        }
    }
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        AttemptError::Retryable(e.to_string())
    }
}

/// Run `attempt` until it succeeds, fails fatally, or `max_attempts` is used up
///
/// The delay doubles after every retryable failure.
pub async fn send_with_retry<F, Fut>(
    provider: &str,
    max_attempts: u32,
    initial_delay: Duration,
    mut attempt: F,
) -> Result<String, InfrastructureError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, AttemptError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    let mut delay = initial_delay;

    loop {
        attempts += 1;
        debug!(provider, attempt = attempts, max_attempts, "Sending e-mail");

        match attempt().await {
            Ok(message_id) => return Ok(message_id),
            Err(AttemptError::Fatal(message)) => {
                return Err(InfrastructureError::Email(format!(
                    "{} rejected the request: {}",
                    provider, message
                )));
            }
            Err(AttemptError::Retryable(message)) => {
                if attempts >= max_attempts {
                    return Err(InfrastructureError::Email(format!(
                        "{} failed after {} attempts: {}",
                        provider, attempts, message
                    )));
                }
                warn!(
                    provider,
                    attempt = attempts,
                    error = %message,
                    "E-mail send failed, retrying after {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}
