//! E-mail service trait and address helpers

use async_trait::async_trait;

use crate::InfrastructureError;

pub use sf_shared::mask_email;

/// Common interface for outbound e-mail providers
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a plain-text e-mail
    ///
    /// # Returns
    ///
    /// The provider's message id
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Whether the provider is currently usable
    async fn is_available(&self) -> bool {
        true
    }
}

/// Loose address check run before handing an address to a provider
///
/// Only rejects what no provider would accept: a missing `@`, an empty
/// local part or domain, or embedded whitespace.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Render a `Name <address>` sender
pub fn format_sender(name: &str, address: &str) -> String {
    if name.trim().is_empty() {
        address.to_string()
    } else {
        format!("{} <{}>", name, address)
    }
}

#[async_trait]
impl<T: EmailService + ?Sized> EmailService for std::sync::Arc<T> {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, InfrastructureError> {
        (**self).send_email(to, subject, body).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }
}
