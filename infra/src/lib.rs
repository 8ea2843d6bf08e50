//! # Infrastructure Layer
//!
//! Concrete implementations of the seams the core verification service
//! depends on:
//!
//! - **Cache**: process-local store of pending verification records
//! - **Email**: outbound e-mail providers (mock, SMTP, SendGrid, Mailgun) with
//!   retry and failover, adapted to the core delivery channel trait
//!
//! [`initialize`] wires both into a ready-to-use verification service.

use std::sync::Arc;

use sf_core::services::verification::{VerificationService, VerificationServiceConfig};
use sf_shared::AppConfig;

// Re-export core types for convenience
pub use sf_core::errors::*;

/// Cache module - in-memory code store
pub mod cache;

/// Email module - outbound e-mail providers
pub mod email;

use cache::InMemoryCodeStore;
use email::EmailDelivery;

/// Verification service wired with the in-memory store and e-mail delivery
pub type RelayVerificationService = VerificationService<InMemoryCodeStore, EmailDelivery>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    pub verification_service: Arc<RelayVerificationService>,
}

/// Initialize infrastructure services from application configuration
///
/// This function sets up:
/// - The process-wide code store
/// - The configured e-mail provider (falls back to mock on misconfiguration)
/// - The verification service on top of both
pub fn initialize(config: &AppConfig) -> InfrastructureServices {
    tracing::info!("Initializing infrastructure services...");

    let code_store = Arc::new(InMemoryCodeStore::new());
    let delivery = Arc::new(EmailDelivery::from_config(&config.email));
    let service_config = VerificationServiceConfig::from(&config.verification);

    tracing::info!(
        provider = delivery.provider_name(),
        code_ttl_seconds = service_config.code_ttl_seconds,
        "Infrastructure services initialized successfully"
    );

    InfrastructureServices {
        verification_service: Arc::new(VerificationService::new(
            code_store,
            delivery,
            service_config,
        )),
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email service error
    #[error("Email service error: {0}")]
    Email(String),
}
