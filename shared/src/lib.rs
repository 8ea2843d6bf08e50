//! Shared utilities and common types for the storefront 2FA relay
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered loader
//! - Error and response structures for the HTTP wire format
//! - Utility functions (e-mail masking for logs)

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, CorsConfig, EmailConfig, Environment, LogFormat, LoggingConfig,
    ServerConfig, VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{MessageResponse, VerifyResponse};
pub use utils::email::mask_email;
