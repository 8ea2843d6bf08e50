//! # Storefront 2FA Core
//!
//! Core business logic for one-time e-mail verification codes: the
//! verification record entity, the issuing and verifying service, and the
//! traits the service depends on (code store, delivery channel, clock).

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
