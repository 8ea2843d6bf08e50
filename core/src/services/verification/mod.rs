//! Verification service module for e-mail based two-factor authentication
//!
//! This module provides the one-time code workflow:
//! - Code generation, storage and delivery by e-mail
//! - Single-use verification with expiry
//! - Seams for the code store, the delivery channel and the clock

mod clock;
mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{CodeStoreTrait, DeliveryChannelTrait, RecordPredicate};
pub use types::SendCodeResult;
