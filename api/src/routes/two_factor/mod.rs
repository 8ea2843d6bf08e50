//! Two-factor route handlers

use std::sync::Arc;

use sf_core::services::verification::{CodeStoreTrait, DeliveryChannelTrait, VerificationService};

pub mod send_2fa;
pub mod verify_2fa;

pub use send_2fa::send_2fa;
pub use verify_2fa::verify_2fa;

/// Application state that holds shared services
pub struct AppState<C, D>
where
    C: CodeStoreTrait,
    D: DeliveryChannelTrait,
{
    pub verification_service: Arc<VerificationService<C, D>>,
}

impl<C, D> AppState<C, D>
where
    C: CodeStoreTrait,
    D: DeliveryChannelTrait,
{
    pub fn new(verification_service: Arc<VerificationService<C, D>>) -> Self {
        Self {
            verification_service,
        }
    }
}
