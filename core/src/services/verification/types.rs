//! Result types for verification operations

use serde::{Deserialize, Serialize};

use crate::domain::entities::VerificationRecord;

/// Outcome of a successful send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResult {
    /// The record that was stored
    pub record: VerificationRecord,
    /// Message id reported by the delivery channel
    pub message_id: String,
}
