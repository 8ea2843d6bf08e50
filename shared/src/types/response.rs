//! Response bodies of the verification endpoints

use serde::{Deserialize, Serialize};

/// `{ "message": ... }` body returned by `/send-2fa`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "success": ..., "message"?: ... }` body returned by `/verify-2fa`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifyResponse {
    /// Accepted verification
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Rejected verification with a reason
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}
