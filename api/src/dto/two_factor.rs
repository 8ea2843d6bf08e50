use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Body of `POST /send-2fa`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Send2faRequest {
    /// Address the code is sent to; also the key it is stored under
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Body of `POST /verify-2fa`
///
/// Missing fields default to empty so they fall through to an ordinary
/// rejection. `code` is kept as raw JSON; only a string is a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verify2faRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub code: Value,
}

impl Verify2faRequest {
    /// Candidate code, or `None` when `code` is neither a string nor absent
    pub fn candidate(&self) -> Option<&str> {
        match &self.code {
            Value::String(code) => Some(code),
            Value::Null => Some(""),
            _ => None,
        }
    }
}
