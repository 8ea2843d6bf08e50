//! Mapping from domain errors to HTTP responses
//!
//! The two verification endpoints answer with their own compact bodies
//! (`{"message"}` and `{"success", "message"}`); everything else uses
//! [`ErrorResponse`].

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use sf_core::errors::DomainError;
use sf_shared::{error_codes, ErrorResponse, MessageResponse, VerifyResponse};

pub const CODE_SENT: &str = "Verification code sent";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_FAILED: &str = "Email failed to send";
pub const INVALID_OR_EXPIRED: &str = "Invalid or expired code";

/// Response for a failed `POST /send-2fa`
pub fn send_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { .. } => {
            HttpResponse::BadRequest().json(MessageResponse::new(EMAIL_REQUIRED))
        }
        DomainError::DeliveryFailure { .. } => {
            HttpResponse::InternalServerError().json(MessageResponse::new(EMAIL_FAILED))
        }
        DomainError::InvalidOrExpired => {
            HttpResponse::BadRequest().json(VerifyResponse::rejected(INVALID_OR_EXPIRED))
        }
        DomainError::Internal { .. } => internal_error_response(error),
    }
}

/// Response for a failed `POST /verify-2fa`
///
/// Every client-side failure collapses into the same rejection body.
pub fn verify_error_response(error: &DomainError) -> HttpResponse {
    if error.is_client_error() {
        HttpResponse::BadRequest().json(VerifyResponse::rejected(INVALID_OR_EXPIRED))
    } else {
        internal_error_response(error)
    }
}

fn internal_error_response(error: &DomainError) -> HttpResponse {
    tracing::error!(error = %error, "Request failed with internal error");
    HttpResponse::InternalServerError().json(ErrorResponse::new(
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    ))
}

/// Error handler for `web::JsonConfig` so malformed bodies get a JSON answer
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected malformed request body");

    let response = HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::BAD_REQUEST, "Invalid request body")
            .add_detail("reason", err.to_string()),
    );
    actix_web::error::InternalError::from_response(err, response).into()
}

/// Default service for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::new(error_codes::NOT_FOUND, "The requested resource was not found")
            .add_detail("path", req.path()),
    )
}
