use actix_web::{web, HttpResponse};

use sf_core::errors::DomainError;
use sf_core::services::verification::{CodeStoreTrait, DeliveryChannelTrait};
use sf_shared::{mask_email, VerifyResponse};

use super::AppState;
use crate::dto::Verify2faRequest;
use crate::handlers::error::verify_error_response;

/// Handler for POST /verify-2fa
///
/// Checks a candidate code and consumes it on success. A `code` that is not
/// a JSON string is rejected without touching the store.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "code": "482913" }
/// ```
///
/// # Responses
///
/// - `200 {"success": true}`
/// - `400 {"success": false, "message": "Invalid or expired code"}`
pub async fn verify_2fa<C, D>(
    state: web::Data<AppState<C, D>>,
    request: web::Json<Verify2faRequest>,
) -> HttpResponse
where
    C: CodeStoreTrait + 'static,
    D: DeliveryChannelTrait + 'static,
{
    let request = request.into_inner();

    let Some(candidate) = request.candidate() else {
        tracing::warn!(
            email = %mask_email(&request.email),
            event = "verify_2fa_invalid",
            "Rejected verify-2fa request with a non-string code"
        );
        return verify_error_response(&DomainError::InvalidOrExpired);
    };

    match state
        .verification_service
        .verify_code(&request.email, candidate)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(VerifyResponse::accepted()),
        Err(error) => verify_error_response(&error),
    }
}
