use actix_web::{web, HttpResponse};
use validator::Validate;

use sf_core::services::verification::{CodeStoreTrait, DeliveryChannelTrait};
use sf_shared::{mask_email, MessageResponse};

use super::AppState;
use crate::dto::Send2faRequest;
use crate::handlers::error::{send_error_response, CODE_SENT, EMAIL_REQUIRED};

/// Handler for POST /send-2fa
///
/// Issues a fresh code for the e-mail address and mails it, replacing any
/// code still pending for that address.
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com" }
/// ```
///
/// # Responses
///
/// - `200 {"message": "Verification code sent"}`
/// - `400 {"message": "Email is required"}`
/// - `500 {"message": "Email failed to send"}`
pub async fn send_2fa<C, D>(
    state: web::Data<AppState<C, D>>,
    request: web::Json<Send2faRequest>,
) -> HttpResponse
where
    C: CodeStoreTrait + 'static,
    D: DeliveryChannelTrait + 'static,
{
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        tracing::warn!(errors = %errors, event = "send_2fa_invalid", "Rejected send-2fa request");
        return HttpResponse::BadRequest().json(MessageResponse::new(EMAIL_REQUIRED));
    }

    match state
        .verification_service
        .send_verification_code(&request.email)
        .await
    {
        Ok(result) => {
            tracing::info!(
                email = %mask_email(&request.email),
                message_id = %result.message_id,
                event = "send_2fa_ok",
                "Verification code sent"
            );
            HttpResponse::Ok().json(MessageResponse::new(CODE_SENT))
        }
        Err(error) => {
            tracing::warn!(
                email = %mask_email(&request.email),
                error = %error,
                event = "send_2fa_failed",
                "Failed to send verification code"
            );
            send_error_response(&error)
        }
    }
}
