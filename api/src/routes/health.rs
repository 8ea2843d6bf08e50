use actix_web::{web, HttpResponse};
use serde_json::json;

use sf_core::services::verification::{CodeStoreTrait, DeliveryChannelTrait};

use super::AppState;

pub const SERVICE_NAME: &str = "storefront-2fa-relay";

/// Handler for GET /health
pub async fn health_check<C, D>(state: web::Data<AppState<C, D>>) -> HttpResponse
where
    C: CodeStoreTrait + 'static,
    D: DeliveryChannelTrait + 'static,
{
    match state.verification_service.pending_count().await {
        Ok(pending_codes) => HttpResponse::Ok().json(json!({
            "status": "healthy",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "pending_codes": pending_codes,
        })),
        Err(error) => {
            tracing::error!(error = %error, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        }
    }
}

/// Handler for GET /
pub async fn api_info<C, D>(state: web::Data<AppState<C, D>>) -> HttpResponse
where
    C: CodeStoreTrait + 'static,
    D: DeliveryChannelTrait + 'static,
{
    let ttl = state.verification_service.config().code_ttl_seconds;

    HttpResponse::Ok().json(json!({
        "message": "Storefront 2FA relay",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": {
                "path": "/health",
                "method": "GET",
            },
            "send_2fa": {
                "path": "/send-2fa",
                "method": "POST",
                "description": "E-mail a one-time 6-digit code",
                "request_body": { "email": "string" },
                "code_ttl_seconds": ttl,
                "responses": {
                    "200": "Verification code sent",
                    "400": "Email is required",
                    "500": "Email failed to send",
                },
            },
            "verify_2fa": {
                "path": "/verify-2fa",
                "method": "POST",
                "description": "Check and consume a one-time code",
                "request_body": { "email": "string", "code": "string" },
                "responses": {
                    "200": "Code accepted",
                    "400": "Invalid or expired code",
                },
            },
        },
    }))
}
