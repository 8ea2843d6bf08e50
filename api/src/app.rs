//! Route table and request body limits
//!
//! Both the binary and the HTTP tests build their `App` from these pieces so
//! they serve the same routes.

use actix_web::web;

use sf_core::services::verification::{CodeStoreTrait, DeliveryChannelTrait};

use crate::handlers::json_error_handler;
use crate::routes::health::{api_info, health_check};
use crate::routes::two_factor::{send_2fa, verify_2fa};

/// Register every route
///
/// The caller adds `AppState<C, D>`, [`json_config`], middleware and the
/// `handlers::not_found` default service.
pub fn configure<C, D>(cfg: &mut web::ServiceConfig)
where
    C: CodeStoreTrait + 'static,
    D: DeliveryChannelTrait + 'static,
{
    cfg.route("/", web::get().to(api_info::<C, D>))
        .route("/health", web::get().to(health_check::<C, D>))
        .route("/send-2fa", web::post().to(send_2fa::<C, D>))
        .route("/verify-2fa", web::post().to(verify_2fa::<C, D>));
}

/// JSON extractor settings with the relay's error body
pub fn json_config(max_payload_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_size)
        .error_handler(json_error_handler)
}
