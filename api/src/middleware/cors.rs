//! CORS middleware configuration for cross-origin requests.
//!
//! The storefront front end is served from its own origin and calls the
//! relay straight from the browser. Development accepts any origin;
//! production only the origins listed in `cors.allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use sf_shared::CorsConfig;

/// Build the CORS middleware from configuration
///
/// Wrap it in `actix_web::middleware::Condition` keyed on `config.enabled`.
pub fn create_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(config.max_age);

    if config.allow_any_origin {
        tracing::info!("Configuring permissive CORS (any origin)");
        return cors.allow_any_origin();
    }

    for origin in config.allowed_origins.iter().map(|s| s.trim()) {
        if origin == "*" {
            tracing::warn!("Ignoring wildcard in cors.allowed_origins, set cors.allow_any_origin instead");
            continue;
        }
        if !origin.is_empty() {
            tracing::info!(origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
