use std::time::Duration;

use actix_web::{middleware::Condition, web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;

use sf_api::app::{configure, json_config};
use sf_api::handlers::not_found;
use sf_api::middleware::cors::create_cors;
use sf_api::routes::AppState;
use sf_api::telemetry::init_tracing;
use sf_infra::cache::InMemoryCodeStore;
use sf_infra::email::EmailDelivery;
use sf_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first; dotenvy never overrides a set variable
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        bind_address = %config.server.bind_address(),
        "Starting storefront 2FA relay"
    );

    let services = sf_infra::initialize(&config);
    let app_state = web::Data::new(AppState::new(services.verification_service));

    let cors_config = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config(max_payload_size))
            .wrap(Condition::new(cors_config.enabled, create_cors(&cors_config)))
            .wrap(TracingLogger::default())
            .configure(configure::<InMemoryCodeStore, EmailDelivery>)
            .default_service(web::route().to(not_found))
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive));

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    Ok(())
}
