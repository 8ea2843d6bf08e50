//! HTTP tests for the 2FA relay routes
//!
//! The app is assembled the same way `main` does it, over the in-memory
//! store, a mock mailer and a manual clock.

use std::sync::Arc;

use actix_web::{
    http::{header, Method, StatusCode},
    test, web, App,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use sf_api::app::{configure, json_config};
use sf_api::handlers::not_found;
use sf_api::middleware::cors::create_cors;
use sf_api::routes::AppState;
use sf_core::services::verification::{ManualClock, VerificationService, VerificationServiceConfig};
use sf_infra::cache::InMemoryCodeStore;
use sf_infra::email::{EmailDelivery, MockEmailService};
use sf_shared::CorsConfig;

type RelayState = AppState<InMemoryCodeStore, EmailDelivery>;

struct TestContext {
    mock: Arc<MockEmailService>,
    clock: Arc<ManualClock>,
    state: web::Data<RelayState>,
}

impl TestContext {
    fn new() -> Self {
        Self::with_mock(MockEmailService::with_options(false, false))
    }

    fn failing() -> Self {
        Self::with_mock(MockEmailService::with_options(false, true))
    }

    fn with_mock(mock: MockEmailService) -> Self {
        let mock = Arc::new(mock);
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = VerificationService::new(
            Arc::new(InMemoryCodeStore::new()),
            Arc::new(EmailDelivery::new(Box::new(mock.clone()))),
            VerificationServiceConfig::default(),
        )
        .with_clock(clock.clone());

        Self {
            mock,
            clock,
            state: web::Data::new(AppState::new(Arc::new(service))),
        }
    }

    fn code_for(&self, email: &str) -> String {
        let sent = self.mock.last_email_to(email).expect("an e-mail should have been sent");
        sent.body
            .strip_prefix("Your 2FA code is ")
            .expect("body should follow the default template")
            .to_string()
    }
}

macro_rules! relay_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .app_data($ctx.state.clone())
                .app_data(json_config(4096))
                .configure(configure::<InMemoryCodeStore, EmailDelivery>)
                .default_service(web::route().to(not_found)),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post().uri($uri).set_json($body).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_send_2fa_success() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    let (status, body) = post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Verification code sent" }));

    let sent = ctx.mock.last_email_to("a@x.com").unwrap();
    assert_eq!(sent.subject, "Your 2FA Verification Code");
    let code = ctx.code_for("a@x.com");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
}

#[actix_web::test]
async fn test_send_2fa_delivery_failure() {
    let ctx = TestContext::failing();
    let app = relay_app!(ctx);

    let (status, body) = post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Email failed to send" }));
}

#[actix_web::test]
async fn test_send_2fa_missing_email() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    for body in [json!({}), json!({ "email": "" }), json!({ "email": "   " })] {
        let (status, body) = post_json!(app, "/send-2fa", body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "message": "Email is required" }));
    }
    assert_eq!(ctx.mock.get_message_count(), 0);
}

#[actix_web::test]
async fn test_send_2fa_malformed_body() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/send-2fa")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_verify_2fa_success_then_replay() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let code = ctx.code_for("a@x.com");

    let (status, body) = post_json!(
        app,
        "/verify-2fa",
        json!({ "email": "a@x.com", "code": code.clone() })
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": code }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "success": false, "message": "Invalid or expired code" })
    );
}

#[actix_web::test]
async fn test_verify_2fa_wrong_code_keeps_pending() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let code = ctx.code_for("a@x.com");
    let wrong = if code == "123456" { "654321" } else { "123456" };

    let (status, _) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": wrong }));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": code }));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_verify_2fa_numeric_code_is_rejected() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let code = ctx.code_for("a@x.com");
    let numeric: u32 = code.parse().unwrap();

    for candidate in [json!(numeric), json!([code.clone()]), json!(true)] {
        let (status, body) = post_json!(
            app,
            "/verify-2fa",
            json!({ "email": "a@x.com", "code": candidate })
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Invalid or expired code" })
        );
    }

    // The pending code is untouched and still verifies as a string
    let (status, _) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": code }));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_verify_2fa_missing_fields_and_unknown_email() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    for body in [
        json!({}),
        json!({ "email": "a@x.com" }),
        json!({ "code": "123456" }),
        json!({ "email": "nobody@x.com", "code": "123456" }),
    ] {
        let (status, body) = post_json!(app, "/verify-2fa", body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid or expired code");
    }
}

#[actix_web::test]
async fn test_resend_invalidates_previous_code() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let first = ctx.code_for("a@x.com");
    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let second = ctx.code_for("a@x.com");

    if first != second {
        let (status, _) =
            post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": first }));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": second }));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_verify_2fa_expired_code() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let code = ctx.code_for("a@x.com");

    ctx.clock.advance(Duration::seconds(300));

    let (status, body) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": code }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired code");
}

#[actix_web::test]
async fn test_verify_2fa_just_before_expiry() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    let code = ctx.code_for("a@x.com");

    ctx.clock.advance(Duration::seconds(299));

    let (status, _) =
        post_json!(app, "/verify-2fa", json!({ "email": "a@x.com", "code": code }));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_health_reports_pending_codes() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    post_json!(app, "/send-2fa", json!({ "email": "a@x.com" }));
    post_json!(app, "/send-2fa", json!({ "email": "b@x.com" }));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pending_codes"], 2);
}

#[actix_web::test]
async fn test_api_info() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["endpoints"]["send_2fa"]["path"], "/send-2fa");
    assert_eq!(body["endpoints"]["send_2fa"]["code_ttl_seconds"], 300);
}

#[actix_web::test]
async fn test_unknown_route() {
    let ctx = TestContext::new();
    let app = relay_app!(ctx);

    let req = test::TestRequest::get().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["details"]["path"], "/login");
}

#[actix_web::test]
async fn test_cors_preflight() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(json_config(4096))
            .wrap(create_cors(&CorsConfig::development()))
            .configure(configure::<InMemoryCodeStore, EmailDelivery>),
    )
    .await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/verify-2fa")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
