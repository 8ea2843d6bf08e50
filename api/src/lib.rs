//! HTTP transport for the storefront 2FA relay
//!
//! Exposes the verification service over two JSON endpoints,
//! `POST /send-2fa` and `POST /verify-2fa`, plus health and index routes.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
