//! Shared response helpers for route handlers

pub mod error;

pub use error::{json_error_handler, not_found, send_error_response, verify_error_response};
