//! Route handlers
//!
//! - `two_factor`: issuing and verifying one-time codes
//! - `health`: liveness and the endpoint index

pub mod health;
pub mod two_factor;

pub use two_factor::AppState;
