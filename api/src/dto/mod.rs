//! Request bodies accepted by the HTTP endpoints

pub mod two_factor;

pub use two_factor::{Send2faRequest, Verify2faRequest};
