//! Wire types shared between the API and its clients

pub mod response;

pub use response::{MessageResponse, VerifyResponse};
