//! Domain entities representing core business objects.

pub mod verification_record;

pub use verification_record::{
    VerificationRecord, CODE_LENGTH, CODE_MAX, CODE_MIN, DEFAULT_EXPIRATION_SECONDS,
};
