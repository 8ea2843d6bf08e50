//! Verification record entity for e-mail based two-factor authentication.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Smallest code that can be issued
pub const CODE_MIN: u32 = 100_000;

/// Largest code that can be issued
pub const CODE_MAX: u32 = 999_999;

/// Default lifetime of a verification code (5 minutes)
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 300;

/// A pending one-time code for a single key
///
/// At most one record exists per key; issuing again replaces it. The record
/// is removed on successful verification and otherwise lingers, logically
/// expired, until it is overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Identifier used to correlate log lines for one issuance
    pub id: Uuid,

    /// Identifying key (the e-mail address the code was sent to)
    pub key: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp from which the code is no longer accepted
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Issues a record with a freshly generated code
    ///
    /// # Arguments
    ///
    /// * `key` - The identifying key the code is issued for
    /// * `now` - Issuance time
    /// * `ttl` - Lifetime of the code
    pub fn issue(key: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::with_code(key, Self::generate_code(), now, ttl)
    }

    /// Builds a record around a known code
    pub fn with_code(
        key: impl Into<String>,
        code: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            code: code.into(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Generates a 6-digit code, uniform over `CODE_MIN..=CODE_MAX`
    ///
    /// Drawn from the OS random source. The code is short-lived and
    /// single-use; it is not a cryptographic token.
    pub fn generate_code() -> String {
        OsRng.gen_range(CODE_MIN..=CODE_MAX).to_string()
    }

    /// Whether the record is past its expiry at `now`
    ///
    /// The expiry instant itself already counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Exact string comparison in constant time
    pub fn matches(&self, candidate: &str) -> bool {
        self.code.len() == candidate.len()
            && constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Whether `candidate` verifies this record at `now`
    pub fn accepts(&self, candidate: &str, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now) && self.matches(candidate)
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
