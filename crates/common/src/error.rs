//! Failure taxonomy shared between the variant layer and the report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of why a variant run did not pass.
///
/// Kinds map to whether the benchmark may be re-attempted with corrected input:
/// - [`FailureKind::InvalidKeyLength`] → retryable with a 16/24/32-byte key
/// - [`FailureKind::InvalidArgument`] → not retryable (caller contract violation)
/// - [`FailureKind::NotInitialised`] → not retryable (caller contract violation)
/// - [`FailureKind::CorruptFraming`] → not retryable
/// - [`FailureKind::AuthenticationFailure`] → not retryable
/// - [`FailureKind::RoundTripMismatch`] → not retryable (variant bug)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Key length is not 16, 24 or 32 bytes.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// IV/nonce supplied where the variant manages it, or missing where it is required.
    #[error("invalid argument")]
    InvalidArgument,

    /// The variant was used before a key was bound.
    #[error("variant not initialised")]
    NotInitialised,

    /// Declared AAD/IV lengths or padding do not fit the message buffer.
    #[error("corrupt framing")]
    CorruptFraming,

    /// MAC or AEAD tag verification failed.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// Decryption succeeded but did not reproduce the original plaintext.
    #[error("round-trip mismatch")]
    RoundTripMismatch,
}

impl FailureKind {
    /// Short machine-readable code (e.g. `"corrupt_framing"`).
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::InvalidKeyLength => "invalid_key_length",
            FailureKind::InvalidArgument => "invalid_argument",
            FailureKind::NotInitialised => "not_initialised",
            FailureKind::CorruptFraming => "corrupt_framing",
            FailureKind::AuthenticationFailure => "authentication_failure",
            FailureKind::RoundTripMismatch => "round_trip_mismatch",
        }
    }

    /// Returns `true` if the caller may retry after correcting its input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::InvalidKeyLength)
    }
}
