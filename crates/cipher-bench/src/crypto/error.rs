//! Errors surfaced at the variant boundary.

use common::FailureKind;
use thiserror::Error;

use super::key::VALID_KEY_LENS;

/// Errors produced by an [`Encryptor`](super::Encryptor).
///
/// Primitive errors from the RustCrypto crates are mapped onto these variants
/// and never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key is not 16, 24 or 32 bytes.
    #[error("invalid key length {0}: expected one of {VALID_KEY_LENS:?} bytes")]
    InvalidKeyLength(usize),

    /// The caller violated the IV/nonce contract of the variant.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `encrypt`/`decrypt` was called before `init`.
    #[error("variant used before a key was bound")]
    NotInitialised,

    /// The declared lengths or padding do not fit the message.
    #[error("corrupt framing: {0}")]
    CorruptFraming(&'static str),

    /// The MAC or AEAD tag did not verify.
    #[error("authentication failed")]
    AuthenticationFailure,
}

impl CipherError {
    /// Map this error into the report-level taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            CipherError::InvalidKeyLength(_) => FailureKind::InvalidKeyLength,
            CipherError::InvalidArgument(_) => FailureKind::InvalidArgument,
            CipherError::NotInitialised => FailureKind::NotInitialised,
            CipherError::CorruptFraming(_) => FailureKind::CorruptFraming,
            CipherError::AuthenticationFailure => FailureKind::AuthenticationFailure,
        }
    }
}

impl From<aes_gcm::aead::Error> for CipherError {
    fn from(_: aes_gcm::aead::Error) -> Self {
        CipherError::AuthenticationFailure
    }
}
