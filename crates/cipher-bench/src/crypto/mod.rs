//! Encryption variants behind one comparable contract.
//!
//! Every variant binds a key with [`Encryptor::init`], produces a framed
//! message with [`Encryptor::encrypt`] and recovers the plaintext with
//! [`Encryptor::decrypt`].
//!
//! # Message layout
//!
//! ```text
//! AAD ‖ IV/nonce ‖ ciphertext ‖ tag?
//! ```
//!
//! AAD and IV lengths are not encoded in the message; see [`framing`].
//! [`text`] wraps the byte API for UTF-8 strings and Base64 messages.
//!
//! # Variants
//!
//! | Type | IV/nonce | Authentication | Padding |
//! |---|---|---|---|
//! | [`AesCbc`] | internal, random | none | PKCS#7 |
//! | [`AesCbcHmac`] | internal (inner [`AesCbc`]) | HMAC-SHA256, 32-byte tag | PKCS#7 |
//! | [`AesCbcRaw`] | caller-supplied | none | PKCS#7 by the variant layer |
//! | [`AesGcm`] | internal or fixed at construction | GCM, 16-byte tag | none |
//! | [`AesGcmSiv`] | internal | GCM-SIV, 16-byte tag | none |

pub mod aead;
pub mod aes_cbc;
pub mod aes_cbc_hmac;
pub mod aes_cbc_raw;
mod block;
pub mod error;
pub mod framing;
pub mod key;
pub mod padding;
pub mod text;

pub use aead::{AesGcm, AesGcmN128, AesGcmSiv, GCM_TAG_LEN};
pub use aes_cbc::AesCbc;
pub use aes_cbc_hmac::{AesCbcHmac, HMAC_TAG_LEN};
pub use aes_cbc_raw::AesCbcRaw;
pub use block::BLOCK_LEN;
pub use error::CipherError;
pub use key::{KeyMaterial, KeySize};

/// Where a variant's IV or nonce comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceSource {
    /// Generated by the variant; callers pass no IV to `encrypt` and `0` as `iv_len`.
    Internal,
    /// Supplied by the caller on every `encrypt`; `iv_len` must be passed to `decrypt`.
    External,
}

/// Capability set shared by every encryption variant.
pub trait Encryptor {
    /// Display name including the bound key width, e.g. `"AES256-GCM"`.
    ///
    /// Before `init` the width is omitted (`"AES-GCM"`).
    fn name(&self) -> String;

    /// Whether this variant generates its own IV/nonce.
    fn nonce_source(&self) -> NonceSource;

    /// Bind `key`, discarding any state derived from a previous key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless `key` is 16, 24 or 32 bytes.
    fn init(&mut self, key: &[u8]) -> Result<(), CipherError>;

    /// Encrypt `plaintext` into `AAD ‖ IV ‖ ciphertext ‖ tag?`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidArgument`] if `iv` contradicts
    /// [`Encryptor::nonce_source`], or [`CipherError::NotInitialised`] before `init`.
    fn encrypt(
        &self,
        plaintext: &[u8],
        iv: Option<&[u8]>,
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CipherError>;

    /// Verify and decrypt a message produced by [`Encryptor::encrypt`].
    ///
    /// `iv_len` is `0` for variants with an internal nonce (their own length is
    /// also accepted); `aad_len` is the length of the AAD prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::CorruptFraming`] if the lengths do not fit the
    /// message, [`CipherError::AuthenticationFailure`] if a tag does not verify.
    fn decrypt(&self, message: &[u8], iv_len: usize, aad_len: usize)
        -> Result<Vec<u8>, CipherError>;
}

impl<E: Encryptor + ?Sized> Encryptor for Box<E> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn nonce_source(&self) -> NonceSource {
        (**self).nonce_source()
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        (**self).init(key)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        iv: Option<&[u8]>,
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CipherError> {
        (**self).encrypt(plaintext, iv, aad)
    }

    fn decrypt(
        &self,
        message: &[u8],
        iv_len: usize,
        aad_len: usize,
    ) -> Result<Vec<u8>, CipherError> {
        (**self).decrypt(message, iv_len, aad_len)
    }
}

/// Display name `AES<bits>-<suffix>`, or `AES-<suffix>` without a key.
pub(crate) fn display_name(size: Option<KeySize>, suffix: &str) -> String {
    match size {
        Some(size) => format!("AES{}-{suffix}", size.bits()),
        None => format!("AES-{suffix}"),
    }
}

/// Check the `iv_len` a caller passed to an internal-nonce variant.
pub(crate) fn check_internal_iv_len(iv_len: usize, own_len: usize) -> Result<(), CipherError> {
    if iv_len == 0 || iv_len == own_len {
        Ok(())
    } else {
        Err(CipherError::InvalidArgument(
            "variant tracks its own IV length; pass 0 as iv_len",
        ))
    }
}
