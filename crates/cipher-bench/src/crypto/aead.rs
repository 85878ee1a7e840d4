//! AES-GCM and AES-GCM-SIV behind the [`Encryptor`] contract.
//!
//! ```text
//! AAD ‖ nonce(12 or 16) ‖ ciphertext ‖ tag(16)
//! ```
//!
//! The nonce is drawn from the OS CSPRNG for every message unless one was fixed
//! at construction with [`AeadEncryptor::with_nonce`]. A 96-bit nonce is the
//! default: GCM uses it directly as the counter block, while any other size
//! costs an extra GHASH pass. Nonces shorter than 96 bits are not offered.
//!
//! On a tag mismatch the decrypted buffer is zeroed before the error is
//! returned, so no partial plaintext escapes.

use std::fmt;
use std::marker::PhantomData;

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::{
    consts::{U12, U16},
    generic_array::{typenum::Unsigned, ArrayLength, GenericArray},
    AeadInPlace, KeyInit,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use super::framing::Frame;
use super::{check_internal_iv_len, display_name, CipherError, Encryptor, KeySize, NonceSource};

/// Byte length of the GCM / GCM-SIV authentication tag (128 bits).
pub const GCM_TAG_LEN: usize = 16;

type Tag = GenericArray<u8, U16>;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::U12 {}
    impl Sealed for super::U16 {}
}

/// Nonce sizes offered for AES-GCM: 96 bits (default) and 128 bits.
pub trait GcmNonceSize: ArrayLength<u8> + sealed::Sealed + 'static {
    /// Name suffix for this nonce size.
    const SUFFIX: &'static str;
}

impl GcmNonceSize for U12 {
    const SUFFIX: &'static str = "GCM";
}

impl GcmNonceSize for U16 {
    const SUFFIX: &'static str = "GCM-N128";
}

/// One AEAD construction at each of the three AES key widths.
pub trait AeadSuite: 'static {
    /// Name suffix, e.g. `"GCM"`.
    const LABEL: &'static str;
    /// Nonce length as a type-level integer.
    type NonceSize: ArrayLength<u8>;
    /// Construction keyed with a 128-bit key.
    type C128: AeadInPlace<NonceSize = Self::NonceSize, TagSize = U16> + KeyInit;
    /// Construction keyed with a 192-bit key.
    type C192: AeadInPlace<NonceSize = Self::NonceSize, TagSize = U16> + KeyInit;
    /// Construction keyed with a 256-bit key.
    type C256: AeadInPlace<NonceSize = Self::NonceSize, TagSize = U16> + KeyInit;
}

/// AES-GCM with nonce size `N`.
pub struct Gcm<N>(PhantomData<N>);

impl<N: GcmNonceSize> AeadSuite for Gcm<N> {
    const LABEL: &'static str = N::SUFFIX;
    type NonceSize = N;
    type C128 = aes_gcm::AesGcm<Aes128, N>;
    type C192 = aes_gcm::AesGcm<Aes192, N>;
    type C256 = aes_gcm::AesGcm<Aes256, N>;
}

/// AES-GCM-SIV (RFC 8452), nonce-misuse resistant.
pub struct GcmSiv;

impl AeadSuite for GcmSiv {
    const LABEL: &'static str = "GCM-SIV";
    type NonceSize = U12;
    type C128 = aes_gcm_siv::AesGcmSiv<Aes128>;
    type C192 = aes_gcm_siv::AesGcmSiv<Aes192>;
    type C256 = aes_gcm_siv::AesGcmSiv<Aes256>;
}

enum Keyed<S: AeadSuite> {
    Aes128(S::C128),
    Aes192(S::C192),
    Aes256(S::C256),
}

impl<S: AeadSuite> Keyed<S> {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(key.len());
        Ok(match KeySize::from_len(key.len())? {
            KeySize::Aes128 => Keyed::Aes128(S::C128::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes192 => Keyed::Aes192(S::C192::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes256 => Keyed::Aes256(S::C256::new_from_slice(key).map_err(invalid)?),
        })
    }

    fn size(&self) -> KeySize {
        match self {
            Keyed::Aes128(_) => KeySize::Aes128,
            Keyed::Aes192(_) => KeySize::Aes192,
            Keyed::Aes256(_) => KeySize::Aes256,
        }
    }

    fn seal(
        &self,
        nonce: &GenericArray<u8, S::NonceSize>,
        aad: &[u8],
        buf: &mut [u8],
    ) -> Result<Tag, CipherError> {
        let tag = match self {
            Keyed::Aes128(c) => c.encrypt_in_place_detached(nonce, aad, buf),
            Keyed::Aes192(c) => c.encrypt_in_place_detached(nonce, aad, buf),
            Keyed::Aes256(c) => c.encrypt_in_place_detached(nonce, aad, buf),
        }?;
        Ok(tag)
    }

    fn open(
        &self,
        nonce: &GenericArray<u8, S::NonceSize>,
        aad: &[u8],
        buf: &mut [u8],
        tag: &Tag,
    ) -> Result<(), CipherError> {
        match self {
            Keyed::Aes128(c) => c.decrypt_in_place_detached(nonce, aad, buf, tag),
            Keyed::Aes192(c) => c.decrypt_in_place_detached(nonce, aad, buf, tag),
            Keyed::Aes256(c) => c.decrypt_in_place_detached(nonce, aad, buf, tag),
        }?;
        Ok(())
    }
}

/// An AEAD variant over construction `S`.
pub struct AeadEncryptor<S: AeadSuite> {
    keyed: Option<Keyed<S>>,
    fixed_nonce: Option<GenericArray<u8, S::NonceSize>>,
}

/// AES-GCM with a 96-bit nonce.
pub type AesGcm = AeadEncryptor<Gcm<U12>>;

/// AES-GCM with a 128-bit nonce.
pub type AesGcmN128 = AeadEncryptor<Gcm<U16>>;

/// AES-GCM-SIV with a 96-bit nonce.
pub type AesGcmSiv = AeadEncryptor<GcmSiv>;

impl<S: AeadSuite> AeadEncryptor<S> {
    /// Nonce length in bytes.
    pub const NONCE_LEN: usize = <S::NonceSize as Unsigned>::USIZE;

    /// Create an uninitialised variant that draws a fresh nonce per message.
    pub fn new() -> Self {
        Self {
            keyed: None,
            fixed_nonce: None,
        }
    }

    /// Create a variant that uses `nonce` for every message.
    ///
    /// Reusing a nonce under one key destroys GCM's confidentiality and
    /// authenticity; this exists for known-answer tests and reproducible runs.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidArgument`] if `nonce` is not exactly
    /// [`Self::NONCE_LEN`] bytes.
    pub fn with_nonce(nonce: &[u8]) -> Result<Self, CipherError> {
        if nonce.len() != Self::NONCE_LEN {
            return Err(CipherError::InvalidArgument(
                "fixed nonce length does not match the construction",
            ));
        }
        Ok(Self {
            keyed: None,
            fixed_nonce: Some(GenericArray::clone_from_slice(nonce)),
        })
    }

    fn keyed(&self) -> Result<&Keyed<S>, CipherError> {
        self.keyed.as_ref().ok_or(CipherError::NotInitialised)
    }

    fn next_nonce(&self) -> GenericArray<u8, S::NonceSize> {
        match &self.fixed_nonce {
            Some(nonce) => nonce.clone(),
            None => {
                let mut nonce = GenericArray::default();
                OsRng.fill_bytes(&mut nonce);
                nonce
            }
        }
    }
}

impl<S: AeadSuite> Default for AeadEncryptor<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AeadSuite> fmt::Debug for AeadEncryptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AeadEncryptor")
            .field("name", &self.name())
            .field("fixed_nonce", &self.fixed_nonce.is_some())
            .finish()
    }
}

impl<S: AeadSuite> Encryptor for AeadEncryptor<S> {
    fn name(&self) -> String {
        display_name(self.keyed.as_ref().map(Keyed::size), S::LABEL)
    }

    fn nonce_source(&self) -> NonceSource {
        NonceSource::Internal
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.keyed = None;
        self.keyed = Some(Keyed::new(key)?);
        Ok(())
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        iv: Option<&[u8]>,
        aad: Option<&[u8]>,
    ) -> Result<Vec<u8>, CipherError> {
        if iv.is_some() {
            return Err(CipherError::InvalidArgument(
                "AEAD variant manages its nonce; pass no IV",
            ));
        }
        let keyed = self.keyed()?;
        let aad = aad.unwrap_or_default();

        let nonce = self.next_nonce();
        let mut body = plaintext.to_vec();
        let tag = keyed.seal(&nonce, aad, &mut body)?;

        Ok(Frame {
            aad,
            iv: &nonce,
            body: &body,
            tag: &tag,
        }
        .to_bytes())
    }

    fn decrypt(
        &self,
        message: &[u8],
        iv_len: usize,
        aad_len: usize,
    ) -> Result<Vec<u8>, CipherError> {
        check_internal_iv_len(iv_len, Self::NONCE_LEN)?;
        let keyed = self.keyed()?;
        let frame = Frame::parse(message, aad_len, Self::NONCE_LEN, GCM_TAG_LEN)?;

        let nonce = GenericArray::from_slice(frame.iv);
        let tag = Tag::from_slice(frame.tag);
        let mut body = frame.body.to_vec();
        if let Err(e) = keyed.open(nonce, frame.aad, &mut body, tag) {
            body.zeroize();
            return Err(e);
        }
        Ok(body)
    }
}
