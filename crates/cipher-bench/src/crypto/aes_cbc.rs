//! AES-CBC with a random internal IV and PKCS#7 padding. No authentication.
//!
//! ```text
//! AAD ‖ IV(16) ‖ ciphertext
//! ```
//!
//! The AAD is copied in front of the message only so every variant shares one
//! layout; nothing binds it to the ciphertext.

use cbc::cipher::block_padding::Pkcs7;
use rand::{rngs::OsRng, RngCore};

use super::block::{AesBlock, BLOCK_LEN};
use super::framing::Frame;
use super::{check_internal_iv_len, display_name, CipherError, Encryptor, NonceSource};

/// AES-CBC variant with an internally generated IV.
#[derive(Clone, Default)]
pub struct AesCbc {
    block: Option<AesBlock>,
}

impl AesCbc {
    /// Create an uninitialised variant.
    pub fn new() -> Self {
        Self::default()
    }

    fn block(&self) -> Result<&AesBlock, CipherError> {
        self.block.as_ref().ok_or(CipherError::NotInitialised)
    }
}

impl Encryptor for AesCbc {
    fn name(&self) -> String {
        display_name(self.block.as_ref().map(AesBlock::size), "CBC")
    }

    fn nonce_source(&self) -> NonceSource {
        NonceSource::Internal
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.block = None;
        self.block = Some(AesBlock::new(key)?);
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
                "AES-CBC generates its IV internally; pass no IV",
            ));
        }
        let block = self.block()?;

        let mut iv = [0u8; BLOCK_LEN];
        OsRng.fill_bytes(&mut iv);
        let body = block.cbc_encrypt::<Pkcs7>(&iv, plaintext)?;

        Ok(Frame {
            aad: aad.unwrap_or_default(),
            iv: &iv,
            body: &body,
            tag: &[],
        }
        .to_bytes())
    }

    fn decrypt(
        &self,
        message: &[u8],
        iv_len: usize,
        aad_len: usize,
    ) -> Result<Vec<u8>, CipherError> {
        check_internal_iv_len(iv_len, BLOCK_LEN)?;
        let block = self.block()?;
        let frame = Frame::parse(message, aad_len, BLOCK_LEN, 0)?;
        block.cbc_decrypt::<Pkcs7>(frame.iv, frame.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(len: usize) -> AesCbc {
        let mut v = AesCbc::new();
        v.init(&vec![0x11u8; len]).unwrap();
        v
    }

    #[test]
    fn name_reflects_key_size() {
        assert_eq!(AesCbc::new().name(), "AES-CBC");
        assert_eq!(keyed(16).name(), "AES128-CBC");
        assert_eq!(keyed(24).name(), "AES192-CBC");
        assert_eq!(keyed(32).name(), "AES256-CBC");
    }

    #[test]
    fn round_trip_with_aad_prefix() {
        let v = keyed(32);
        let msg = v.encrypt(b"attack at dawn", None, Some(b"hdr")).unwrap();
        assert_eq!(&msg[..3], b"hdr");
        // 3 AAD + 16 IV + 16 ciphertext (14 bytes + 2 padding)
        assert_eq!(msg.len(), 35);
        assert_eq!(v.decrypt(&msg, 0, 3).unwrap(), b"attack at dawn");
    }

    #[test]
    fn empty_plaintext_produces_one_padding_block() {
        let v = keyed(16);
        let msg = v.encrypt(&[], None, None).unwrap();
        assert_eq!(msg.len(), BLOCK_LEN * 2);
        assert!(v.decrypt(&msg, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn external_iv_is_rejected() {
        let v = keyed(16);
        let err = v.encrypt(b"x", Some(&[0u8; 16]), None).unwrap_err();
        assert!(matches!(err, CipherError::InvalidArgument(_)));
    }

    #[test]
    fn decrypt_rejects_foreign_iv_len() {
        let v = keyed(16);
        let msg = v.encrypt(b"x", None, None).unwrap();
        assert!(matches!(
            v.decrypt(&msg, 12, 0),
            Err(CipherError::InvalidArgument(_))
        ));
        assert_eq!(v.decrypt(&msg, BLOCK_LEN, 0).unwrap(), b"x");
    }

    #[test]
    fn uninitialised_use_fails() {
        let v = AesCbc::new();
        assert_eq!(
            v.encrypt(b"x", None, None).unwrap_err(),
            CipherError::NotInitialised
        );
    }

    #[test]
    fn invalid_key_clears_previous_key() {
        let mut v = keyed(16);
        assert_eq!(v.init(&[0u8; 10]), Err(CipherError::InvalidKeyLength(10)));
        assert_eq!(v.name(), "AES-CBC");
    }

    #[test]
    fn short_message_is_corrupt_framing() {
        let v = keyed(16);
        assert!(matches!(
            v.decrypt(&[0u8; 10], 0, 0),
            Err(CipherError::CorruptFraming(_))
        ));
    }

    #[test]
    fn fresh_iv_per_message() {
        let v = keyed(16);
        let a = v.encrypt(b"same", None, None).unwrap();
        let b = v.encrypt(b"same", None, None).unwrap();
        assert_ne!(a[..BLOCK_LEN], b[..BLOCK_LEN]);
    }
}
