//! AES-CBC followed by HMAC-SHA256 (encrypt-then-MAC).
//!
//! ```text
//! AAD ‖ IV(16) ‖ ciphertext ‖ HMAC-SHA256(mac_key, AAD ‖ IV ‖ ciphertext)(32)
//! ```
//!
//! Encryption is delegated to an inner [`AesCbc`]. The MAC key is derived from
//! the cipher key at `init` and never equals it.
//!
//! # Security invariants
//!
//! - The tag is compared in constant time over its full length.
//! - Nothing is decrypted until the tag has verified.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::aes_cbc::AesCbc;
use super::block::BLOCK_LEN;
use super::framing::{untagged_len, Frame};
use super::{check_internal_iv_len, CipherError, Encryptor, KeySize, NonceSource};

type HmacSha256 = Hmac<Sha256>;

/// Byte length of the appended HMAC-SHA256 tag.
pub const HMAC_TAG_LEN: usize = 32;

/// Domain label for deriving the MAC key from the cipher key.
const MAC_KEY_LABEL: &[u8] = b"cipher-bench/aes-cbc-hmac/mac-key";

/// AES-CBC + HMAC-SHA256 variant.
#[derive(Clone, Default)]
pub struct AesCbcHmac {
    cbc: AesCbc,
    mac: Option<HmacSha256>,
    key_size: Option<KeySize>,
}

impl AesCbcHmac {
    /// Create an uninitialised variant.
    pub fn new() -> Self {
        Self::default()
    }

    fn mac(&self) -> Result<HmacSha256, CipherError> {
        self.mac.clone().ok_or(CipherError::NotInitialised)
    }
}

/// Derive the MAC key as `HMAC-SHA256(key, label)`.
fn derive_mac_key(key: &[u8]) -> Result<HmacSha256, CipherError> {
    let mut kdf = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    kdf.update(MAC_KEY_LABEL);
    let mac_key = kdf.finalize().into_bytes();
    <HmacSha256 as Mac>::new_from_slice(&mac_key)
        .map_err(|_| CipherError::InvalidKeyLength(mac_key.len()))
}

impl Encryptor for AesCbcHmac {
    fn name(&self) -> String {
        match self.key_size {
            Some(size) => format!("AES{}-CBC-HMACSHA256", size.bits()),
            None => "AES-CBC-HMACSHA256".into(),
        }
    }

    fn nonce_source(&self) -> NonceSource {
        NonceSource::Internal
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CipherError> {
        self.cbc = AesCbc::new();
        self.mac = None;
        self.key_size = None;
        let size = KeySize::from_len(key.len())?;
        self.cbc.init(key)?;
        self.mac = Some(derive_mac_key(key)?);
        self.key_size = Some(size);
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
                "AES-CBC-HMAC generates its IV internally; pass no IV",
            ));
        }
        let mut mac = self.mac()?;
        let mut message = self.cbc.encrypt(plaintext, None, aad)?;

        mac.update(&message);
        message.extend_from_slice(&mac.finalize().into_bytes());
        Ok(message)
    }

    fn decrypt(
        &self,
        message: &[u8],
        iv_len: usize,
        aad_len: usize,
    ) -> Result<Vec<u8>, CipherError> {
        check_internal_iv_len(iv_len, BLOCK_LEN)?;
        let mut mac = self.mac()?;
        let frame = Frame::parse(message, aad_len, BLOCK_LEN, HMAC_TAG_LEN)?;
        let signed_len = untagged_len(message, HMAC_TAG_LEN)
            .ok_or(CipherError::CorruptFraming("message shorter than MAC tag"))?;
        let signed = &message[..signed_len];

        mac.update(signed);
        let expected = mac.finalize().into_bytes();
        // Constant-time over the full tag; the decision is made once, after the loop.
        let authentic: bool = expected.as_slice().ct_eq(frame.tag).into();
        if !authentic {
            return Err(CipherError::AuthenticationFailure);
        }

        self.cbc.decrypt(signed, 0, aad_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(len: usize) -> AesCbcHmac {
        let mut v = AesCbcHmac::new();
        v.init(&vec![0u8; len]).unwrap();
        v
    }

    #[test]
    fn name_reflects_key_size() {
        assert_eq!(AesCbcHmac::new().name(), "AES-CBC-HMACSHA256");
        assert_eq!(keyed(16).name(), "AES128-CBC-HMACSHA256");
        assert_eq!(keyed(32).name(), "AES256-CBC-HMACSHA256");
    }

    #[test]
    fn quick_brown_fox_layout() {
        let v = keyed(16);
        let msg = v.encrypt(b"quick brown fox", None, None).unwrap();
        assert_eq!(msg.len(), 16 + 16 + HMAC_TAG_LEN);
        assert_eq!(v.decrypt(&msg, 0, 0).unwrap(), b"quick brown fox");
    }

    #[test]
    fn corrupted_last_tag_byte_fails() {
        let v = keyed(16);
        let mut msg = v.encrypt(b"quick brown fox", None, None).unwrap();
        let last = msg.len() - 1;
        msg[last] ^= 0x01;
        assert_eq!(
            v.decrypt(&msg, 0, 0).unwrap_err(),
            CipherError::AuthenticationFailure
        );
    }

    #[test]
    fn aad_is_authenticated() {
        let v = keyed(32);
        let mut msg = v.encrypt(b"payload", None, Some(&[0xBE; 20])).unwrap();
        msg[0] ^= 0x80;
        assert_eq!(
            v.decrypt(&msg, 0, 20).unwrap_err(),
            CipherError::AuthenticationFailure
        );
    }

    #[test]
    fn mac_key_differs_from_cipher_key() {
        let key = [7u8; 32];
        let mut with_derived = derive_mac_key(&key).unwrap();
        let mut with_raw = <HmacSha256 as Mac>::new_from_slice(&key).unwrap();
        with_derived.update(b"m");
        with_raw.update(b"m");
        assert_ne!(
            with_derived.finalize().into_bytes(),
            with_raw.finalize().into_bytes()
        );
    }

    #[test]
    fn rekey_invalidates_old_messages() {
        let mut v = keyed(16);
        let msg = v.encrypt(b"old key", None, None).unwrap();
        v.init(&[1u8; 16]).unwrap();
        assert_eq!(
            v.decrypt(&msg, 0, 0).unwrap_err(),
            CipherError::AuthenticationFailure
        );
    }

    #[test]
    fn short_message_is_corrupt_framing() {
        let v = keyed(16);
        assert!(matches!(
            v.decrypt(&[0u8; 47], 0, 0),
            Err(CipherError::CorruptFraming(_))
        ));
    }

    #[test]
    fn failed_init_leaves_variant_unkeyed() {
        let mut v = keyed(16);
        assert!(v.init(&[0u8; 5]).is_err());
        assert_eq!(
            v.encrypt(b"x", None, None).unwrap_err(),
            CipherError::NotInitialised
        );
    }
}
