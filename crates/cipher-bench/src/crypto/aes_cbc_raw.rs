//! Raw AES block cipher chained in CBC mode, with padding done by this layer.
//!
//! ```text
//! AAD ‖ IV(16) ‖ ciphertext
//! ```
//!
//! The caller supplies the IV on every `encrypt` and passes its length to
//! `decrypt`. The block-mode primitive runs with no padding of its own;
//! [`padding::pad`](super::padding::pad) and [`padding::unpad`](super::padding::unpad)
//! add and strip PKCS#7 around it.

use cbc::cipher::block_padding::NoPadding;

use super::block::{AesBlock, BLOCK_LEN};
use super::framing::Frame;
use super::padding;
use super::{display_name, CipherError, Encryptor, NonceSource};

/// AES-CBC variant with a caller-supplied IV and variant-layer PKCS#7.
#[derive(Clone, Default)]
pub struct AesCbcRaw {
    block: Option<AesBlock>,
}

impl AesCbcRaw {
    /// Create an uninitialised variant.
    pub fn new() -> Self {
        Self::default()
    }

    fn block(&self) -> Result<&AesBlock, CipherError> {
        self.block.as_ref().ok_or(CipherError::NotInitialised)
    }
}

impl Encryptor for AesCbcRaw {
    fn name(&self) -> String {
        display_name(self.block.as_ref().map(AesBlock::size), "CBC-PKCS7")
    }

    fn nonce_source(&self) -> NonceSource {
        NonceSource::External
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
        let iv = iv.ok_or(CipherError::InvalidArgument(
            "raw AES-CBC requires a caller-supplied IV",
        ))?;
        if iv.len() != BLOCK_LEN {
            return Err(CipherError::InvalidArgument(
                "raw AES-CBC IV must be exactly one block",
            ));
        }
        let block = self.block()?;

        let padded = padding::pad(plaintext, BLOCK_LEN)?;
        let body = block.cbc_encrypt::<NoPadding>(iv, &padded)?;

        Ok(Frame {
            aad: aad.unwrap_or_default(),
            iv,
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
        if iv_len != BLOCK_LEN {
            return Err(CipherError::InvalidArgument(
                "raw AES-CBC needs the caller's IV length (one block)",
            ));
        }
        let block = self.block()?;
        let frame = Frame::parse(message, aad_len, iv_len, 0)?;

        let padded = block.cbc_decrypt::<NoPadding>(frame.iv, frame.body)?;
        padding::unpad(&padded, BLOCK_LEN).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IV: [u8; BLOCK_LEN] = [0x5A; BLOCK_LEN];

    fn keyed(len: usize) -> AesCbcRaw {
        let mut v = AesCbcRaw::new();
        v.init(&vec![0x33u8; len]).unwrap();
        v
    }

    #[test]
    fn name_reflects_key_size() {
        assert_eq!(AesCbcRaw::new().name(), "AES-CBC-PKCS7");
        assert_eq!(keyed(24).name(), "AES192-CBC-PKCS7");
    }

    #[test]
    fn round_trip_with_caller_iv() {
        let v = keyed(32);
        let msg = v.encrypt(b"0123456789abcdef", Some(&IV), Some(b"aad")).unwrap();
        // 3 AAD + 16 IV + 32 ciphertext (aligned input gains a full padding block)
        assert_eq!(msg.len(), 3 + 16 + 32);
        assert_eq!(&msg[3..19], &IV);
        assert_eq!(v.decrypt(&msg, BLOCK_LEN, 3).unwrap(), b"0123456789abcdef");
    }

    #[test]
    fn interoperates_with_library_padding() {
        let v = keyed(16);
        let msg = v.encrypt(b"interop", Some(&IV), None).unwrap();
        let block = AesBlock::new(&[0x33u8; 16]).unwrap();
        let pt = block
            .cbc_decrypt::<cbc::cipher::block_padding::Pkcs7>(&IV, &msg[BLOCK_LEN..])
            .unwrap();
        assert_eq!(pt, b"interop");
    }

    #[test]
    fn missing_iv_is_invalid_argument() {
        let v = keyed(16);
        assert!(matches!(
            v.encrypt(b"x", None, None),
            Err(CipherError::InvalidArgument(_))
        ));
    }

    #[test]
    fn wrong_iv_length_is_invalid_argument() {
        let v = keyed(16);
        assert!(matches!(
            v.encrypt(b"x", Some(&[0u8; 12]), None),
            Err(CipherError::InvalidArgument(_))
        ));
        let msg = v.encrypt(b"x", Some(&IV), None).unwrap();
        assert!(matches!(
            v.decrypt(&msg, 0, 0),
            Err(CipherError::InvalidArgument(_))
        ));
    }

    #[test]
    fn garbage_padding_is_corrupt_framing() {
        let v = keyed(16);
        let block = AesBlock::new(&[0x33u8; 16]).unwrap();
        // A final plaintext byte of 0 is never valid PKCS#7.
        let body = block.cbc_encrypt::<NoPadding>(&IV, &[0u8; 16]).unwrap();
        let mut msg = IV.to_vec();
        msg.extend_from_slice(&body);
        assert!(matches!(
            v.decrypt(&msg, BLOCK_LEN, 0),
            Err(CipherError::CorruptFraming(_))
        ));
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let v = keyed(16);
        let msg = v.encrypt(&[], Some(&IV), None).unwrap();
        assert_eq!(msg.len(), 2 * BLOCK_LEN);
        assert!(v.decrypt(&msg, BLOCK_LEN, 0).unwrap().is_empty());
    }
}
