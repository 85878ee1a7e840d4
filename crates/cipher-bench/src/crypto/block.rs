//! Expanded AES key schedule plus CBC encrypt/decrypt over it.
//!
//! The schedule is built once per `init` and cloned into a fresh CBC state for
//! every message, so CBC variants pay key expansion at `init` only.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    block_padding::Padding, BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit,
};

use super::{CipherError, KeySize};

/// AES block length in bytes; also the CBC IV length.
pub const BLOCK_LEN: usize = 16;

/// An AES key schedule of any supported width.
#[derive(Clone)]
pub(crate) enum AesBlock {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesBlock {
    /// Expand `key` into a round-key schedule.
    pub(crate) fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(key.len());
        Ok(match KeySize::from_len(key.len())? {
            KeySize::Aes128 => AesBlock::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes192 => AesBlock::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            KeySize::Aes256 => AesBlock::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
        })
    }

    pub(crate) fn size(&self) -> KeySize {
        match self {
            AesBlock::Aes128(_) => KeySize::Aes128,
            AesBlock::Aes192(_) => KeySize::Aes192,
            AesBlock::Aes256(_) => KeySize::Aes256,
        }
    }

    /// CBC-encrypt `data` under `iv`, padding with `P`.
    pub(crate) fn cbc_encrypt<P>(&self, iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError>
    where
        P: Padding<cbc::cipher::consts::U16>,
    {
        match self {
            AesBlock::Aes128(c) => cbc_encrypt::<_, P>(c, iv, data),
            AesBlock::Aes192(c) => cbc_encrypt::<_, P>(c, iv, data),
            AesBlock::Aes256(c) => cbc_encrypt::<_, P>(c, iv, data),
        }
    }

    /// CBC-decrypt `data` under `iv`, stripping `P` padding.
    pub(crate) fn cbc_decrypt<P>(&self, iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError>
    where
        P: Padding<cbc::cipher::consts::U16>,
    {
        match self {
            AesBlock::Aes128(c) => cbc_decrypt::<_, P>(c, iv, data),
            AesBlock::Aes192(c) => cbc_decrypt::<_, P>(c, iv, data),
            AesBlock::Aes256(c) => cbc_decrypt::<_, P>(c, iv, data),
        }
    }
}

fn cbc_encrypt<C, P>(cipher: &C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockCipher + BlockEncryptMut + Clone,
    P: Padding<C::BlockSize>,
{
    let encryptor = cbc::Encryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| CipherError::InvalidArgument("CBC IV must be exactly one block"))?;
    Ok(encryptor.encrypt_padded_vec_mut::<P>(data))
}

fn cbc_decrypt<C, P>(cipher: &C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockCipher + BlockDecryptMut + Clone,
    P: Padding<C::BlockSize>,
{
    let decryptor = cbc::Decryptor::<C>::inner_iv_slice_init(cipher.clone(), iv)
        .map_err(|_| CipherError::InvalidArgument("CBC IV must be exactly one block"))?;
    decryptor
        .decrypt_padded_vec_mut::<P>(data)
        .map_err(|_| CipherError::CorruptFraming("ciphertext is not validly padded whole blocks"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc::cipher::block_padding::{NoPadding, Pkcs7};

    // NIST SP 800-38A F.2.1 (CBC-AES128.Encrypt), first block.
    const KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const IV: [u8; 16] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const PLAIN: [u8; 16] = [
        0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17,
        0x2a,
    ];
    const CIPHER: [u8; 16] = [
        0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9, 0x19,
        0x7d,
    ];

    #[test]
    fn matches_nist_cbc_vector() {
        let block = AesBlock::new(&KEY).unwrap();
        let ct = block.cbc_encrypt::<NoPadding>(&IV, &PLAIN).unwrap();
        assert_eq!(ct, CIPHER);
        let pt = block.cbc_decrypt::<NoPadding>(&IV, &ct).unwrap();
        assert_eq!(pt, PLAIN);
    }

    #[test]
    fn classifies_key_sizes() {
        for size in KeySize::ALL {
            let block = AesBlock::new(&vec![1u8; size.byte_len()]).unwrap();
            assert_eq!(block.size(), size);
        }
        assert!(matches!(
            AesBlock::new(&[0u8; 20]),
            Err(CipherError::InvalidKeyLength(20))
        ));
    }

    #[test]
    fn rejects_short_iv() {
        let block = AesBlock::new(&KEY).unwrap();
        assert!(matches!(
            block.cbc_encrypt::<Pkcs7>(&IV[..8], b"data"),
            Err(CipherError::InvalidArgument(_))
        ));
    }

    #[test]
    fn unaligned_ciphertext_is_corrupt_framing() {
        let block = AesBlock::new(&KEY).unwrap();
        assert!(matches!(
            block.cbc_decrypt::<Pkcs7>(&IV, &[0u8; 15]),
            Err(CipherError::CorruptFraming(_))
        ));
    }
}
