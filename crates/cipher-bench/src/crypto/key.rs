//! [`KeyMaterial`]: owned AES key bytes, and [`KeySize`]: the three AES key widths.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::CipherError;

/// Key lengths in bytes accepted by every variant.
pub const VALID_KEY_LENS: [usize; 3] = [16, 24, 32];

/// AES key width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySize {
    /// 128-bit key.
    Aes128,
    /// 192-bit key.
    Aes192,
    /// 256-bit key.
    Aes256,
}

impl KeySize {
    /// All widths, smallest first.
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    /// Classify a raw key by its length.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `len` is not 16, 24 or 32.
    pub fn from_len(len: usize) -> Result<Self, CipherError> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            other => Err(CipherError::InvalidKeyLength(other)),
        }
    }

    /// Parse a bit width (`128`, `192` or `256`).
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            128 => Some(KeySize::Aes128),
            192 => Some(KeySize::Aes192),
            256 => Some(KeySize::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes.
    pub fn byte_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Key length in bits.
    pub fn bits(self) -> u32 {
        self.byte_len() as u32 * 8
    }
}

/// Raw key bytes owned by the runner for the duration of a run.
///
/// The buffer is overwritten with zeroes when dropped and never printed.
/// Length is not checked here; variants reject unsupported lengths at `init`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    /// Take ownership of `bytes` as key material.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material.
        write!(f, "KeyMaterial([REDACTED; {}])", self.0.len())
    }
}
