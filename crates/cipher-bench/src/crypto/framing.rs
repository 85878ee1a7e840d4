//! Byte layout shared by every variant.
//!
//! ```text
//! AAD ‖ IV/nonce ‖ ciphertext ‖ tag?
//! ```
//!
//! The layout carries no length prefixes: AAD and IV lengths travel
//! out-of-band and must be supplied by whoever parses the message. A wrong
//! length misparses silently rather than failing; the tag check of an
//! authenticating variant is what catches it.

use super::CipherError;

/// A borrowed view over the four regions of an encrypted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Additional authenticated data, carried in the clear.
    pub aad: &'a [u8],
    /// IV or nonce. Empty for variants that do not transmit one.
    pub iv: &'a [u8],
    /// Ciphertext body.
    pub body: &'a [u8],
    /// Authentication tag. Empty for unauthenticated variants.
    pub tag: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Split `message` into its regions using caller-tracked lengths.
    ///
    /// The body is whatever remains between the IV and the trailing tag and may
    /// be empty.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::CorruptFraming`] if `message` is shorter than
    /// `aad_len + iv_len + tag_len`.
    pub fn parse(
        message: &'a [u8],
        aad_len: usize,
        iv_len: usize,
        tag_len: usize,
    ) -> Result<Self, CipherError> {
        let overhead = aad_len
            .checked_add(iv_len)
            .and_then(|n| n.checked_add(tag_len))
            .ok_or(CipherError::CorruptFraming("declared lengths overflow"))?;
        if message.len() < overhead {
            return Err(CipherError::CorruptFraming(
                "message shorter than declared AAD, IV and tag lengths",
            ));
        }

        let (aad, rest) = message.split_at(aad_len);
        let (iv, rest) = rest.split_at(iv_len);
        let (body, tag) = rest.split_at(rest.len() - tag_len);
        Ok(Self { aad, iv, body, tag })
    }

    /// Concatenate the regions into one owned message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.aad.len() + self.iv.len() + self.body.len() + self.tag.len();
        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(self.aad);
        out.extend_from_slice(self.iv);
        out.extend_from_slice(self.body);
        out.extend_from_slice(self.tag);
        out
    }
}

/// Length of `AAD ‖ IV ‖ body`: the region a trailing MAC covers.
pub fn untagged_len(message: &[u8], tag_len: usize) -> Option<usize> {
    message.len().checked_sub(tag_len)
}
