//! PKCS#7 padding applied by the variant layer itself.
//!
//! Padding is always 1..=`block_size` bytes, each equal to the pad length.
//! Unpadding trusts the last byte and strips that many bytes after checking it
//! is non-zero and fits both the buffer and the block size.

use super::CipherError;

/// Append PKCS#7 padding for `block_size` to a copy of `data`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidArgument`] unless `block_size` is 1..=255,
/// the range a single pad byte can express.
pub fn pad(data: &[u8], block_size: usize) -> Result<Vec<u8>, CipherError> {
    let block = u8::try_from(block_size)
        .ok()
        .filter(|&b| b != 0)
        .ok_or(CipherError::InvalidArgument("PKCS#7 block size must be 1..=255"))?;
    // The remainder is below `block`, so the cast is lossless.
    let pad_byte = block - (data.len() % block_size) as u8;
    let pad_len = usize::from(pad_byte);
    let mut out = Vec::with_capacity(data.len() + pad_len);
    out.extend_from_slice(data);
    out.resize(data.len() + pad_len, pad_byte);
    Ok(out)
}

/// Strip PKCS#7 padding and return the unpadded prefix of `data`.
///
/// # Errors
///
/// Returns [`CipherError::CorruptFraming`] if the pad length is zero, larger
/// than `data`, or larger than `block_size`.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8], CipherError> {
    let pad_len = match data.last() {
        Some(&b) => usize::from(b),
        None => return Err(CipherError::CorruptFraming("padded buffer is empty")),
    };
    if pad_len == 0 {
        return Err(CipherError::CorruptFraming("zero padding length"));
    }
    if pad_len > data.len() {
        return Err(CipherError::CorruptFraming("padding longer than buffer"));
    }
    if pad_len > block_size {
        return Err(CipherError::CorruptFraming("padding longer than block"));
    }
    Ok(&data[..data.len() - pad_len])
}
