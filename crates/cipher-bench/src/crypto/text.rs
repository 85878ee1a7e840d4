//! String convenience layer over any [`Encryptor`].
//!
//! Plaintext and AAD go in as UTF-8; the framed message comes out as standard
//! padded Base64. Only internal-nonce variants can be driven this way, since
//! no IV is passed.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{CipherError, Encryptor};

/// Encrypt a UTF-8 string and return the framed message as Base64.
///
/// # Errors
///
/// Whatever [`Encryptor::encrypt`] returns; variants needing a caller IV fail
/// with [`CipherError::InvalidArgument`].
pub fn encrypt_str<E: Encryptor + ?Sized>(
    variant: &E,
    plaintext: &str,
    aad: Option<&str>,
) -> Result<String, CipherError> {
    let message = variant.encrypt(plaintext.as_bytes(), None, aad.map(str::as_bytes))?;
    Ok(STANDARD.encode(message))
}

/// Decode a Base64 message from [`encrypt_str`] and return the plaintext.
///
/// `aad_len` is the byte length of the UTF-8 AAD used at encryption.
///
/// # Errors
///
/// Returns [`CipherError::CorruptFraming`] if the input is not Base64 or the
/// plaintext is not UTF-8, otherwise whatever [`Encryptor::decrypt`] returns.
pub fn decrypt_str<E: Encryptor + ?Sized>(
    variant: &E,
    message: &str,
    aad_len: usize,
) -> Result<String, CipherError> {
    let bytes = STANDARD
        .decode(message)
        .map_err(|_| CipherError::CorruptFraming("message is not valid Base64"))?;
    let plaintext = variant.decrypt(&bytes, 0, aad_len)?;
    String::from_utf8(plaintext)
        .map_err(|_| CipherError::CorruptFraming("plaintext is not valid UTF-8"))
}
