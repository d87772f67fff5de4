//! Text encodings for key material, ciphertexts and signatures.
//!
//! Standard Base64 (with padding) is the transport form for key material and
//! ciphertexts. Signatures and token segments use the URL-safe alphabet
//! without padding. Hex output is lowercase; hex input may use either case.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};

use crate::error::Error;

/// Encode bytes as standard Base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard Base64 text.
///
/// # Errors
///
/// Returns [`Error::Encoding`] on characters outside the alphabet or bad padding.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    Ok(STANDARD.decode(text)?)
}

/// Encode bytes with the URL-safe Base64 alphabet, unpadded.
pub fn encode_base64_url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe Base64 text.
pub fn decode_base64_url(text: &str) -> Result<Vec<u8>, Error> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}

/// Encode bytes as lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text.
///
/// # Errors
///
/// Returns [`Error::Encoding`] on odd-length input or non-hex digits.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, Error> {
    Ok(hex::decode(text)?)
}
