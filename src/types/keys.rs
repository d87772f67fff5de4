use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Error;

/// Numeric characteristics of one half of an RSA key pair.
///
/// `modulus` is N; `exponent` is E for a public key and D for a private key.
/// Both are decimal strings, so a key pair can be persisted as two of these
/// and rebuilt exactly with [`crate::keyring::restore_public_key`] and
/// [`crate::keyring::restore_private_key`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyComponents {
    pub modulus: String,
    pub exponent: String,
}

impl KeyComponents {
    pub fn new(modulus: impl Into<String>, exponent: impl Into<String>) -> Self {
        Self {
            modulus: modulus.into(),
            exponent: exponent.into(),
        }
    }

    /// Base64 of the UTF-8 decimal strings, the form used for compiled-in keys.
    pub fn to_base64(&self) -> (String, String) {
        (
            codec::encode_base64(self.modulus.as_bytes()),
            codec::encode_base64(self.exponent.as_bytes()),
        )
    }

    /// Inverse of [`KeyComponents::to_base64`].
    pub fn from_base64(modulus_b64: &str, exponent_b64: &str) -> Result<Self, Error> {
        let modulus = String::from_utf8(codec::decode_base64(modulus_b64)?)?;
        let exponent = String::from_utf8(codec::decode_base64(exponent_b64)?)?;
        Ok(Self { modulus, exponent })
    }

    /// Hex of the UTF-8 decimal strings.
    pub fn to_hex(&self) -> (String, String) {
        (
            codec::encode_hex(self.modulus.as_bytes()),
            codec::encode_hex(self.exponent.as_bytes()),
        )
    }

    pub fn from_hex(modulus_hex: &str, exponent_hex: &str) -> Result<Self, Error> {
        let modulus = String::from_utf8(codec::decode_hex(modulus_hex)?)?;
        let exponent = String::from_utf8(codec::decode_hex(exponent_hex)?)?;
        Ok(Self { modulus, exponent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_form() {
        let components = KeyComponents::new("3233", "65537");
        let (n, e) = components.to_base64();
        assert_eq!(n, "MzIzMw==");
        assert_eq!(e, "NjU1Mzc=");
        assert_eq!(KeyComponents::from_base64(&n, &e).unwrap(), components);
    }

    #[test]
    fn test_hex_form() {
        let components = KeyComponents::new("3233", "17");
        let (n, e) = components.to_hex();
        assert_eq!(n, "33323333");
        assert_eq!(e, "3137");
        assert_eq!(KeyComponents::from_hex(&n, &e).unwrap(), components);
    }

    #[test]
    fn test_from_base64_rejects_non_utf8() {
        // 0xff 0xfe is not valid UTF-8
        let result = KeyComponents::from_base64("//4=", "NjU1Mzc=");
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let components = KeyComponents::new("3233", "65537");
        let json = serde_json::to_string(&components).unwrap();
        assert_eq!(json, r#"{"modulus":"3233","exponent":"65537"}"#);
        let back: KeyComponents = serde_json::from_str(&json).unwrap();
        assert_eq!(back, components);
    }
}
