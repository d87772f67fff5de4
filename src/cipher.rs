//! RSA-OAEP (SHA-256) encryption of single-block payloads.
//!
//! Besides the caller-keyed [`encrypt`] and [`decrypt`], the module carries a
//! fixed 1024-bit demonstration key pair compiled into the binary. Clients use
//! the public half to encrypt short fixed-format strings without any key
//! distribution at runtime; the holder of the private half decrypts them.
//! Each half is rebuilt from its constants on first use and cached for the
//! life of the process.

use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::debug;

use crate::codec;
use crate::error::Error;
use crate::keyring;
use crate::types::keys::KeyComponents;

/// Bytes of OAEP overhead: two SHA-256 digests plus two framing bytes.
const OAEP_SHA256_OVERHEAD: usize = 2 * 32 + 2;

// Base64 of the decimal N, E and D of the demonstration key pair.
const STATIC_MODULUS: &str = "MTAwOTI0MzMxODM1NzI1OTM1Mjk2NzUwNjcxNjAwODAyODk5MTkwMTUzODUzNDIyMzI3NjQ3MDI1NjQ2NDA2ODYxNDcyNTI5ODE3MzY5NTUwMzMxMTY3NTMzODY4MjAzNDczNDE5MDk2OTE4Mjc2MDQ2MzYyMTkzNzU0OTgzOTgwNzE4MzQwOTkwNjM0ODgzMTYwODkyOTg3OTY5MDU3NDkyOTIwNzExMjQyNzQxMjEwMDI2NTEwMjQwNTU0NjQzNTQxMDM2MDUwNTExNzE0NDQ2NDczNTE0NTEyNzQ3NDk4NDI2NTQ0ODg3MzMyMDMwMzQyNDg0OTAxODkzNTMzNDMyNDQ1NDk0OTk1MDY5MjI4Mjg3OTg3NTQ1OTk2NzI0MDg3Njg2NjYxMTkzNzc3NjkzMjcx";
const STATIC_PUBLIC_EXPONENT: &str = "NjU1Mzc=";
const STATIC_PRIVATE_EXPONENT: &str = "NTIzNzcxMDU2NzE1NTUxNTk4NTM0MTIzMjk1NjE3MjA5ODUyMDMwOTkyMDkwMzYxMjAxNzUzMzA1MTk5NDQzMDg5MDAzNzIwNjY4OTkyMDQyMDMxNzc5MDE5Nzc4OTU0ODcwOTc4Mjc1NTM2NjI4OTEwMjE0MjIwMDU4MDYxMTE4NDgxNTAxMTAyMTk3Nzg4NDM1Mjc5NjU5NzQ5MTcyNjcwMzUzOTgxMTc3NzI2MjQxMDg0ODQxNTYxNTA5MjI4MTU1NjQwNzQyMzE5NDk1MDAxNTQ1MDM5MTUwNTkzMjk1Mjk4NTI4NjEyMDk5MjgyODgxOTYxNjA4OTQ3ODUzOTU3NzY1NTg3NTkyMjI4ODQ3NDU0Njg3Njc2OTk2MDkzODIyMDIxMjYyMjAyMzY2ODk0NzM=";

static STATIC_PUBLIC_KEY: OnceCell<RsaPublicKey> = OnceCell::new();
static STATIC_PRIVATE_KEY: OnceCell<RsaPrivateKey> = OnceCell::new();

/// Largest plaintext, in bytes, that fits one OAEP block under `key`.
pub fn max_plaintext_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(OAEP_SHA256_OVERHEAD)
}

/// Encrypt one block under `public_key`.
///
/// # Errors
///
/// Returns [`Error::Crypto`] if `plaintext` is longer than
/// [`max_plaintext_len`]; no chunking is performed.
pub fn encrypt(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<Vec<u8>, Error> {
    let limit = max_plaintext_len(public_key);
    if plaintext.len() > limit {
        return Err(Error::Crypto(format!(
            "plaintext of {} bytes exceeds the {} byte block limit",
            plaintext.len(),
            limit
        )));
    }

    let mut rng = OsRng;
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| Error::Crypto(format!("encryption failed: {}", e)))
}

/// Decrypt one block with `private_key`.
///
/// # Errors
///
/// Returns [`Error::Crypto`] on a padding mismatch, a wrong key, or a
/// ciphertext of the wrong length.
pub fn decrypt(ciphertext: &[u8], private_key: &RsaPrivateKey) -> Result<Vec<u8>, Error> {
    private_key
        .decrypt(Oaep::new::<Sha256>(), ciphertext)
        .map_err(|e| Error::Crypto(format!("decryption failed: {}", e)))
}

/// The demonstration public key, rebuilt from its constants on first use.
pub fn static_public_key() -> Result<&'static RsaPublicKey, Error> {
    STATIC_PUBLIC_KEY.get_or_try_init(|| {
        let components = KeyComponents::from_base64(STATIC_MODULUS, STATIC_PUBLIC_EXPONENT)?;
        let key = keyring::restore_public_key(&components.modulus, &components.exponent)?;
        debug!(modulus_bits = key.n().bits(), "restored static public key");
        Ok(key)
    })
}

/// The demonstration private key, rebuilt from its constants on first use.
pub fn static_private_key() -> Result<&'static RsaPrivateKey, Error> {
    STATIC_PRIVATE_KEY.get_or_try_init(|| {
        let components = KeyComponents::from_base64(STATIC_MODULUS, STATIC_PRIVATE_EXPONENT)?;
        let key = keyring::restore_private_key(&components.modulus, &components.exponent)?;
        debug!(modulus_bits = key.n().bits(), "restored static private key");
        Ok(key)
    })
}

/// Encrypt the UTF-8 bytes of `plaintext` under the demonstration public key.
pub fn encrypt_with_static_key(plaintext: &str) -> Result<Vec<u8>, Error> {
    encrypt(plaintext.as_bytes(), static_public_key()?)
}

/// [`encrypt_with_static_key`], returning standard Base64 for transport.
pub fn encrypt_with_static_key_base64(plaintext: &str) -> Result<String, Error> {
    Ok(codec::encode_base64(&encrypt_with_static_key(plaintext)?))
}

/// Decrypt a ciphertext produced under the demonstration public key.
pub fn decrypt_with_static_key(ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    decrypt(ciphertext, static_private_key()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyring::tests::{OTHER_KEY_PAIR, TEST_KEY_PAIR};

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let data = b"sperms:2019-08-29 17:26:11";
        let ciphertext = encrypt(data, TEST_KEY_PAIR.public_key()).unwrap();
        assert_eq!(ciphertext.len(), 128);
        let plaintext = decrypt(&ciphertext, TEST_KEY_PAIR.private_key()).unwrap();
        assert_eq!(plaintext, data);
    }

    #[test]
    fn test_empty_and_binary_payloads() {
        for data in [vec![], vec![0u8, 0xff, 0x00, 0x7f]] {
            let ciphertext = encrypt(&data, TEST_KEY_PAIR.public_key()).unwrap();
            assert_eq!(decrypt(&ciphertext, TEST_KEY_PAIR.private_key()).unwrap(), data);
        }
    }

    #[test]
    fn test_block_limit() {
        let key = TEST_KEY_PAIR.public_key();
        assert_eq!(max_plaintext_len(key), 62);

        let fits = vec![b'x'; 62];
        let ciphertext = encrypt(&fits, key).unwrap();
        assert_eq!(decrypt(&ciphertext, TEST_KEY_PAIR.private_key()).unwrap(), fits);

        let too_long = vec![b'x'; 63];
        assert!(matches!(encrypt(&too_long, key), Err(Error::Crypto(_))));
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let ciphertext = encrypt(b"secret", TEST_KEY_PAIR.public_key()).unwrap();
        assert!(matches!(
            decrypt(&ciphertext, OTHER_KEY_PAIR.private_key()),
            Err(Error::Crypto(_))
        ));
    }

    #[test]
    fn test_decrypt_garbage_fails() {
        assert!(decrypt(&[0u8; 128], TEST_KEY_PAIR.private_key()).is_err());
        assert!(decrypt(b"short", TEST_KEY_PAIR.private_key()).is_err());
    }

    #[test]
    fn test_restored_key_interoperates_with_original() {
        let components = keyring::public_key_components(TEST_KEY_PAIR.public_key());
        let restored =
            keyring::restore_public_key(&components.modulus, &components.exponent).unwrap();
        let ciphertext = encrypt(b"restored", &restored).unwrap();
        assert_eq!(
            decrypt(&ciphertext, TEST_KEY_PAIR.private_key()).unwrap(),
            b"restored"
        );
    }

    #[test]
    fn test_static_keys_form_a_pair() {
        let public = static_public_key().unwrap();
        let private = static_private_key().unwrap();
        assert_eq!(public.n().bits(), 1024);
        assert_eq!(&private.to_public_key(), public);
    }

    #[test]
    fn test_static_key_roundtrip() {
        let ciphertext = encrypt_with_static_key("sperms:20190909114532").unwrap();
        let plaintext = decrypt_with_static_key(&ciphertext).unwrap();
        assert_eq!(String::from_utf8(plaintext).unwrap(), "sperms:20190909114532");
    }

    #[test]
    fn test_static_key_base64_transport() {
        let text = encrypt_with_static_key_base64("sperms:20190909114532").unwrap();
        let ciphertext = codec::decode_base64(&text).unwrap();
        assert_eq!(
            decrypt_with_static_key(&ciphertext).unwrap(),
            b"sperms:20190909114532"
        );
    }

    #[test]
    fn test_static_key_is_cached() {
        let first = static_public_key().unwrap();
        let second = static_public_key().unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
