//! RSA key generation, reconstruction and export.

use std::time::Instant;

use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::codec;
use crate::error::Error;
use crate::types::keys::KeyComponents;

/// Modulus size used when callers don't choose one.
pub const DEFAULT_MODULUS_BITS: usize = 1024;

/// Public exponent assumed when rebuilding a private key from (N, D) alone.
pub const CONVENTIONAL_PUBLIC_EXPONENT: u32 = 65537;

/// An RSA public/private key pair sharing one modulus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: RsaPublicKey,
    private_key: RsaPrivateKey,
}

impl KeyPair {
    /// Pair up two keys, rejecting keys with different moduli.
    pub fn from_parts(public_key: RsaPublicKey, private_key: RsaPrivateKey) -> Result<Self, Error> {
        if public_key.n() != private_key.n() {
            return Err(Error::KeyFormat(
                "public and private key moduli differ".to_string(),
            ));
        }
        Ok(Self {
            public_key,
            private_key,
        })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn modulus_bits(&self) -> usize {
        self.public_key.n().bits()
    }
}

/// Generate a fresh key pair from the OS random source.
///
/// This is CPU bound and can take a noticeable amount of time for larger
/// moduli; generate once and reuse the pair.
///
/// # Errors
///
/// Returns [`Error::Initialization`] if the RSA primitive fails to produce a key.
pub fn generate(modulus_bits: usize) -> Result<KeyPair, Error> {
    let started = Instant::now();
    let mut rng = OsRng;

    let private_key = RsaPrivateKey::new(&mut rng, modulus_bits)
        .map_err(|e| Error::Initialization(format!("RSA key generation failed: {}", e)))?;
    let public_key = private_key.to_public_key();
    let key_id =
        key_fingerprint(&public_key).map_err(|e| Error::Initialization(e.to_string()))?;

    info!(
        modulus_bits,
        key_id = %key_id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated RSA key pair"
    );

    Ok(KeyPair {
        public_key,
        private_key,
    })
}

/// Parse a non-negative decimal integer literal. Signs, separators and
/// whitespace are rejected.
fn parse_decimal(name: &str, value: &str) -> Result<BigUint, Error> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::KeyFormat(format!(
            "{} is not a decimal integer literal",
            name
        )));
    }
    BigUint::parse_bytes(value.as_bytes(), 10)
        .ok_or_else(|| Error::KeyFormat(format!("{} is not a decimal integer literal", name)))
}

/// Rebuild a public key from its decimal modulus N and exponent E.
///
/// # Errors
///
/// Returns [`Error::KeyFormat`] if either value is not a decimal literal or
/// the pair does not form a usable RSA public key.
pub fn restore_public_key(modulus: &str, exponent: &str) -> Result<RsaPublicKey, Error> {
    let n = parse_decimal("modulus", modulus)?;
    let e = parse_decimal("exponent", exponent)?;
    RsaPublicKey::new(n, e).map_err(|e| Error::KeyFormat(format!("invalid public key: {}", e)))
}

/// Rebuild a private key from its decimal modulus N and private exponent D.
///
/// The prime factors are recovered from (N, E, D) with E fixed to
/// [`CONVENTIONAL_PUBLIC_EXPONENT`]. Use
/// [`restore_private_key_with_public_exponent`] for keys generated with any
/// other E.
pub fn restore_private_key(modulus: &str, exponent: &str) -> Result<RsaPrivateKey, Error> {
    restore_private_key_with_public_exponent(
        modulus,
        &CONVENTIONAL_PUBLIC_EXPONENT.to_string(),
        exponent,
    )
}

/// Rebuild a private key from decimal N, E and D.
pub fn restore_private_key_with_public_exponent(
    modulus: &str,
    public_exponent: &str,
    private_exponent: &str,
) -> Result<RsaPrivateKey, Error> {
    let n = parse_decimal("modulus", modulus)?;
    let e = parse_decimal("public exponent", public_exponent)?;
    let d = parse_decimal("private exponent", private_exponent)?;

    // Prime recovery subtracts from N and from D*E, so these must be caught first.
    let zero = BigUint::from(0u32);
    if n == zero || e == zero || d == zero {
        return Err(Error::KeyFormat(
            "modulus and exponents must be non-zero".to_string(),
        ));
    }
    if d >= n {
        return Err(Error::KeyFormat(
            "private exponent must be smaller than the modulus".to_string(),
        ));
    }

    let key = RsaPrivateKey::from_components(n, e, d, vec![])
        .map_err(|e| Error::KeyFormat(format!("invalid private key: {}", e)))?;
    key.validate()
        .map_err(|e| Error::KeyFormat(format!("inconsistent private key: {}", e)))?;
    Ok(key)
}

/// Rebuild a full key pair from persisted components.
pub fn restore_key_pair(
    public: &KeyComponents,
    private: &KeyComponents,
) -> Result<KeyPair, Error> {
    let public_key = restore_public_key(&public.modulus, &public.exponent)?;
    let private_key = restore_private_key_with_public_exponent(
        &private.modulus,
        &public.exponent,
        &private.exponent,
    )?;
    KeyPair::from_parts(public_key, private_key)
}

/// (N, E) of a public key as decimal strings.
pub fn public_key_components(key: &RsaPublicKey) -> KeyComponents {
    KeyComponents::new(key.n().to_string(), key.e().to_string())
}

/// (N, D) of a private key as decimal strings.
pub fn private_key_components(key: &RsaPrivateKey) -> KeyComponents {
    KeyComponents::new(key.n().to_string(), key.d().to_string())
}

/// SubjectPublicKeyInfo DER encoding of a public key.
pub fn export_public_key_der(key: &RsaPublicKey) -> Result<Vec<u8>, Error> {
    Ok(key.to_public_key_der()?.as_bytes().to_vec())
}

/// PKCS#8 DER encoding of a private key.
pub fn export_private_key_der(key: &RsaPrivateKey) -> Result<Vec<u8>, Error> {
    Ok(key.to_pkcs8_der()?.as_bytes().to_vec())
}

/// SubjectPublicKeyInfo PEM encoding of a public key.
pub fn export_public_key_pem(key: &RsaPublicKey) -> Result<String, Error> {
    Ok(key.to_public_key_pem(LineEnding::LF)?)
}

/// PKCS#8 PEM encoding of a private key.
pub fn export_private_key_pem(key: &RsaPrivateKey) -> Result<String, Error> {
    Ok(key.to_pkcs8_pem(LineEnding::LF)?.to_string())
}

/// SHA-256 fingerprint of the public key's SPKI DER encoding, as
/// `"sha256:<hex>"`.
pub fn key_fingerprint(key: &RsaPublicKey) -> Result<String, Error> {
    let der = export_public_key_der(key)?;
    let mut hasher = Sha256::new();
    hasher.update(&der);
    Ok(format!("sha256:{}", codec::encode_hex(&hasher.finalize())))
}
