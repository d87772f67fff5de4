//! RSASSA-PKCS1-v1_5 detached signatures over string content.

use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use tracing::warn;

use crate::codec;
use crate::error::Error;

/// Digest paired with PKCS#1 v1.5 padding. Names follow the JWS `alg` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "RS384")]
    Rs384,
    #[serde(rename = "RS512")]
    Rs512,
}

impl SignatureAlgorithm {
    /// JWS algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Rs256 => "RS256",
            SignatureAlgorithm::Rs384 => "RS384",
            SignatureAlgorithm::Rs512 => "RS512",
        }
    }
}

impl std::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign `content` with SHA-256 and return URL-safe Base64 signature text.
pub fn sign(content: &str, private_key: &RsaPrivateKey) -> Result<String, Error> {
    sign_with(content, private_key, SignatureAlgorithm::Rs256)
}

/// Verify signature text produced by [`sign`].
///
/// Returns `false` for a malformed signature, the wrong key, or altered
/// content alike.
pub fn verify(content: &str, signature: &str, public_key: &RsaPublicKey) -> bool {
    verify_with(content, signature, public_key, SignatureAlgorithm::Rs256)
}

/// Sign `content` under the given algorithm.
///
/// # Errors
///
/// Returns [`Error::Signing`] if the RSA primitive rejects the key.
pub fn sign_with(
    content: &str,
    private_key: &RsaPrivateKey,
    algorithm: SignatureAlgorithm,
) -> Result<String, Error> {
    let signature = sign_bytes(content.as_bytes(), private_key, algorithm).map_err(|e| {
        warn!(%algorithm, error = %e, "signing failed");
        Error::Signing(e.to_string())
    })?;
    Ok(codec::encode_base64_url(&signature))
}

fn sign_bytes(
    data: &[u8],
    private_key: &RsaPrivateKey,
    algorithm: SignatureAlgorithm,
) -> Result<Vec<u8>, rsa::signature::Error> {
    let key = private_key.clone();
    let signature = match algorithm {
        SignatureAlgorithm::Rs256 => SigningKey::<Sha256>::new(key).try_sign(data)?,
        SignatureAlgorithm::Rs384 => SigningKey::<Sha384>::new(key).try_sign(data)?,
        SignatureAlgorithm::Rs512 => SigningKey::<Sha512>::new(key).try_sign(data)?,
    };
    Ok(signature.to_vec())
}

/// Verify `signature` over `content` under the given algorithm.
pub fn verify_with(
    content: &str,
    signature: &str,
    public_key: &RsaPublicKey,
    algorithm: SignatureAlgorithm,
) -> bool {
    let Ok(signature_bytes) = codec::decode_base64_url(signature) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(signature_bytes.as_slice()) else {
        return false;
    };

    let data = content.as_bytes();
    let key = public_key.clone();
    let result = match algorithm {
        SignatureAlgorithm::Rs256 => VerifyingKey::<Sha256>::new(key).verify(data, &signature),
        SignatureAlgorithm::Rs384 => VerifyingKey::<Sha384>::new(key).verify(data, &signature),
        SignatureAlgorithm::Rs512 => VerifyingKey::<Sha512>::new(key).verify(data, &signature),
    };
    result.is_ok()
}
