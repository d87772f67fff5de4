//! Expiring RSA-signed identity tokens.
//!
//! Tokens use the JWS compact serialization of a JWT:
//! `base64url(header) "." base64url(claims) "." base64url(signature)`, all
//! segments unpadded. The header names the signature algorithm (`RS512` by
//! default) and the signing key fingerprint; the claims carry the subject
//! plus `iat`/`exp` in Unix seconds. Any standard JWT decoder holding
//! [`TokenIssuer::public_key_pem`] can verify them.
//!
//! Validation never returns an error. Every outcome becomes a
//! [`ValidationResult`]: the signature is checked first, then expiry, so a
//! forged token is always reported as invalid even when its claims have
//! also expired.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::OnceCell;
use rsa::RsaPublicKey;
use tracing::{debug, info};

use crate::codec;
use crate::config::IssuerConfig;
use crate::error::Error;
use crate::keyring::{self, KeyPair};
use crate::signer;
use crate::types::token::{Claims, TokenHeader, ValidationResult};

const TOKEN_TYPE: &str = "JWT";

static GLOBAL_ISSUER: OnceCell<TokenIssuer> = OnceCell::new();

/// Fill `cell` with an issuer built from `config` unless it already holds one.
/// A failed build leaves the cell empty.
fn init_once(cell: &OnceCell<TokenIssuer>, config: IssuerConfig) -> Result<&TokenIssuer, Error> {
    cell.get_or_try_init(|| TokenIssuer::new(config))
}

/// Issues and validates tokens signed with one RSA key pair.
#[derive(Debug)]
pub struct TokenIssuer {
    key_pair: KeyPair,
    key_id: String,
    public_key_pem: String,
    config: IssuerConfig,
}

impl TokenIssuer {
    /// Generate a key pair per `config` and build an issuer around it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] if the configuration is rejected or
    /// key generation fails.
    pub fn new(config: IssuerConfig) -> Result<Self, Error> {
        config
            .validate()
            .map_err(|e| Error::Initialization(e.to_string()))?;
        let key_pair = keyring::generate(config.modulus_bits)?;
        Self::from_key_pair(key_pair, config)
    }

    /// Build an issuer around an existing key pair, e.g. one restored with
    /// [`keyring::restore_key_pair`].
    pub fn from_key_pair(key_pair: KeyPair, config: IssuerConfig) -> Result<Self, Error> {
        let init_err = |e: Error| Error::Initialization(e.to_string());
        let key_id = keyring::key_fingerprint(key_pair.public_key()).map_err(init_err)?;
        let public_key_pem =
            keyring::export_public_key_pem(key_pair.public_key()).map_err(init_err)?;

        info!(
            key_id = %key_id,
            modulus_bits = key_pair.modulus_bits(),
            algorithm = %config.algorithm,
            "token issuer ready"
        );

        Ok(Self {
            key_pair,
            key_id,
            public_key_pem,
            config,
        })
    }

    /// The process-wide issuer, created with default settings on first call.
    ///
    /// Concurrent first callers block until one of them finishes key
    /// generation. If generation fails, that caller receives the error and
    /// the next call tries again.
    pub fn global() -> Result<&'static TokenIssuer, Error> {
        init_once(&GLOBAL_ISSUER, IssuerConfig::default())
    }

    /// Install `issuer` as the process-wide issuer. Returns it back if one is
    /// already installed.
    pub fn install_global(issuer: TokenIssuer) -> Result<&'static TokenIssuer, TokenIssuer> {
        GLOBAL_ISSUER
            .try_insert(issuer)
            .map_err(|(_, rejected)| rejected)
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Fingerprint of the signing key, also sent as the header `kid`.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        self.key_pair.public_key()
    }

    /// SPKI PEM of the verification key.
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Issue a token for `subject` that expires `ttl_minutes` from now.
    ///
    /// Negative lifetimes are accepted and yield an already expired token.
    pub fn issue(&self, subject: &str, ttl_minutes: i64) -> Result<String, Error> {
        self.issue_at(subject, ttl_minutes, Utc::now())
    }

    /// Issue a token with the configured default lifetime.
    pub fn issue_with_default_ttl(&self, subject: &str) -> Result<String, Error> {
        self.issue(subject, self.config.default_ttl_minutes)
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        ttl_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let ttl = Duration::try_minutes(ttl_minutes).ok_or_else(|| {
            Error::InvalidClaims(format!("ttl of {} minutes is out of range", ttl_minutes))
        })?;
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            Error::InvalidClaims(format!("ttl of {} minutes is out of range", ttl_minutes))
        })?;

        let header = TokenHeader {
            alg: self.config.algorithm.name().to_string(),
            typ: TOKEN_TYPE.to_string(),
            kid: Some(self.key_id.clone()),
        };
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let signing_input = format!(
            "{}.{}",
            codec::encode_base64_url(&serde_json::to_vec(&header)?),
            codec::encode_base64_url(&serde_json::to_vec(&claims)?)
        );
        let signature =
            signer::sign_with(&signing_input, self.key_pair.private_key(), self.config.algorithm)?;

        debug!(exp = claims.exp, "issued token");
        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Check a token's signature and expiry against the current time.
    pub fn validate(&self, token: &str) -> ValidationResult {
        self.validate_at(token, Utc::now())
    }

    /// Check a token as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> ValidationResult {
        let claims = match self.verified_claims(token) {
            Ok(claims) => claims,
            Err(reason) => {
                debug!(%reason, "rejected token");
                return ValidationResult::invalid();
            }
        };

        let deadline = claims
            .exp
            .saturating_add(i64::try_from(self.config.leeway_seconds).unwrap_or(i64::MAX));
        if now.timestamp() > deadline {
            debug!(exp = claims.exp, "rejected expired token");
            return ValidationResult::expired();
        }

        ValidationResult::success(&claims.sub)
    }

    /// Verify structure, header and signature, then decode the claims.
    fn verified_claims(&self, token: &str) -> Result<Claims, Error> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidClaims(
                "token must have 3 parts separated by dots".to_string(),
            ));
        };

        let header: TokenHeader = serde_json::from_slice(&codec::decode_base64_url(header_b64)?)?;
        if header.alg != self.config.algorithm.name() {
            return Err(Error::InvalidClaims(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !signer::verify_with(
            signing_input,
            signature,
            self.key_pair.public_key(),
            self.config.algorithm,
        ) {
            return Err(Error::InvalidClaims("signature mismatch".to_string()));
        }

        Ok(serde_json::from_slice(&codec::decode_base64_url(claims_b64)?)?)
    }
}
