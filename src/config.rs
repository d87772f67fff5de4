use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::keyring::DEFAULT_MODULUS_BITS;
use crate::signer::SignatureAlgorithm;

const MIN_MODULUS_BITS: usize = 1024;
const MAX_MODULUS_BITS: usize = 4096;

/// Settings for a [`crate::token::TokenIssuer`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct IssuerConfig {
    /// Modulus size of the generated signing key.
    pub modulus_bits: usize,
    /// Lifetime used by `issue_with_default_ttl`.
    pub default_ttl_minutes: i64,
    /// Clock skew tolerated past `exp` before a token counts as expired.
    pub leeway_seconds: u64,
    /// Token signature algorithm.
    pub algorithm: SignatureAlgorithm,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            default_ttl_minutes: 30,
            leeway_seconds: 0,
            algorithm: SignatureAlgorithm::Rs512,
        }
    }
}

impl IssuerConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: IssuerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&self.modulus_bits)
            || self.modulus_bits % 8 != 0
        {
            return Err(Error::Config(format!(
                "modulus_bits must be a multiple of 8 in {}..={}, got {}",
                MIN_MODULUS_BITS, MAX_MODULUS_BITS, self.modulus_bits
            )));
        }
        if self.default_ttl_minutes < 0 {
            return Err(Error::Config(format!(
                "default_ttl_minutes must not be negative, got {}",
                self.default_ttl_minutes
            )));
        }
        Ok(())
    }
}
