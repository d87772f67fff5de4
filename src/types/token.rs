use serde::{Deserialize, Serialize};

use crate::error::ResultCode;

/// JOSE header of an issued token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
    /// Fingerprint of the signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

/// Claims carried by an issued token. Times are seconds since the Unix epoch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Outcome of validating a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    pub code: ResultCode,
}

impl ValidationResult {
    pub const LEGITIMATE: &'static str = "legitimate request";
    pub const EXPIRED: &'static str = "token expired";
    pub const ILLEGITIMATE: &'static str = "illegitimate request";

    pub fn success(subject: &str) -> Self {
        Self {
            valid: true,
            subject: Some(subject.to_string()),
            message: Self::LEGITIMATE.to_string(),
            code: ResultCode::Success,
        }
    }

    pub fn expired() -> Self {
        Self::failure(ResultCode::TokenTimeout, Self::EXPIRED)
    }

    pub fn invalid() -> Self {
        Self::failure(ResultCode::TokenInvalid, Self::ILLEGITIMATE)
    }

    pub fn failure(code: ResultCode, message: &str) -> Self {
        Self {
            valid: false,
            subject: None,
            message: message.to_string(),
            code,
        }
    }
}
