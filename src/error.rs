use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Key format error: {0}")]
    KeyFormat(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Encoding(format!("base64: {}", err))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Encoding(format!("hex: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(format!("utf-8: {}", err))
    }
}

impl From<rsa::pkcs8::Error> for Error {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Error::KeyFormat(format!("PKCS#8: {}", err))
    }
}

impl From<rsa::pkcs8::spki::Error> for Error {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        Error::KeyFormat(format!("SPKI: {}", err))
    }
}

static ALL_RESULT_CODES: [ResultCode; 9] = [
    ResultCode::Unknown,
    ResultCode::Forbidden,
    ResultCode::ResourceNotFound,
    ResultCode::SessionTimeout,
    ResultCode::Success,
    ResultCode::ParamError,
    ResultCode::TokenInvalid,
    ResultCode::TokenTimeout,
    ResultCode::Failure,
];

/// Result codes reported to callers at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResultCode {
    #[serde(rename = "-1")]
    Unknown,
    #[serde(rename = "403")]
    Forbidden,
    #[serde(rename = "404")]
    ResourceNotFound,
    #[serde(rename = "405")]
    SessionTimeout,
    #[serde(rename = "100")]
    Success,
    #[serde(rename = "104")]
    ParamError,
    #[serde(rename = "204")]
    TokenInvalid,
    #[serde(rename = "205")]
    TokenTimeout,
    #[serde(rename = "999")]
    Failure,
}

impl ResultCode {
    /// Wire code, e.g. `"205"`.
    pub fn code(&self) -> &'static str {
        match self {
            ResultCode::Unknown => "-1",
            ResultCode::Forbidden => "403",
            ResultCode::ResourceNotFound => "404",
            ResultCode::SessionTimeout => "405",
            ResultCode::Success => "100",
            ResultCode::ParamError => "104",
            ResultCode::TokenInvalid => "204",
            ResultCode::TokenTimeout => "205",
            ResultCode::Failure => "999",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ResultCode::Unknown => "unknown error",
            ResultCode::Forbidden => "access forbidden",
            ResultCode::ResourceNotFound => "resource not found",
            ResultCode::SessionTimeout => "session timed out",
            ResultCode::Success => "success",
            ResultCode::ParamError => "invalid parameter",
            ResultCode::TokenInvalid => "token invalid",
            ResultCode::TokenTimeout => "token timed out",
            ResultCode::Failure => "system error",
        }
    }

    /// Look up a code by its wire value. Unrecognized values map to [`ResultCode::Unknown`].
    pub fn from_code(code: &str) -> Self {
        ALL_RESULT_CODES
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .unwrap_or(ResultCode::Unknown)
    }

    pub fn all() -> &'static [ResultCode] {
        &ALL_RESULT_CODES
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultCode::Unknown => "UNKNOWN",
            ResultCode::Forbidden => "FORBIDDEN",
            ResultCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ResultCode::SessionTimeout => "SESSION_TIMEOUT",
            ResultCode::Success => "SUCCESS",
            ResultCode::ParamError => "PARAM_ERROR",
            ResultCode::TokenInvalid => "TOKEN_INVALID",
            ResultCode::TokenTimeout => "TOKEN_TIMEOUT",
            ResultCode::Failure => "FAILURE",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        for code in ResultCode::all() {
            assert_eq!(ResultCode::from_code(code.code()), *code);
        }
    }

    #[test]
    fn test_from_code_unknown_fallback() {
        assert_eq!(ResultCode::from_code("12345"), ResultCode::Unknown);
        assert_eq!(ResultCode::from_code(""), ResultCode::Unknown);
    }

    #[test]
    fn test_result_code_serde_uses_wire_code() {
        assert_eq!(
            serde_json::to_string(&ResultCode::TokenTimeout).unwrap(),
            "\"205\""
        );
        let code: ResultCode = serde_json::from_str("\"204\"").unwrap();
        assert_eq!(code, ResultCode::TokenInvalid);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResultCode::Success.to_string(), "SUCCESS");
        assert_eq!(ResultCode::TokenInvalid.to_string(), "TOKEN_INVALID");
    }

    #[test]
    fn test_decode_errors_map_to_encoding() {
        let err: Error = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
