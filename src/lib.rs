//! # rsatoken
//!
//! RSA key handling, single-block encryption, detached signatures and
//! expiring signed identity tokens.
//!
//! ## Features
//!
//! - **Key Generation and Restoration**: Generate RSA key pairs, or rebuild keys
//!   from their decimal modulus/exponent pairs
//! - **Key Export**: SPKI/PKCS#8 DER and PEM, plus SHA-256 key fingerprints
//! - **Encryption**: RSA-OAEP with SHA-256, including a compiled-in demonstration key pair
//! - **Signatures**: RSASSA-PKCS1-v1_5 with SHA-256/384/512, URL-safe Base64 text
//! - **Tokens**: JWS compact RS512 tokens with subject and expiration claims
//!
//! ## Quick Start
//!
//! ```rust
//! use rsatoken::keyring::{generate, public_key_components, restore_public_key};
//! use rsatoken::{cipher, signer};
//!
//! let key_pair = generate(1024).unwrap();
//!
//! // Persist only the numbers, rebuild the key later
//! let components = public_key_components(key_pair.public_key());
//! let public_key = restore_public_key(&components.modulus, &components.exponent).unwrap();
//!
//! let ciphertext = cipher::encrypt(b"sperms:2019-08-29 17:26:11", &public_key).unwrap();
//! let plaintext = cipher::decrypt(&ciphertext, key_pair.private_key()).unwrap();
//! assert_eq!(plaintext, b"sperms:2019-08-29 17:26:11");
//!
//! let signature = signer::sign("hello", key_pair.private_key()).unwrap();
//! assert!(signer::verify("hello", &signature, &public_key));
//! ```
//!
//! Issuing and checking tokens:
//!
//! ```rust
//! use rsatoken::{ResultCode, TokenIssuer};
//!
//! let issuer = TokenIssuer::global().unwrap();
//! let token = issuer.issue("user-42", 5).unwrap();
//!
//! let result = issuer.validate(&token);
//! assert!(result.valid);
//! assert_eq!(result.code, ResultCode::Success);
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `Result<T, Error>`. Two operations never fail:
//! [`signer::verify`] answers only `true` or `false`, and
//! [`TokenIssuer::validate`] folds every failure into a [`ValidationResult`].

pub mod cipher;
pub mod codec;
pub mod config;
pub mod error;
pub mod keyring;
pub mod signer;
pub mod token;
pub mod types;

pub use config::IssuerConfig;
pub use error::{Error, ResultCode};
pub use keyring::KeyPair;
pub use signer::SignatureAlgorithm;
pub use token::TokenIssuer;
pub use types::keys::KeyComponents;
pub use types::token::{Claims, TokenHeader, ValidationResult};
