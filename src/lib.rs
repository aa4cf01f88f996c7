//! # csrtool - PKCS#10 Certificate Signing Requests in Pure Rust
//!
//! csrtool encodes a PKCS#10 certificate signing request (RFC 2986) directly
//! in ASN.1 DER from a private key and a subject name, signs it, and armors
//! the result as PEM. It is built entirely with rustcrypto libraries.
//!
//! ## Supported Key Types
//!
//! - **RSA**: 2048 and 4096-bit keys, signed with `sha256WithRSAEncryption`
//! - **ECDSA**: P-256 and P-384 curves, signed with `ecdsa-with-SHA256`
//!
//! Other keys (Ed25519, P-521, ...) are rejected on import with
//! [`error::CsrError::UnsupportedKeyType`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use csrtool::{
//!     csr::{CertificationRequest, params::{CsrParams, DistinguishedName}},
//!     key::KeyPair,
//! };
//!
//! # fn main() -> Result<(), csrtool::error::CsrError> {
//! let key_pair = KeyPair::generate_rsa(2048)?;
//!
//! let subject = DistinguishedName::new("example.com")
//!     .organization("Example Organization")
//!     .country("US");
//!
//! let params = CsrParams::builder()
//!     .subject(subject)
//!     .dns_names(vec!["example.com".to_string(), "www.example.com".to_string()])
//!     .challenge_password("hello321".to_string())
//!     .build();
//!
//! let request = CertificationRequest::build(&key_pair, &params)?;
//! println!("{}", request.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use csrtool::{key::KeyPair, error::CsrError};
//!
//! match KeyPair::from_pkcs8_pem("invalid pem data") {
//!     Ok(_) => println!("Key imported successfully"),
//!     Err(CsrError::UnsupportedKeyType(msg)) => println!("Unsupported key: {}", msg),
//!     Err(CsrError::DecodingError(msg)) => println!("Failed to decode key: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: Key generation, import/export, public key info and signing
//! - [`csr`]: Request assembly, attributes, extensions and output encoding
//! - [`error`]: Error types
//! - [`request_info`]: Low-level DER shape of the request
//! - [`pem_utils`]: PEM armor helpers

pub mod csr;
pub mod error;
pub mod key;
pub mod pem_utils;
pub mod request_info;
