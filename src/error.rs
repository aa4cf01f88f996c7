//! use csrtool::error::CsrError;

use thiserror::Error;

/// Represents errors that can occur while building a certificate signing request.
///
/// The first three variants cover the encoder itself; the rest come from the
/// key handling that feeds it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CsrError {
    /// The key is not RSA or ECDSA on P-256/P-384.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// An ASN.1 marshaling step failed. Never retryable.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// The signature primitive failed.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error during key generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CsrError>;

impl From<der::Error> for CsrError {
    /// Converts a `der::Error` into a `CsrError`.
    fn from(err: der::Error) -> Self {
        CsrError::EncodingError(err.to_string())
    }
}

impl From<pkcs8::Error> for CsrError {
    fn from(err: pkcs8::Error) -> Self {
        CsrError::DecodingError(err.to_string())
    }
}

impl From<pem::PemError> for CsrError {
    fn from(err: pem::PemError) -> Self {
        CsrError::DecodingError(err.to_string())
    }
}
