use der::asn1::{AnyRef, BitString};
use der::{Decode, Encode, Sequence};
use x509_cert::attr::Attributes;
use x509_cert::request::Version;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::error::{CsrError, Result};

/// PKCS#10 `CertificationRequestInfo` with pre-encoded parts.
///
/// The subject and public key are embedded as the exact DER they were
/// given in, so the signed bytes reflect what the key encoder produced.
///
/// ```text
/// CertificationRequestInfo ::= SEQUENCE {
///     version       INTEGER { v1(0) } (v1,...),
///     subject       Name,
///     subjectPKInfo SubjectPublicKeyInfo{{ PKInfoAlgorithms }},
///     attributes    [0] Attributes{{ CRIAttributes }}
/// }
/// ```
#[derive(Clone, Debug, Sequence)]
pub struct RequestInfo<'a> {
    pub version: Version,
    pub subject: AnyRef<'a>,
    pub public_key: AnyRef<'a>,
    /// Always present, `A0 00` when empty.
    #[asn1(context_specific = "0", tag_mode = "IMPLICIT")]
    pub attributes: Attributes,
}

impl<'a> RequestInfo<'a> {
    /// Wraps the DER encodings of a `Name` and a `SubjectPublicKeyInfo`.
    pub fn new(subject: &'a [u8], public_key: &'a [u8], attributes: Attributes) -> Result<Self> {
        Ok(Self {
            version: Version::V1,
            subject: AnyRef::from_der(subject)
                .map_err(|e| CsrError::EncodingError(format!("subject name: {e}")))?,
            public_key: AnyRef::from_der(public_key)
                .map_err(|e| CsrError::EncodingError(format!("public key info: {e}")))?,
            attributes,
        })
    }

    /// Serializes the info. The result is the message that gets signed.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Encode::to_der(self)
            .map_err(|e| CsrError::EncodingError(format!("certification request info: {e}")))
    }
}

/// PKCS#10 `CertificationRequest` around already-serialized info bytes.
///
/// ```text
/// CertificationRequest ::= SEQUENCE {
///     certificationRequestInfo CertificationRequestInfo,
///     signatureAlgorithm AlgorithmIdentifier{{ SignatureAlgorithms }},
///     signature          BIT STRING
/// }
/// ```
#[derive(Clone, Debug, Sequence)]
pub struct SignedRequest<'a> {
    pub info: AnyRef<'a>,
    pub algorithm: AlgorithmIdentifierOwned,
    pub signature: BitString,
}

impl<'a> SignedRequest<'a> {
    pub fn new(info: &'a [u8], algorithm: AlgorithmIdentifierOwned, signature: &[u8]) -> Result<Self> {
        Ok(Self {
            info: AnyRef::from_der(info)
                .map_err(|e| CsrError::EncodingError(format!("certification request info: {e}")))?,
            algorithm,
            signature: BitString::from_bytes(signature)
                .map_err(|e| CsrError::EncodingError(format!("signature: {e}")))?,
        })
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        Encode::to_der(self)
            .map_err(|e| CsrError::EncodingError(format!("certification request: {e}")))
    }
}
