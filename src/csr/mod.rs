pub mod attributes;
pub mod extensions;
pub mod params;

use der::asn1::AnyRef;
use params::{CsrParams, DistinguishedName};
use rand_core::{CryptoRngCore, OsRng};

use crate::error::Result;
use crate::key::KeyPair;
use crate::pem_utils;
use crate::request_info::{RequestInfo, SignedRequest};

/// PEM label of a PKCS#10 request.
pub const CERTIFICATE_REQUEST_PEM_LABEL: &str = "CERTIFICATE REQUEST";

/// Represents the supported signature algorithms for requests.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA carries explicit NULL parameters; ECDSA carries none.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(AnyRef::NULL.into()),
            },
            SignatureAlgorithm::Sha256WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
        }
    }
}

/// A signed PKCS#10 certification request.
///
/// The signature covers `info_der` exactly; the fields are private so the
/// two cannot drift apart after signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificationRequest {
    info: Vec<u8>,
    signature_algorithm: SignatureAlgorithm,
    signature: Vec<u8>,
}

impl CertificationRequest {
    /// Builds and signs a request using the OS random source.
    pub fn build(key: &KeyPair, params: &CsrParams) -> Result<Self> {
        Self::build_with_rng(key, params, &mut OsRng)
    }

    /// Builds and signs a request.
    ///
    /// `CertificationRequestInfo` is serialized once; those bytes are both
    /// signed and embedded in the final request.
    pub fn build_with_rng<R: CryptoRngCore>(
        key: &KeyPair,
        params: &CsrParams,
        rng: &mut R,
    ) -> Result<Self> {
        let subject = params.subject.to_der()?;
        log::trace!("encoded subject name ({} bytes)", subject.len());

        let public_key = key.public_key_info()?;
        log::trace!("derived public key info {}", public_key.algorithm().oid);

        let attributes = attributes::request_attributes(params)?;
        let info = RequestInfo::new(&subject, public_key.as_der(), attributes)?.to_der()?;
        log::debug!("encoded certification request info ({} bytes)", info.len());

        let signature = key.sign_with_rng(rng, &info)?;
        let signature_algorithm = key.signature_algorithm();
        log::debug!("signed certification request with {signature_algorithm:?}");

        Ok(Self {
            info,
            signature_algorithm,
            signature,
        })
    }

    /// The DER-encoded `CertificationRequestInfo` that was signed.
    pub fn info_der(&self) -> &[u8] {
        &self.info
    }

    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        self.signature_algorithm
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Encodes the request into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        SignedRequest::new(&self.info, self.signature_algorithm.into(), &self.signature)?.to_der()
    }

    /// Encodes the request into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(
            &self.to_der()?,
            CERTIFICATE_REQUEST_PEM_LABEL,
        ))
    }
}

/// Builds a signed request and returns it PEM-armored.
///
/// An empty `challenge_password` is the same as none. Each entry of
/// `dns_names` becomes a `dNSName` in a requested SubjectAltName extension.
///
/// ```no_run
/// use csrtool::csr::{build_csr, params::DistinguishedName};
/// use csrtool::key::KeyPair;
///
/// # fn main() -> Result<(), csrtool::error::CsrError> {
/// let key = KeyPair::generate_ecdsa_p256();
/// let subject = DistinguishedName::new("example.com").organization("Example Organization");
/// let pem = build_csr(&key, &subject, &["www.example.com".to_string()], "")?;
/// assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----"));
/// # Ok(())
/// # }
/// ```
pub fn build_csr(
    key: &KeyPair,
    subject: &DistinguishedName,
    dns_names: &[String],
    challenge_password: &str,
) -> Result<String> {
    let params = CsrParams::builder()
        .subject(subject.clone())
        .dns_names(dns_names.to_vec())
        .challenge_password(challenge_password.to_string())
        .build();
    CertificationRequest::build(key, &params)?.to_pem()
}
