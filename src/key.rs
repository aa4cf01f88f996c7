use std::fmt;
use std::str::FromStr;

use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1};
use der::Decode;
use der::asn1::BitString;
use p256::ecdsa::SigningKey as P256SigningKey;
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p384::ecdsa::SigningKey as P384SigningKey;
use pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, PrivateKeyInfo};
use rand_core::{CryptoRngCore, OsRng};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::csr::SignatureAlgorithm;
use crate::error::{CsrError, Result};
use crate::pem_utils;

/// PEM label of a PKCS#8 `PrivateKeyInfo`.
pub const PRIVATE_KEY_PEM_LABEL: &str = "PRIVATE KEY";

/// Key types the CLI knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Rsa2048,
    Rsa4096,
    EcP256,
    EcP384,
}

impl FromStr for KeyType {
    type Err = CsrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rsa2048" => Ok(KeyType::Rsa2048),
            "rsa4096" => Ok(KeyType::Rsa4096),
            "ec256" => Ok(KeyType::EcP256),
            "ec384" => Ok(KeyType::EcP384),
            _ => Err(CsrError::UnsupportedKeyType(s.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Rsa2048 => "rsa2048",
            KeyType::Rsa4096 => "rsa4096",
            KeyType::EcP256 => "ec256",
            KeyType::EcP384 => "ec384",
        };
        f.write_str(name)
    }
}

/// A private key the request encoder can sign with.
///
/// The set of variants is closed: anything else is rejected with
/// [`CsrError::UnsupportedKeyType`] when the key is imported.
#[derive(Clone)]
pub enum KeyPair {
    Rsa(Box<RsaPrivateKey>),
    EcdsaP256(P256SigningKey),
    EcdsaP384(P384SigningKey),
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyPair::Rsa(_) => "Rsa",
            KeyPair::EcdsaP256(_) => "EcdsaP256",
            KeyPair::EcdsaP384(_) => "EcdsaP384",
        };
        f.debug_tuple("KeyPair").field(&name).finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate a key pair of the given type using the OS random source.
    pub fn generate(key_type: KeyType) -> Result<Self> {
        match key_type {
            KeyType::Rsa2048 => Self::generate_rsa(2048),
            KeyType::Rsa4096 => Self::generate_rsa(4096),
            KeyType::EcP256 => Ok(Self::generate_ecdsa_p256()),
            KeyType::EcP384 => Ok(Self::generate_ecdsa_p384()),
        }
    }

    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CsrError::KeyGenerationError(e.to_string()))?;
        Ok(KeyPair::Rsa(Box::new(private)))
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256() -> Self {
        let mut rng = OsRng;
        KeyPair::EcdsaP256(P256SigningKey::random(&mut rng))
    }

    /// Generate an ECDSA P-384 key pair.
    pub fn generate_ecdsa_p384() -> Self {
        let mut rng = OsRng;
        KeyPair::EcdsaP384(P384SigningKey::random(&mut rng))
    }

    /// Import a PKCS#8 DER-encoded private key.
    ///
    /// The algorithm identifier is inspected before the key material is
    /// parsed, so Ed25519 keys or EC keys on other curves fail with
    /// [`CsrError::UnsupportedKeyType`] rather than a decoding error.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let info =
            PrivateKeyInfo::from_der(der).map_err(|e| CsrError::DecodingError(e.to_string()))?;

        match info.algorithm.oid {
            RSA_ENCRYPTION => Ok(KeyPair::Rsa(Box::new(RsaPrivateKey::from_pkcs8_der(der)?))),
            ID_EC_PUBLIC_KEY => {
                let curve = info
                    .algorithm
                    .parameters_oid()
                    .map_err(|e| CsrError::DecodingError(e.to_string()))?;
                match curve {
                    SECP_256_R_1 => Ok(KeyPair::EcdsaP256(P256SigningKey::from_pkcs8_der(der)?)),
                    SECP_384_R_1 => Ok(KeyPair::EcdsaP384(P384SigningKey::from_pkcs8_der(der)?)),
                    other => Err(CsrError::UnsupportedKeyType(format!(
                        "elliptic curve {other}"
                    ))),
                }
            }
            other => Err(CsrError::UnsupportedKeyType(format!(
                "key algorithm {other}"
            ))),
        }
    }

    /// Import a PKCS#8 PEM-encoded (`PRIVATE KEY`) private key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem, PRIVATE_KEY_PEM_LABEL)?;
        Self::from_pkcs8_der(&der)
    }

    /// Export the private key as PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>> {
        let document = match self {
            KeyPair::Rsa(private) => private.to_pkcs8_der(),
            KeyPair::EcdsaP256(signing_key) => signing_key.to_pkcs8_der(),
            KeyPair::EcdsaP384(signing_key) => signing_key.to_pkcs8_der(),
        }
        .map_err(|e| CsrError::EncodingError(format!("private key: {e}")))?;
        Ok(document.as_bytes().to_vec())
    }

    /// Export the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<String> {
        Ok(pem_utils::der_to_pem(
            &self.to_pkcs8_der()?,
            PRIVATE_KEY_PEM_LABEL,
        ))
    }

    /// Derives the `SubjectPublicKeyInfo` of the matching public key.
    ///
    /// The key is serialized by the key crate's own SPKI encoder and the
    /// result is split back into its fields. The raw encoding is kept so the
    /// request embeds exactly what the standard encoder produced.
    pub fn public_key_info(&self) -> Result<PublicKeyInfo> {
        let document = match self {
            KeyPair::Rsa(private) => RsaPublicKey::from(private.as_ref()).to_public_key_der(),
            KeyPair::EcdsaP256(signing_key) => signing_key.verifying_key().to_public_key_der(),
            KeyPair::EcdsaP384(signing_key) => signing_key.verifying_key().to_public_key_der(),
        }
        .map_err(|e| CsrError::EncodingError(format!("public key info: {e}")))?;

        PublicKeyInfo::from_der(document.as_bytes().to_vec())
    }

    /// The signature algorithm this key signs with.
    ///
    /// P-384 keys keep SHA-256 as the message digest.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            KeyPair::Rsa(_) => SignatureAlgorithm::Sha256WithRSA,
            KeyPair::EcdsaP256(_) => SignatureAlgorithm::Sha256WithECDSA,
            KeyPair::EcdsaP384(_) => SignatureAlgorithm::Sha256WithECDSA,
        }
    }

    /// Signs `message` with the OS random source.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.sign_with_rng(&mut OsRng, message)
    }

    /// Hashes `message` with SHA-256 and signs the digest.
    ///
    /// RSA uses PKCS#1 v1.5 padding, which does not consume `rng`. ECDSA
    /// signatures are returned DER-encoded as `Ecdsa-Sig-Value`.
    pub fn sign_with_rng<R: CryptoRngCore>(&self, rng: &mut R, message: &[u8]) -> Result<Vec<u8>> {
        let digest = Sha256::digest(message);

        match self {
            KeyPair::Rsa(private) => private
                .sign_with_rng(rng, Pkcs1v15Sign::new::<Sha256>(), &digest)
                .map_err(|e| CsrError::SigningError(e.to_string())),
            KeyPair::EcdsaP256(signing_key) => {
                let signature: p256::ecdsa::Signature = signing_key
                    .sign_prehash_with_rng(rng, &digest)
                    .map_err(|e| CsrError::SigningError(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            KeyPair::EcdsaP384(signing_key) => {
                let signature: p384::ecdsa::Signature = signing_key
                    .sign_prehash_with_rng(rng, &digest)
                    .map_err(|e| CsrError::SigningError(e.to_string()))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

/// A `SubjectPublicKeyInfo` split into its parts, with the original DER kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyInfo {
    raw: Vec<u8>,
    algorithm: AlgorithmIdentifierOwned,
    subject_public_key: BitString,
}

impl PublicKeyInfo {
    /// Decomposes a DER-encoded `SubjectPublicKeyInfo`.
    pub fn from_der(raw: Vec<u8>) -> Result<Self> {
        let spki = SubjectPublicKeyInfoOwned::from_der(&raw)
            .map_err(|e| CsrError::EncodingError(format!("public key info: {e}")))?;
        Ok(Self {
            raw,
            algorithm: spki.algorithm,
            subject_public_key: spki.subject_public_key,
        })
    }

    /// Public key algorithm and parameters.
    pub fn algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.algorithm
    }

    /// The encoded public key.
    pub fn subject_public_key(&self) -> &BitString {
        &self.subject_public_key
    }

    /// The DER encoding this value was decomposed from.
    pub fn as_der(&self) -> &[u8] {
        &self.raw
    }
}
