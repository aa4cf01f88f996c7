#![allow(dead_code)]

use std::fs;

use const_oid::ObjectIdentifier;
use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, SECP_256_R_1, SECP_384_R_1, SHA_256_WITH_RSA_ENCRYPTION,
};
use csrtool::csr::CERTIFICATE_REQUEST_PEM_LABEL;
use csrtool::key::KeyPair;
use csrtool::pem_utils::pem_to_der;
use der::{Decode, Encode};
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use x509_cert::request::CertReq;

pub fn fixture_pem(name: &str) -> String {
    let path = format!("{}/tests/data/{name}.pem", env!("CARGO_MANIFEST_DIR"));
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
}

/// Loads one of the PKCS#8 keys under `tests/data`.
pub fn load_key(name: &str) -> KeyPair {
    KeyPair::from_pkcs8_pem(&fixture_pem(name)).expect("Failed to load fixture key")
}

/// Dearmors and decodes a request with the x509-cert decoder.
pub fn parse_csr(pem: &str) -> CertReq {
    let der = pem_to_der(pem, CERTIFICATE_REQUEST_PEM_LABEL).expect("Failed to dearmor CSR");
    CertReq::from_der(&der).expect("Failed to decode CSR")
}

pub fn curve_of(req: &CertReq) -> ObjectIdentifier {
    req.info
        .public_key
        .algorithm
        .parameters
        .as_ref()
        .expect("EC key without curve")
        .decode_as::<ObjectIdentifier>()
        .expect("curve is not an OID")
}

/// Verifies the request signature against the public key embedded in it.
pub fn verify_signature(req: &CertReq) {
    let info = req.info.to_der().unwrap();
    let spki = req.info.public_key.to_der().unwrap();
    let signature = req.signature.raw_bytes();
    let digest = Sha256::digest(&info);

    match req.algorithm.oid {
        SHA_256_WITH_RSA_ENCRYPTION => {
            let public = RsaPublicKey::from_public_key_der(&spki).unwrap();
            public
                .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
                .expect("RSA signature does not verify");
        }
        ECDSA_WITH_SHA_256 => match curve_of(req) {
            SECP_256_R_1 => {
                let verifying_key = p256::ecdsa::VerifyingKey::from_public_key_der(&spki).unwrap();
                let signature = p256::ecdsa::Signature::from_der(signature).unwrap();
                verifying_key
                    .verify_prehash(&digest, &signature)
                    .expect("P-256 signature does not verify");
            }
            SECP_384_R_1 => {
                let verifying_key = p384::ecdsa::VerifyingKey::from_public_key_der(&spki).unwrap();
                let signature = p384::ecdsa::Signature::from_der(signature).unwrap();
                verifying_key
                    .verify_prehash(&digest, &signature)
                    .expect("P-384 signature does not verify");
            }
            other => panic!("unexpected curve {other}"),
        },
        other => panic!("unexpected signature algorithm {other}"),
    }
}
