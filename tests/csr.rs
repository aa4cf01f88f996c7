mod util;

use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_256, ID_EXTENSION_REQ, SECP_256_R_1, SECP_384_R_1, SHA_256_WITH_RSA_ENCRYPTION,
};
use csrtool::csr::attributes::CHALLENGE_PASSWORD;
use csrtool::csr::extensions::{SubjectAltName, ToAndFromX509Extension};
use csrtool::csr::params::{CsrParams, DistinguishedName, NameAttribute};
use csrtool::csr::{CertificationRequest, SignatureAlgorithm, build_csr};
use csrtool::error::CsrError;
use csrtool::key::KeyPair;
use der::asn1::AnyRef;
use der::{Decode, Encode, Reader, SliceReader, Tag, Tagged};
use x509_cert::ext::Extension;

fn example_subject() -> DistinguishedName {
    DistinguishedName::new("example.com")
        .organization("Example Organization")
        .country("US")
}

#[test]
fn rsa_request_without_password() {
    let key = util::load_key("rsa2048");
    let pem = build_csr(&key, &example_subject(), &[], "").unwrap();

    assert!(pem.starts_with("-----BEGIN CERTIFICATE REQUEST-----\n"));
    assert!(pem.ends_with("-----END CERTIFICATE REQUEST-----\n"));
    assert_eq!(pem.matches("-----BEGIN ").count(), 1);

    let req = util::parse_csr(&pem);
    assert_eq!(req.info.version, x509_cert::request::Version::V1);

    let subject = DistinguishedName::from_x509_name(&req.info.subject).unwrap();
    assert_eq!(
        subject.attributes(),
        &[
            NameAttribute::CommonName("example.com".to_string()),
            NameAttribute::Organization("Example Organization".to_string()),
            NameAttribute::Country("US".to_string()),
        ]
    );

    assert!(req.info.attributes.is_empty());
    assert_eq!(req.algorithm.oid, SHA_256_WITH_RSA_ENCRYPTION);
    assert_eq!(req.algorithm.parameters.as_ref().unwrap().tag(), Tag::Null);
    assert_eq!(req.signature.unused_bits(), 0);
    assert_eq!(req.signature.raw_bytes().len(), 256);
    util::verify_signature(&req);
}

#[test]
fn p256_request_with_challenge_password() {
    let key = util::load_key("p256");
    let pem = build_csr(&key, &example_subject(), &[], "hello321").unwrap();
    let req = util::parse_csr(&pem);

    assert_eq!(req.info.attributes.len(), 1);
    let attr = req.info.attributes.get(0).unwrap();
    assert_eq!(attr.oid, CHALLENGE_PASSWORD);
    assert_eq!(attr.values.len(), 1);
    let value = attr.values.get(0).unwrap();
    assert_eq!(value.tag(), Tag::PrintableString);
    assert_eq!(value.value(), b"hello321");

    assert_eq!(req.algorithm.oid, ECDSA_WITH_SHA_256);
    assert!(req.algorithm.parameters.is_none());
    assert_eq!(util::curve_of(&req), SECP_256_R_1);
    util::verify_signature(&req);
}

#[test]
fn p384_request_signs_with_sha256() {
    let key = util::load_key("p384");
    let pem = build_csr(&key, &example_subject(), &[], "").unwrap();
    let req = util::parse_csr(&pem);

    assert_eq!(util::curve_of(&req), SECP_384_R_1);
    assert_eq!(req.algorithm.oid, ECDSA_WITH_SHA_256);
    util::verify_signature(&req);
}

#[test]
fn generated_keys_produce_verifiable_requests() {
    for key in [KeyPair::generate_ecdsa_p256(), KeyPair::generate_ecdsa_p384()] {
        let pem = build_csr(&key, &example_subject(), &[], "").unwrap();
        util::verify_signature(&util::parse_csr(&pem));
    }
}

#[test]
fn subject_order_follows_caller() {
    let key = util::load_key("p256");
    let subject = DistinguishedName::new("example.com")
        .locality("San Francisco")
        .organization("Example Organization")
        .province("California")
        .organizational_unit("Example Unit")
        .organizational_unit("Second Unit")
        .country("US");
    let pem = build_csr(&key, &subject, &[], "").unwrap();
    let req = util::parse_csr(&pem);

    assert_eq!(req.info.subject.0.len(), 7);
    assert_eq!(DistinguishedName::from_x509_name(&req.info.subject).unwrap(), subject);
}

#[test]
fn info_bytes_are_stable_across_builds() {
    let key = util::load_key("p256");
    let params = CsrParams::builder()
        .subject(example_subject())
        .dns_names(vec!["example.com".to_string()])
        .challenge_password("hello321".to_string())
        .build();

    let first = CertificationRequest::build(&key, &params).unwrap();
    let second = CertificationRequest::build(&key, &params).unwrap();
    assert_eq!(first.info_der(), second.info_der());
}

#[test]
fn signed_info_is_embedded_verbatim() {
    let key = util::load_key("rsa2048");
    let params = CsrParams::builder().subject(example_subject()).build();
    let request = CertificationRequest::build(&key, &params).unwrap();
    let req = util::parse_csr(&request.to_pem().unwrap());

    assert_eq!(req.info.to_der().unwrap(), request.info_der());
    assert_eq!(req.signature.raw_bytes(), request.signature());
    assert_eq!(request.signature_algorithm(), SignatureAlgorithm::Sha256WithRSA);

    // the public key is the one the key encoder produced
    let spki = req.info.public_key.to_der().unwrap();
    assert_eq!(spki, key.public_key_info().unwrap().as_der());

    // empty attributes still encode as [0]
    assert!(request.info_der().ends_with(&[0xa0, 0x00]));
}

#[test]
fn outer_structure_has_three_elements() {
    let key = util::load_key("p256");
    let params = CsrParams::builder().subject(example_subject()).build();
    let der = CertificationRequest::build(&key, &params)
        .unwrap()
        .to_der()
        .unwrap();

    let outer = AnyRef::from_der(&der).unwrap();
    assert_eq!(outer.tag(), Tag::Sequence);
    let mut reader = SliceReader::new(outer.value()).unwrap();
    let mut count = 0;
    while !reader.is_finished() {
        AnyRef::decode(&mut reader).unwrap();
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn dns_names_become_extension_request() {
    let key = util::load_key("p256");
    let dns_names = vec!["example.com".to_string(), "www.example.com".to_string()];
    let pem = build_csr(&key, &example_subject(), &dns_names, "hello321").unwrap();
    let req = util::parse_csr(&pem);

    assert_eq!(req.info.attributes.len(), 2);
    let ext_req = req
        .info
        .attributes
        .iter()
        .find(|attr| attr.oid == ID_EXTENSION_REQ)
        .expect("extensionRequest attribute missing");
    assert_eq!(ext_req.values.len(), 1);

    let extensions =
        Vec::<Extension>::from_der(&ext_req.values.get(0).unwrap().to_der().unwrap()).unwrap();
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions[0].extn_id, SubjectAltName::OID);
    let san =
        SubjectAltName::from_x509_extension_value(extensions[0].extn_value.as_bytes()).unwrap();
    assert_eq!(san.names, dns_names);

    assert!(
        req.info
            .attributes
            .iter()
            .any(|attr| attr.oid == CHALLENGE_PASSWORD)
    );
    util::verify_signature(&req);
}

#[test]
fn rsa_request_with_full_subject_names_and_password() {
    let key = util::load_key("rsa2048");
    let subject = DistinguishedName::new("example.com")
        .organization("Example Organization")
        .organizational_unit("Example Unit")
        .country("US")
        .province("California")
        .locality("San Francisco");
    let dns_names = vec!["example.com".to_string(), "www.example.com".to_string()];
    let pem = build_csr(&key, &subject, &dns_names, "hello321").unwrap();
    let req = util::parse_csr(&pem);

    assert_eq!(DistinguishedName::from_x509_name(&req.info.subject).unwrap(), subject);
    let oids: Vec<_> = req.info.attributes.iter().map(|attr| attr.oid).collect();
    assert_eq!(oids.len(), 2);
    assert!(oids.contains(&CHALLENGE_PASSWORD));
    assert!(oids.contains(&ID_EXTENSION_REQ));
    util::verify_signature(&req);
}

#[test]
fn invalid_dns_name_is_an_encoding_error() {
    let key = util::load_key("p256");
    let result = build_csr(&key, &example_subject(), &["bücher.example".to_string()], "");
    assert!(matches!(result, Err(CsrError::EncodingError(_))));
}

#[test]
fn unsupported_keys_are_rejected() {
    for name in ["ed25519", "p521"] {
        let result = KeyPair::from_pkcs8_pem(&util::fixture_pem(name));
        assert!(
            matches!(result, Err(CsrError::UnsupportedKeyType(_))),
            "{name} was not rejected: {result:?}"
        );
    }
}

#[test]
fn concurrent_builds_share_a_key() {
    let key = util::load_key("p384");
    let subject = example_subject();

    let requests: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let key = &key;
                let subject = subject.clone().organizational_unit(format!("unit {i}"));
                scope.spawn(move || build_csr(key, &subject, &[], "").unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for pem in &requests {
        util::verify_signature(&util::parse_csr(pem));
    }
}
