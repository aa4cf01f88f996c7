//! PKCS#9 attributes carried in the request's `[0] Attributes` field.

use const_oid::ObjectIdentifier;
use const_oid::db::rfc5912::ID_EXTENSION_REQ;
use der::asn1::{OctetString, PrintableStringRef, SetOfVec, Utf8StringRef};
use der::{Any, Tag, Tagged};
use x509_cert::attr::{Attribute, Attributes};
use x509_cert::ext::Extension;

use super::extensions::{SubjectAltName, ToAndFromX509Extension};
use super::params::CsrParams;
use crate::error::{CsrError, Result};

/// `pkcs-9-at-challengePassword`
pub const CHALLENGE_PASSWORD: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.9.7");

/// Encodes `value` as a PrintableString, or as a UTF8String when it holds
/// characters outside the PrintableString alphabet.
pub(crate) fn directory_string(value: &str) -> der::Result<Any> {
    match PrintableStringRef::new(value) {
        Ok(printable) => Any::encode_from(&printable),
        Err(_) => Any::encode_from(&Utf8StringRef::new(value)?),
    }
}

/// Reads back a string-valued attribute.
pub(crate) fn directory_string_value(value: &Any) -> Result<String> {
    match value.tag() {
        Tag::PrintableString | Tag::Utf8String | Tag::Ia5String | Tag::TeletexString => {
            std::str::from_utf8(value.value())
                .map(str::to_string)
                .map_err(|e| CsrError::DecodingError(e.to_string()))
        }
        other => Err(CsrError::DecodingError(format!(
            "unsupported string type {other}"
        ))),
    }
}

/// Builds the `challengePassword` attribute with a single value.
///
/// The value is a PrintableString; a password with characters outside that
/// alphabet is written as a UTF8String instead.
pub fn challenge_password(password: &str) -> Result<Attribute> {
    let value = directory_string(password)
        .map_err(|e| CsrError::EncodingError(format!("challenge password: {e}")))?;
    Ok(Attribute {
        oid: CHALLENGE_PASSWORD,
        values: SetOfVec::try_from(vec![value])?,
    })
}

/// Builds the `extensionRequest` attribute; its single value is the
/// `SEQUENCE OF Extension`.
pub fn extension_request(extensions: &[Extension]) -> Result<Attribute> {
    let value = Any::encode_from(&extensions.to_vec())
        .map_err(|e| CsrError::EncodingError(format!("extension request: {e}")))?;

    Ok(Attribute {
        oid: ID_EXTENSION_REQ,
        values: SetOfVec::try_from(vec![value])?,
    })
}

/// Wraps `dns_names` in a non-critical SubjectAltName extension.
fn subject_alt_name(dns_names: &[String]) -> Result<Extension> {
    let san = SubjectAltName {
        names: dns_names.to_vec(),
    };
    Ok(Extension {
        extn_id: SubjectAltName::OID,
        critical: false,
        extn_value: OctetString::new(san.to_x509_extension_value()?)?,
    })
}

/// Collects the attribute set for `params`.
///
/// A non-empty challenge password adds `challengePassword`; DNS names add
/// one `extensionRequest` holding the SAN. With neither the set is empty.
pub fn request_attributes(params: &CsrParams) -> Result<Attributes> {
    let mut attributes = Vec::new();

    if !params.challenge_password.is_empty() {
        attributes.push(challenge_password(&params.challenge_password)?);
    }

    if !params.dns_names.is_empty() {
        let san = subject_alt_name(&params.dns_names)?;
        attributes.push(extension_request(&[san])?);
    }

    Ok(SetOfVec::try_from(attributes)?)
}
