use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Encode;
use der::asn1::SetOfVec;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::attributes::{directory_string, directory_string_value};
use crate::error::{CsrError, Result};

/// `id-at-commonName`
pub const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
/// `id-at-countryName`
pub const COUNTRY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
/// `id-at-localityName`
pub const LOCALITY_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
/// `id-at-stateOrProvinceName`
pub const STATE_OR_PROVINCE_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
/// `id-at-organizationName`
pub const ORGANIZATION_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
/// `id-at-organizationalUnitName`
pub const ORGANIZATIONAL_UNIT_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Parameters for building a certificate signing request.
///
/// # Fields
/// * `subject` - The distinguished name of the requester.
/// * `dns_names` - DNS names requested as subject alternative names.
/// * `challenge_password` - PKCS#9 challenge password; empty means none.
#[derive(Clone, Debug, Builder)]
pub struct CsrParams {
    pub subject: DistinguishedName,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub challenge_password: String,
}

/// One attribute of a distinguished name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameAttribute {
    CommonName(String),
    Organization(String),
    OrganizationalUnit(String),
    Country(String),
    Province(String),
    Locality(String),
}

impl NameAttribute {
    /// The attribute type OID.
    pub fn oid(&self) -> ObjectIdentifier {
        match self {
            NameAttribute::CommonName(_) => COMMON_NAME,
            NameAttribute::Organization(_) => ORGANIZATION_NAME,
            NameAttribute::OrganizationalUnit(_) => ORGANIZATIONAL_UNIT_NAME,
            NameAttribute::Country(_) => COUNTRY_NAME,
            NameAttribute::Province(_) => STATE_OR_PROVINCE_NAME,
            NameAttribute::Locality(_) => LOCALITY_NAME,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            NameAttribute::CommonName(v)
            | NameAttribute::Organization(v)
            | NameAttribute::OrganizationalUnit(v)
            | NameAttribute::Country(v)
            | NameAttribute::Province(v)
            | NameAttribute::Locality(v) => v,
        }
    }

    fn from_oid(oid: ObjectIdentifier, value: String) -> Result<Self> {
        match oid {
            COMMON_NAME => Ok(NameAttribute::CommonName(value)),
            ORGANIZATION_NAME => Ok(NameAttribute::Organization(value)),
            ORGANIZATIONAL_UNIT_NAME => Ok(NameAttribute::OrganizationalUnit(value)),
            COUNTRY_NAME => Ok(NameAttribute::Country(value)),
            STATE_OR_PROVINCE_NAME => Ok(NameAttribute::Province(value)),
            LOCALITY_NAME => Ok(NameAttribute::Locality(value)),
            other => Err(CsrError::DecodingError(format!(
                "unsupported name attribute {other}"
            ))),
        }
    }
}

/// Distinguished name of the request subject.
///
/// Attributes are encoded in the order they were added, each in its own
/// RDN. Values are not validated; a two-letter country code is the caller's
/// business.
///
/// ```
/// use csrtool::csr::params::DistinguishedName;
///
/// let subject = DistinguishedName::new("example.com")
///     .organization("Example Organization")
///     .country("US");
/// assert_eq!(subject.attributes().len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    attributes: Vec<NameAttribute>,
}

impl DistinguishedName {
    /// Starts a name with its common name.
    pub fn new(common_name: impl Into<String>) -> Self {
        Self {
            attributes: vec![NameAttribute::CommonName(common_name.into())],
        }
    }

    pub fn organization(self, value: impl Into<String>) -> Self {
        self.with(NameAttribute::Organization(value.into()))
    }

    pub fn organizational_unit(self, value: impl Into<String>) -> Self {
        self.with(NameAttribute::OrganizationalUnit(value.into()))
    }

    pub fn country(self, value: impl Into<String>) -> Self {
        self.with(NameAttribute::Country(value.into()))
    }

    pub fn province(self, value: impl Into<String>) -> Self {
        self.with(NameAttribute::Province(value.into()))
    }

    pub fn locality(self, value: impl Into<String>) -> Self {
        self.with(NameAttribute::Locality(value.into()))
    }

    /// Appends an attribute, keeping insertion order.
    pub fn with(mut self, attribute: NameAttribute) -> Self {
        self.push(attribute);
        self
    }

    pub fn push(&mut self, attribute: NameAttribute) {
        self.attributes.push(attribute);
    }

    pub fn attributes(&self) -> &[NameAttribute] {
        &self.attributes
    }

    /// The first common name, if any.
    pub fn common_name(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            NameAttribute::CommonName(cn) => Some(cn.as_str()),
            _ => None,
        })
    }

    /// Converts the distinguished name to an X.509 `RDNSequence`.
    ///
    /// Values become PrintableString when every character allows it and
    /// UTF8String otherwise.
    pub fn as_x509_name(&self) -> Result<RdnSequence> {
        let rdns = self
            .attributes
            .iter()
            .map(|attr| -> der::Result<RelativeDistinguishedName> {
                let atv = AttributeTypeAndValue {
                    oid: attr.oid(),
                    value: directory_string(attr.value())?,
                };
                Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
            })
            .collect::<der::Result<Vec<_>>>()
            .map_err(|e| CsrError::EncodingError(format!("subject name: {e}")))?;
        Ok(RdnSequence(rdns))
    }

    /// DER encoding of the name.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.as_x509_name()?
            .to_der()
            .map_err(|e| CsrError::EncodingError(format!("subject name: {e}")))
    }

    /// Creates a `DistinguishedName` from a decoded X.509 name, keeping order.
    pub fn from_x509_name(x509dn: &RdnSequence) -> Result<Self> {
        let mut attributes = Vec::new();
        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let value = directory_string_value(&attr.value)?;
                attributes.push(NameAttribute::from_oid(attr.oid, value)?);
            }
        }
        Ok(Self { attributes })
    }
}
