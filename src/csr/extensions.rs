use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::Ia5String,
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::CsrError;

/// An extension value that can be placed in an `extensionRequest` attribute
/// and read back out of a parsed request.
///
/// ```
/// use csrtool::csr::attributes::extension_request;
/// use csrtool::csr::extensions::{SubjectAltName, ToAndFromX509Extension};
/// use der::asn1::OctetString;
/// use x509_cert::ext::Extension;
///
/// let san = SubjectAltName { names: vec!["www.example.com".to_string()] };
/// let extension = Extension {
///     extn_id: SubjectAltName::OID,
///     critical: false,
///     extn_value: OctetString::new(san.to_x509_extension_value()?)?,
/// };
/// let attribute = extension_request(&[extension.clone()])?;
/// assert_eq!(attribute.values.len(), 1);
///
/// let requested = SubjectAltName::from_x509_extension_value(extension.extn_value.as_bytes())?;
/// assert_eq!(requested, san);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait ToAndFromX509Extension {
    /// `extnID` of the extension.
    const OID: ObjectIdentifier;

    /// DER encoding of the `extnValue` contents.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CsrError>;

    /// Parses the `extnValue` contents of a requested extension.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CsrError>
    where
        Self: Sized;
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// # Fields
/// * `names` - A list of DNS names, encoded as `dNSName` entries in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<String>,
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CsrError> {
        let san = x509_cert::ext::pkix::SubjectAltName(
            self.names
                .iter()
                .map(|name| {
                    Ia5String::try_from(name.clone())
                        .map(GeneralName::DnsName)
                        .map_err(|e| CsrError::EncodingError(format!("dNSName {name:?}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
        );

        san.to_der()
            .map_err(|e| CsrError::EncodingError(format!("subject alternative name: {e}")))
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CsrError> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)
            .map_err(|e| CsrError::DecodingError(e.to_string()))?;
        let names = san
            .0
            .iter()
            .map(|name| match name {
                GeneralName::DnsName(dns) => Ok(dns.to_string()),
                _ => Err(CsrError::DecodingError(
                    "Unsupported general name type".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { names })
    }
}
