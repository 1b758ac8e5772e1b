use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::OctetString,
    oid::ObjectIdentifier,
};
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;

pub use der::flagset::FlagSet;
pub use x509_cert::ext::pkix::KeyUsages;

/// Codec for a single PKIX extension value.
///
/// Implementors pair their OID with the DER encoding of the extension value
/// (the bytes that end up inside the extension's OCTET STRING).
pub trait PkixExtension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension value into DER.
    fn to_der_value(&self) -> Result<Vec<u8>, der::Error>;

    /// Decodes the extension value from DER.
    fn from_der_value(value: &[u8]) -> Result<Self, der::Error>
    where
        Self: Sized;
}

/// Builds a certificate extension from a codec value and a criticality flag.
pub fn to_extension<E: PkixExtension>(extension: &E, critical: bool) -> Result<Extension, der::Error> {
    Ok(Extension {
        extn_id: E::OID,
        critical,
        extn_value: OctetString::new(extension.to_der_value()?)?,
    })
}

/// The Basic Constraints extension: whether the subject may act as a CA and
/// how deep a chain it may sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl PkixExtension for BasicConstraints {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::BasicConstraints as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, der::Error> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        };
        bc.to_der()
    }

    fn from_der_value(value: &[u8]) -> Result<Self, der::Error> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(value)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint,
        })
    }
}

/// The Key Usage extension as a set of capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for KeyUsage {
    fn default() -> Self {
        KeyUsage(FlagSet::default())
    }
}

impl From<FlagSet<KeyUsages>> for KeyUsage {
    fn from(flags: FlagSet<KeyUsages>) -> Self {
        KeyUsage(flags)
    }
}

impl From<KeyUsages> for KeyUsage {
    fn from(flag: KeyUsages) -> Self {
        KeyUsage(flag.into())
    }
}

impl PkixExtension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, der::Error> {
        X509KeyUsage::from(self.0).to_der()
    }

    fn from_der_value(value: &[u8]) -> Result<Self, der::Error> {
        let ku = X509KeyUsage::from_der(value)?;
        Ok(Self(ku.0))
    }
}

/// The Extended Key Usage extension: purposes the public key may serve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub usages: Vec<ExtendedKeyUsageOption>,
}

impl PkixExtension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::ExtendedKeyUsage as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, der::Error> {
        let oids: Vec<ObjectIdentifier> = self.usages.iter().map(|v| (*v).into()).collect();
        x509_cert::ext::pkix::ExtendedKeyUsage(oids).to_der()
    }

    fn from_der_value(value: &[u8]) -> Result<Self, der::Error> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(value)?;
        let usages = eku
            .0
            .iter()
            .map(|oid| {
                ExtendedKeyUsageOption::try_from(*oid)
                    .map_err(|_| der::ErrorKind::OidUnknown { oid: *oid }.into())
            })
            .collect::<Result<Vec<_>, der::Error>>()?;
        Ok(Self { usages })
    }
}

/// A single Extended Key Usage purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyUsageOption {
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
}

impl From<ExtendedKeyUsageOption> for ObjectIdentifier {
    fn from(value: ExtendedKeyUsageOption) -> Self {
        match value {
            ExtendedKeyUsageOption::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
            ExtendedKeyUsageOption::CodeSigning => const_oid::db::rfc5912::ID_KP_CODE_SIGNING,
            ExtendedKeyUsageOption::EmailProtection => {
                const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION
            }
            ExtendedKeyUsageOption::TimeStamping => const_oid::db::rfc5912::ID_KP_TIME_STAMPING,
            ExtendedKeyUsageOption::OcspSigning => const_oid::db::rfc5912::ID_KP_OCSP_SIGNING,
        }
    }
}

impl TryFrom<ObjectIdentifier> for ExtendedKeyUsageOption {
    type Error = ObjectIdentifier;

    fn try_from(oid: ObjectIdentifier) -> Result<Self, ObjectIdentifier> {
        match oid {
            const_oid::db::rfc5912::ID_KP_SERVER_AUTH => Ok(ExtendedKeyUsageOption::ServerAuth),
            const_oid::db::rfc5912::ID_KP_CLIENT_AUTH => Ok(ExtendedKeyUsageOption::ClientAuth),
            const_oid::db::rfc5912::ID_KP_CODE_SIGNING => Ok(ExtendedKeyUsageOption::CodeSigning),
            const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION => {
                Ok(ExtendedKeyUsageOption::EmailProtection)
            }
            const_oid::db::rfc5912::ID_KP_TIME_STAMPING => Ok(ExtendedKeyUsageOption::TimeStamping),
            const_oid::db::rfc5912::ID_KP_OCSP_SIGNING => Ok(ExtendedKeyUsageOption::OcspSigning),
            other => Err(other),
        }
    }
}

/// The Subject Key Identifier extension, carried by CA certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier(pub Vec<u8>);

impl PkixExtension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = <x509_cert::ext::pkix::SubjectKeyIdentifier as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, der::Error> {
        x509_cert::ext::pkix::SubjectKeyIdentifier(OctetString::new(self.0.as_slice())?).to_der()
    }

    fn from_der_value(value: &[u8]) -> Result<Self, der::Error> {
        let ski = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(value)?;
        Ok(Self(ski.0.as_bytes().to_vec()))
    }
}

/// The Authority Key Identifier extension in its key-identifier-only form,
/// naming the issuer's subject key identifier on issued certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl PkixExtension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier =
        <x509_cert::ext::pkix::AuthorityKeyIdentifier as AssociatedOid>::OID;

    fn to_der_value(&self) -> Result<Vec<u8>, der::Error> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.as_slice())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        };
        aki.to_der()
    }

    fn from_der_value(value: &[u8]) -> Result<Self, der::Error> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(value)?;
        Ok(Self {
            key_identifier: aki
                .key_identifier
                .map(|id| id.as_bytes().to_vec())
                .unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_constraints_round_trip() {
        let original = BasicConstraints {
            is_ca: true,
            max_path_length: Some(3),
        };
        let encoded = original.to_der_value().unwrap();
        let decoded = BasicConstraints::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn key_usage_round_trip() {
        let original = KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign);
        let encoded = original.to_der_value().unwrap();
        let decoded = KeyUsage::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn extended_key_usage_rejects_unknown_oid() {
        let unknown = ObjectIdentifier::new_unwrap("1.3.6.1.5.5.7.3.99");
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage(vec![
            const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            unknown,
        ]);
        let encoded = eku.to_der().unwrap();
        assert!(ExtendedKeyUsage::from_der_value(&encoded).is_err());
    }

    #[test]
    fn authority_key_identifier_keeps_key_id_only() {
        let original = AuthorityKeyIdentifier {
            key_identifier: vec![1, 2, 3, 4, 5],
        };
        let encoded = original.to_der_value().unwrap();
        let decoded = AuthorityKeyIdentifier::from_der_value(&encoded).unwrap();
        assert_eq!(original, decoded);
    }
}
