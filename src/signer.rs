//! The signing half of issuance: canonical certificate descriptors and the
//! single routine that turns one into a signed certificate.
//!
//! Self-signing and delegated signing share one code path; the only
//! difference is which issuer view is passed in.

use der::asn1::{BitString, GeneralizedTime, UtcTime};
use der::{Any, AnyRef, Encode};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::{CertificateInner, TbsCertificateInner};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::{Time, Validity};

use crate::cert::Certificate;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, SubjectKeyIdentifier, to_extension,
};
use crate::cert::params::Template;
use crate::error::{Error, Result};

/// RFC 5280 upper bound on serial number width.
const MAX_SERIAL_OCTETS: usize = 20;

/// A template converted into the canonical form the signer consumes.
///
/// Conversion performs the structural checks: templates with an empty
/// subject, a missing or oversized serial, or an inverted validity window
/// never reach the signature primitive.
pub(crate) struct Descriptor {
    common_name: String,
    subject: Name,
    serial: SerialNumber,
    not_before: OffsetDateTime,
    not_after: OffsetDateTime,
    is_ca: bool,
    extensions: Vec<Extension>,
}

impl Descriptor {
    pub(crate) fn from_template(template: &Template) -> Result<Self> {
        let common_name = template.subject.common_name.clone();

        if template.subject.is_empty() {
            return Err(signing_error(&common_name, "subject has no attributes"));
        }
        let subject = template
            .subject
            .to_x509_name()
            .map_err(|e| signing_error(&common_name, e))?;

        if template.serial_number.is_empty() {
            return Err(signing_error(&common_name, "missing serial number"));
        }
        if template.serial_number.as_bytes().len() > MAX_SERIAL_OCTETS {
            return Err(signing_error(&common_name, "serial number exceeds 20 octets"));
        }
        let serial = SerialNumber::new(template.serial_number.as_bytes())
            .map_err(|e| signing_error(&common_name, e))?;

        if template.validity.not_before >= template.validity.not_after {
            return Err(signing_error(
                &common_name,
                "notBefore is not earlier than notAfter",
            ));
        }

        let mut extensions = Vec::new();
        if template.basic_constraints_valid {
            let bc = BasicConstraints {
                is_ca: template.is_ca,
                max_path_length: None,
            };
            extensions
                .push(to_extension(&bc, true).map_err(|e| signing_error(&common_name, e))?);
        }
        if !template.key_usage.is_empty() {
            extensions.push(
                to_extension(&template.key_usage, true)
                    .map_err(|e| signing_error(&common_name, e))?,
            );
        }
        if !template.extended_key_usage.is_empty() {
            let eku = ExtendedKeyUsage {
                usages: template.extended_key_usage.clone(),
            };
            extensions
                .push(to_extension(&eku, false).map_err(|e| signing_error(&common_name, e))?);
        }

        Ok(Descriptor {
            common_name,
            subject,
            serial,
            not_before: template.validity.not_before,
            not_after: template.validity.not_after,
            is_ca: template.is_ca,
            extensions,
        })
    }

    pub(crate) fn common_name(&self) -> &str {
        &self.common_name
    }
}

/// The issuer half of a signing operation.
///
/// Roots sign with their own descriptor's view; children with the view of
/// the parent certificate.
pub(crate) struct IssuerView<'a> {
    name: &'a Name,
    key_identifier: Option<Vec<u8>>,
}

impl<'a> IssuerView<'a> {
    /// Issuer equals subject; no authority key identifier exists yet.
    pub(crate) fn self_signed(descriptor: &'a Descriptor) -> Self {
        IssuerView {
            name: &descriptor.subject,
            key_identifier: None,
        }
    }

    /// Issuer is an existing certificate; its subject key identifier, when
    /// present, becomes the child's authority key identifier.
    pub(crate) fn for_certificate(parent: &'a Certificate) -> Self {
        IssuerView {
            name: parent.subject_name(),
            key_identifier: parent.subject_key_identifier(),
        }
    }
}

/// Builds and signs a v3 certificate binding `descriptor` to `public_key`.
///
/// The signed DER is re-parsed before being returned; bytes that fail that
/// parse surface as [`Error::Parsing`] rather than producing a certificate
/// value that later consumers cannot decode.
pub(crate) fn sign(
    descriptor: &Descriptor,
    issuer: IssuerView<'_>,
    public_key: &RsaPublicKey,
    signing_key: &RsaPrivateKey,
) -> Result<Certificate> {
    let common_name = descriptor.common_name();

    let spki = SubjectPublicKeyInfoOwned::from_key(public_key.clone())
        .map_err(|e| signing_error(common_name, e))?;

    let mut extensions = descriptor.extensions.clone();
    if descriptor.is_ca {
        let key_id = Sha1::digest(spki.subject_public_key.raw_bytes());
        let ski = SubjectKeyIdentifier(key_id.to_vec());
        extensions.push(to_extension(&ski, false).map_err(|e| signing_error(common_name, e))?);
    }
    if let Some(key_identifier) = issuer.key_identifier {
        let aki = AuthorityKeyIdentifier { key_identifier };
        extensions.push(to_extension(&aki, false).map_err(|e| signing_error(common_name, e))?);
    }

    let algorithm = signature_algorithm();
    let validity = Validity {
        not_before: to_x509_time(descriptor.not_before)
            .map_err(|e| signing_error(common_name, e))?,
        not_after: to_x509_time(descriptor.not_after)
            .map_err(|e| signing_error(common_name, e))?,
    };

    let tbs_certificate = TbsCertificateInner {
        version: Version::V3,
        serial_number: descriptor.serial.clone(),
        signature: algorithm.clone(),
        issuer: issuer.name.clone(),
        validity,
        subject: descriptor.subject.clone(),
        subject_public_key_info: spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: if extensions.is_empty() {
            None
        } else {
            Some(extensions)
        },
    };

    let tbs_der = tbs_certificate
        .to_der()
        .map_err(|e| signing_error(common_name, e))?;

    let signer: SigningKey<Sha256> = SigningKey::new(signing_key.clone());
    let signature = signer
        .try_sign(&tbs_der)
        .map_err(|e| signing_error(common_name, e))?;

    let certificate = CertificateInner {
        tbs_certificate,
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&signature.to_vec())
            .map_err(|e| signing_error(common_name, e))?,
    };
    let der = certificate
        .to_der()
        .map_err(|e| signing_error(common_name, e))?;

    Certificate::from_der(der).map_err(|e| Error::Parsing {
        common_name: common_name.to_string(),
        reason: e.to_string(),
    })
}

/// sha256WithRSAEncryption with the NULL parameters RFC 4055 requires.
fn signature_algorithm() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
        parameters: Some(Any::from(AnyRef::NULL)),
    }
}

/// UTCTime through 2049, GeneralizedTime from 2050 on, per RFC 5280.
fn to_x509_time(timestamp: OffsetDateTime) -> der::Result<Time> {
    if timestamp.year() < 2050 {
        UtcTime::from_system_time(timestamp.into()).map(Time::UtcTime)
    } else {
        GeneralizedTime::from_system_time(timestamp.into()).map(Time::GeneralTime)
    }
}

fn signing_error(common_name: &str, reason: impl ToString) -> Error {
    Error::Signing {
        common_name: common_name.to_string(),
        reason: reason.to_string(),
    }
}
