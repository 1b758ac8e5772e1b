//! Certificate values and the parameter types that describe them.

pub mod extensions;
pub mod params;

use std::fmt;

use der::Decode;
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::encoding;
use crate::error::{Error, Result};
use extensions::{PkixExtension, SubjectKeyIdentifier};
use params::DistinguishedName;

/// A signed X.509 certificate.
///
/// The raw DER bytes are kept alongside the decoded structure: fingerprints,
/// PEM rendering, and equality all operate on the exact bytes that were
/// signed, so a certificate that round-trips through PEM compares equal to
/// the original.
#[derive(Clone)]
pub struct Certificate {
    raw: Vec<u8>,
    inner: CertificateInner,
}

impl Certificate {
    /// Parses a DER-encoded certificate, keeping the input bytes.
    pub fn from_der(der: Vec<u8>) -> std::result::Result<Self, der::Error> {
        let inner = CertificateInner::from_der(&der)?;
        Ok(Certificate { raw: der, inner })
    }

    /// Parses a single PEM `CERTIFICATE` block.
    pub fn from_pem(pem_bytes: &[u8]) -> Result<Self> {
        let der = encoding::der_from_pem(encoding::CERTIFICATE, pem_bytes)?;
        Self::from_der(der).map_err(|e| Error::decoding("certificate", e))
    }

    /// The DER encoding this certificate was parsed from.
    pub fn as_der(&self) -> &[u8] {
        &self.raw
    }

    /// Renders the certificate as a PEM `CERTIFICATE` block.
    pub fn to_pem(&self) -> Vec<u8> {
        encoding::pem_block(encoding::CERTIFICATE, &self.raw)
    }

    /// The subject distinguished name.
    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    /// The issuer distinguished name.
    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// Start of the validity window.
    pub fn not_before(&self) -> OffsetDateTime {
        OffsetDateTime::from(self.inner.tbs_certificate.validity.not_before.to_system_time())
    }

    /// End of the validity window, exactly as encoded in the certificate.
    pub fn not_after(&self) -> OffsetDateTime {
        OffsetDateTime::from(self.inner.tbs_certificate.validity.not_after.to_system_time())
    }

    /// The serial number as big-endian bytes.
    pub fn serial_bytes(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    /// The RSA public key bound by this certificate.
    pub fn rsa_public_key(&self) -> Result<RsaPublicKey> {
        let spki = &self.inner.tbs_certificate.subject_public_key_info;
        RsaPublicKey::from_pkcs1_der(spki.subject_public_key.raw_bytes())
            .map_err(|e| Error::decoding("certificate public key", e))
    }

    /// The Subject Key Identifier extension value, when present.
    pub fn subject_key_identifier(&self) -> Option<Vec<u8>> {
        self.inner
            .tbs_certificate
            .extensions
            .as_ref()?
            .iter()
            .find(|ext| ext.extn_id == SubjectKeyIdentifier::OID)
            .and_then(|ext| SubjectKeyIdentifier::from_der_value(ext.extn_value.as_bytes()).ok())
            .map(|ski| ski.0)
    }

    /// The subject name in its encoded form, for reuse as an issuer name.
    pub(crate) fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    /// The subject public key bits, as hashed for key identifiers.
    pub(crate) fn public_key_bits(&self) -> &[u8] {
        self.inner
            .tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes()
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Certificate {}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("subject", &self.subject().to_string())
            .field("issuer", &self.issuer().to_string())
            .field("serial", &self.serial_bytes())
            .field("not_after", &self.not_after())
            .finish_non_exhaustive()
    }
}
