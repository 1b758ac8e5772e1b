use std::fmt;
use std::str::FromStr;

use bon::Builder;
use der::Any;
use der::asn1::{Ia5StringRef, PrintableStringRef, TeletexStringRef, Utf8StringRef};
use time::{Duration, OffsetDateTime};
use x509_cert::name::{Name, RdnSequence};

use super::extensions::{ExtendedKeyUsageOption, KeyUsage};

/// Parameters describing a certificate to be issued.
///
/// A template is caller-constructed, immutable, and reusable: converting it
/// into a certificate descriptor is deterministic, so the same template can
/// back any number of issuance attempts.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `validity` - The certificate validity window.
/// * `serial_number` - Caller-assigned serial; uniqueness per issuer is the
///   caller's responsibility.
/// * `key_usage` - Key usage capability flags.
/// * `extended_key_usage` - Extended key usage purposes.
/// * `is_ca` - Whether the subject may sign further certificates.
/// * `basic_constraints_valid` - Whether to emit the Basic Constraints
///   extension at all.
#[derive(Clone, Debug, Builder)]
pub struct Template {
    pub subject: DistinguishedName,
    pub validity: Validity,
    #[builder(into)]
    pub serial_number: Serial,
    #[builder(into, default)]
    pub key_usage: KeyUsage,
    #[builder(default)]
    pub extended_key_usage: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub basic_constraints_valid: bool,
}

/// Distinguished name of a certificate subject or issuer.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `country` - The country (C).
/// * `state` - The state or province (ST).
/// * `locality` - The locality or city (L).
/// * `organization` - The organization (O).
/// * `organization_unit` - The organizational unit (OU).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    #[builder(into)]
    pub common_name: String,
    #[builder(into)]
    pub country: Option<String>,
    #[builder(into)]
    pub state: Option<String>,
    #[builder(into)]
    pub locality: Option<String>,
    #[builder(into)]
    pub organization: Option<String>,
    #[builder(into)]
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// True when no attribute carries a value.
    pub fn is_empty(&self) -> bool {
        self.common_name.is_empty()
            && self.country.is_none()
            && self.state.is_none()
            && self.locality.is_none()
            && self.organization.is_none()
            && self.organization_unit.is_none()
    }

    /// Converts the distinguished name into an X.509 `Name`.
    ///
    /// Attributes without a value are omitted; the encoded order puts the
    /// common name last, matching the usual C → ST → L → O → OU → CN layout.
    pub fn to_x509_name(&self) -> Result<Name, der::Error> {
        RdnSequence::from_str(&self.to_rdn_string())
    }

    /// Reads the known attributes back out of an X.509 `Name`.
    ///
    /// Unknown attribute types are ignored.
    pub fn from_x509_name(name: &Name) -> Self {
        let mut dn = DistinguishedName::default();
        for rdn in name.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = decode_attribute_string(&attr.value) else {
                    continue;
                };
                match attr.oid {
                    const_oid::db::rfc4519::CN => dn.common_name = value,
                    const_oid::db::rfc4519::C => dn.country = Some(value),
                    const_oid::db::rfc4519::ST => dn.state = Some(value),
                    const_oid::db::rfc4519::L => dn.locality = Some(value),
                    const_oid::db::rfc4519::O => dn.organization = Some(value),
                    const_oid::db::rfc4519::OU => dn.organization_unit = Some(value),
                    _ => {}
                }
            }
        }
        dn
    }

    /// Renders the present attributes as an RFC 4514 string, CN first.
    fn to_rdn_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.common_name.is_empty() {
            parts.push(format!("CN={}", escape_rfc4514(&self.common_name)));
        }
        for (key, value) in [
            ("OU", &self.organization_unit),
            ("O", &self.organization),
            ("L", &self.locality),
            ("ST", &self.state),
            ("C", &self.country),
        ] {
            if let Some(value) = value {
                if !value.is_empty() {
                    parts.push(format!("{key}={}", escape_rfc4514(value)));
                }
            }
        }
        parts.join(",")
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rdn_string())
    }
}

/// Escape an attribute value per RFC 4514 section 2.4.
fn escape_rfc4514(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let last = value.len().saturating_sub(1);
    for (i, c) in value.char_indices() {
        let escape = matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';')
            || (i == 0 && (c == ' ' || c == '#'))
            || (i == last && c == ' ');
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Decode a directory string attribute value into UTF-8.
fn decode_attribute_string(value: &Any) -> Option<String> {
    if let Ok(s) = value.decode_as::<Utf8StringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<PrintableStringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<Ia5StringRef<'_>>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<TeletexStringRef<'_>>() {
        return Some(s.to_string());
    }
    None
}

/// Certificate validity window.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            not_before: now,
            not_after: now + Duration::days(days),
        }
    }
}

/// A certificate serial number as a big-endian unsigned magnitude.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Serial(Vec<u8>);

impl Serial {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u64> for Serial {
    fn from(value: u64) -> Self {
        let bytes = value.to_be_bytes();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
        Serial(bytes[start..].to_vec())
    }
}

impl From<Vec<u8>> for Serial {
    fn from(bytes: Vec<u8>) -> Self {
        Serial(bytes)
    }
}

impl From<&[u8]> for Serial {
    fn from(bytes: &[u8]) -> Self {
        Serial(bytes.to_vec())
    }
}
