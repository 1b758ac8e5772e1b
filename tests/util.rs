#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use certchain::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use certchain::cert::params::{DistinguishedName, Template, Validity};
use certchain::identity::Identity;
use time::{Duration, OffsetDateTime};

pub fn ca_template(common_name: &str, serial: u64) -> Template {
    Template::builder()
        .subject(
            DistinguishedName::builder()
                .common_name(common_name)
                .organization("CertChain Tests")
                .build(),
        )
        .validity(whole_second_validity(3650))
        .serial_number(serial)
        .key_usage(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
        .is_ca(true)
        .basic_constraints_valid(true)
        .build()
}

pub fn leaf_template(common_name: &str, serial: u64) -> Template {
    Template::builder()
        .subject(
            DistinguishedName::builder()
                .common_name(common_name)
                .build(),
        )
        .validity(whole_second_validity(90))
        .serial_number(serial)
        .key_usage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment)
        .extended_key_usage(vec![
            ExtendedKeyUsageOption::ServerAuth,
            ExtendedKeyUsageOption::ClientAuth,
        ])
        .build()
}

pub fn root_identity() -> Identity {
    Identity::self_signed(&ca_template("Test Root CA", 1)).unwrap()
}

/// Validity spanning `days` from now, truncated to whole seconds to match
/// the resolution of encoded certificate timestamps.
pub fn whole_second_validity(days: i64) -> Validity {
    let not_before = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
    Validity {
        not_before,
        not_after: not_before + Duration::days(days),
    }
}

pub fn random_serial() -> u64 {
    rand::random()
}

/// Writes an identity's PEM material into `dir` as `{name}.pem`,
/// `{name}-key.pem`, and `{name}-authorities.pem`, returning the paths.
pub fn write_identity(dir: &Path, name: &str, identity: &Identity) -> (PathBuf, PathBuf, PathBuf) {
    let (certificate_pem, key_pem) = identity.pem().unwrap();
    let certificate = dir.join(format!("{name}.pem"));
    let key = dir.join(format!("{name}-key.pem"));
    let authorities = dir.join(format!("{name}-authorities.pem"));
    fs::write(&certificate, certificate_pem).unwrap();
    fs::write(&key, key_pem).unwrap();
    fs::write(&authorities, identity.authorities_pem()).unwrap();
    (certificate, key, authorities)
}
