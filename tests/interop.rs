//! Cross-checks issued certificates against an independent parser and
//! verifies signatures with the rsa crate's verification half.

mod util;

use certchain::cert::params::{DistinguishedName, Template, Validity};
use certchain::identity::Identity;
use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::signature::Verifier;
use sha2::Sha256;
use ::time::OffsetDateTime;
use x509_parser::prelude::*;

const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";

fn subject_key_identifier(x509: &X509Certificate<'_>) -> Option<Vec<u8>> {
    x509.extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(ki) => Some(ki.0.to_vec()),
            _ => None,
        })
}

fn authority_key_identifier(x509: &X509Certificate<'_>) -> Option<Vec<u8>> {
    x509.extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                aki.key_identifier.as_ref().map(|ki| ki.0.to_vec())
            }
            _ => None,
        })
}

/// An independent parser reads back the same version, serial, names,
/// validity, and signature algorithm that issuance wrote.
#[test]
fn agrees_with_independent_parser_on_core_fields() {
    let root = util::root_identity();

    let validity = util::whole_second_validity(90);
    let template = Template::builder()
        .subject(
            DistinguishedName::builder()
                .common_name("parsed.test.internal")
                .organization("CertChain Tests")
                .build(),
        )
        .validity(validity)
        .serial_number(0x1234u64)
        .build();
    let leaf = root.issue(&template).unwrap();

    let (rest, x509) = parse_x509_certificate(leaf.certificate().as_der()).unwrap();
    assert!(rest.is_empty());

    assert_eq!(x509.version(), X509Version::V3);
    assert_eq!(
        x509.tbs_certificate.raw_serial(),
        leaf.certificate().serial_bytes()
    );
    assert_eq!(x509.tbs_certificate.raw_serial(), &[0x12u8, 0x34][..]);

    let common_name = x509
        .subject()
        .iter_common_name()
        .next()
        .unwrap()
        .as_str()
        .unwrap();
    assert_eq!(common_name, "parsed.test.internal");

    let issuer_common_name = x509
        .issuer()
        .iter_common_name()
        .next()
        .unwrap()
        .as_str()
        .unwrap();
    assert_eq!(issuer_common_name, "Test Root CA");

    assert_eq!(
        x509.validity().not_before.timestamp(),
        validity.not_before.unix_timestamp()
    );
    assert_eq!(
        x509.validity().not_after.timestamp(),
        validity.not_after.unix_timestamp()
    );

    assert_eq!(
        x509.signature_algorithm.algorithm.to_id_string(),
        SHA256_WITH_RSA
    );
    assert_eq!(
        x509.tbs_certificate.signature.algorithm.to_id_string(),
        SHA256_WITH_RSA
    );
}

/// CA and leaf certificates carry the extension layout their templates ask
/// for, and the child's authority key identifier names the parent.
#[test]
fn extension_layout_matches_issuance_flags() {
    let root = util::root_identity();
    let leaf = root
        .issue(&util::leaf_template("extensions.test.internal", 6))
        .unwrap();

    let (_, root_x509) = parse_x509_certificate(root.certificate().as_der()).unwrap();
    let (_, leaf_x509) = parse_x509_certificate(leaf.certificate().as_der()).unwrap();

    let root_bc = root_x509.basic_constraints().unwrap().unwrap();
    assert!(root_bc.critical);
    assert!(root_bc.value.ca);

    let root_ku = root_x509.key_usage().unwrap().unwrap();
    assert!(root_ku.critical);
    assert!(root_ku.value.key_cert_sign());
    assert!(root_ku.value.crl_sign());

    let root_ski = subject_key_identifier(&root_x509).unwrap();
    assert_eq!(
        root.certificate().subject_key_identifier().unwrap(),
        root_ski
    );
    assert!(authority_key_identifier(&root_x509).is_none());

    assert!(leaf_x509.basic_constraints().unwrap().is_none());
    assert!(subject_key_identifier(&leaf_x509).is_none());

    let leaf_ku = leaf_x509.key_usage().unwrap().unwrap();
    assert!(leaf_ku.critical);
    assert!(leaf_ku.value.digital_signature());
    assert!(leaf_ku.value.key_encipherment());

    let leaf_eku = leaf_x509.extended_key_usage().unwrap().unwrap();
    assert!(!leaf_eku.critical);
    assert!(leaf_eku.value.server_auth);
    assert!(leaf_eku.value.client_auth);

    assert_eq!(authority_key_identifier(&leaf_x509).unwrap(), root_ski);
}

/// Signatures verify under the issuer's public key: the root under its own
/// and the child under the root's.
#[test]
fn signatures_verify_under_the_issuer_key() {
    let root = util::root_identity();
    let leaf = root
        .issue(&util::leaf_template("verify.test.internal", 8))
        .unwrap();

    let root_key = root.certificate().rsa_public_key().unwrap();

    for identity in [&root, &leaf] {
        let (_, x509) = parse_x509_certificate(identity.certificate().as_der()).unwrap();
        let verifying_key = VerifyingKey::<Sha256>::new(root_key.clone());
        let signature = Signature::try_from(x509.signature_value.data.as_ref()).unwrap();
        verifying_key
            .verify(x509.tbs_certificate.as_ref(), &signature)
            .unwrap();
    }
}

/// Expiry beyond 2049 survives the switch to GeneralizedTime encoding.
#[test]
fn post_2049_expiry_round_trips() {
    let not_before = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
    // 2055-01-01T00:00:00Z.
    let not_after = OffsetDateTime::from_unix_timestamp(2_682_374_400).unwrap();

    let template = Template::builder()
        .subject(DistinguishedName::builder().common_name("longlived.test").build())
        .validity(Validity {
            not_before,
            not_after,
        })
        .serial_number(util::random_serial())
        .build();
    let identity = Identity::self_signed(&template).unwrap();

    assert_eq!(identity.expiration(), not_after);

    let (_, x509) = parse_x509_certificate(identity.certificate().as_der()).unwrap();
    assert_eq!(x509.validity().not_after.timestamp(), 2_682_374_400);
}
