//! Issues a root, an intermediate, and a server identity, then prints the
//! server's PEM material to stdout and a short summary to stderr.
//!
//! Run with `cargo run --example issue`.

use certchain::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use certchain::cert::params::{DistinguishedName, Template, Validity};
use certchain::identity::Identity;

fn main() -> certchain::error::Result<()> {
    let root = Identity::self_signed(
        &Template::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name("Demo Root CA")
                    .organization("Demo")
                    .build(),
            )
            .validity(Validity::for_days(3650))
            .serial_number(1u64)
            .key_usage(KeyUsages::KeyCertSign)
            .is_ca(true)
            .basic_constraints_valid(true)
            .build(),
    )?;

    let intermediate = root.issue(
        &Template::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name("Demo Issuing CA")
                    .organization("Demo")
                    .build(),
            )
            .validity(Validity::for_days(1825))
            .serial_number(2u64)
            .key_usage(KeyUsages::KeyCertSign)
            .is_ca(true)
            .basic_constraints_valid(true)
            .build(),
    )?;

    let server = intermediate.issue(
        &Template::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name("server.demo.internal")
                    .build(),
            )
            .validity(Validity::for_days(90))
            .serial_number(3u64)
            .key_usage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment)
            .extended_key_usage(vec![ExtendedKeyUsageOption::ServerAuth])
            .build(),
    )?;

    let (certificate_pem, key_pem) = server.pem()?;
    print!("{}", String::from_utf8_lossy(&certificate_pem));
    print!("{}", String::from_utf8_lossy(&server.authorities_pem()));
    print!("{}", String::from_utf8_lossy(&key_pem));

    eprintln!("subject:      {}", server.subject());
    eprintln!("expires:      {}", server.expiration());
    eprintln!("sha-256:      {:x}", server.fingerprint::<sha2::Sha256>());
    eprintln!("chain length: {}", server.authorities().len());

    Ok(())
}
