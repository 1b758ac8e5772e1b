//! # CertChain - Identity Issuance and TLS Configuration
//!
//! CertChain issues chains of X.509 identities, built entirely with
//! rustcrypto libraries, and turns the issued material into ready-to-use
//! [rustls](https://docs.rs/rustls) server and client configurations. An
//! identity bundles an exclusively owned RSA-4096 private key, the signed
//! certificate for it, and the ordered chain of authorities that vouch for
//! it, so a root can stamp out intermediates and leaves without any state
//! shared between them.
//!
//! ## Key Features
//!
//! - **Pure Rust issuance**: certificates are built and signed with
//!   rustcrypto crates, no openssl at runtime
//! - **Chain management**: every identity carries its authority chain,
//!   nearest issuer first, root last
//! - **Immutable templates**: a [`cert::params::Template`] describes a
//!   certificate once and can be reused for repeat issuance
//! - **PEM in and out**: identities render to `CERTIFICATE` and
//!   `RSA PRIVATE KEY` blocks and load back from them
//! - **TLS assembly**: serde-friendly configurations build
//!   [`rustls::ServerConfig`] and [`rustls::ClientConfig`] values directly
//!   from files on disk
//!
//! ## Quick Start
//!
//! ### Issuing a Self-Signed Root
//!
//! ```rust,no_run
//! use certchain::cert::params::{DistinguishedName, Template, Validity};
//! use certchain::identity::Identity;
//!
//! # fn main() -> certchain::error::Result<()> {
//! let subject = DistinguishedName::builder()
//!     .common_name("Acme Root CA")
//!     .organization("Acme")
//!     .country("US")
//!     .build();
//!
//! let template = Template::builder()
//!     .subject(subject)
//!     .validity(Validity::for_days(3650))
//!     .serial_number(1u64)
//!     .is_ca(true)
//!     .basic_constraints_valid(true)
//!     .build();
//!
//! let root = Identity::self_signed(&template)?;
//!
//! let (certificate_pem, key_pem) = root.pem()?;
//! println!("{}", String::from_utf8_lossy(&certificate_pem));
//! # Ok(())
//! # }
//! ```
//!
//! ### Issuing Down a Chain
//!
//! ```rust,no_run
//! use certchain::cert::extensions::ExtendedKeyUsageOption;
//! use certchain::cert::params::{DistinguishedName, Template, Validity};
//! use certchain::identity::Identity;
//!
//! # fn main() -> certchain::error::Result<()> {
//! let root = Identity::self_signed(
//!     &Template::builder()
//!         .subject(DistinguishedName::builder().common_name("Acme Root CA").build())
//!         .validity(Validity::for_days(3650))
//!         .serial_number(1u64)
//!         .is_ca(true)
//!         .basic_constraints_valid(true)
//!         .build(),
//! )?;
//!
//! let server = root.issue(
//!     &Template::builder()
//!         .subject(DistinguishedName::builder().common_name("server.acme.internal").build())
//!         .validity(Validity::for_days(90))
//!         .serial_number(2u64)
//!         .extended_key_usage(vec![ExtendedKeyUsageOption::ServerAuth])
//!         .build(),
//! )?;
//!
//! // The chain below the server identity is the root's certificate.
//! assert_eq!(server.authorities().len(), 1);
//! println!("{:x}", server.fingerprint::<sha2::Sha256>());
//! # Ok(())
//! # }
//! ```
//!
//! ### Building TLS Configurations from Files
//!
//! ```rust,no_run
//! use certchain::tls::{Authentication, ServerConfiguration};
//!
//! # fn main() -> certchain::error::Result<()> {
//! let server_config = ServerConfiguration::default()
//!     .with_certificate("tls/server.pem")
//!     .with_key("tls/server-key.pem")
//!     .with_authority("tls/authorities.pem")
//!     .with_authentication(Authentication::RequireAndVerifyClientCert)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`error::Result`]. Issuance errors carry the
//! subject common name of the template involved, so a failure while building
//! a deep chain names the certificate it belongs to:
//!
//! ```text
//! error signing certificate for [server.acme.internal]: notBefore is not earlier than notAfter
//! ```
//!
//! ## Module Organization
//!
//! - [`identity`]: issuing identities and walking their chains
//! - [`cert`]: parsed certificates, templates, and pkix extensions
//! - [`key`]: RSA-4096 key pairs
//! - [`encoding`]: PEM framing over DER payloads
//! - [`config`]: reassembling identities from files
//! - [`tls`]: rustls server and client configuration
//! - [`error`]: error types shared across the crate

pub mod cert;
pub mod config;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod key;
mod signer;
pub mod tls;
