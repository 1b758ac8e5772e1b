//! Identities: an RSA key pair bound to a signed certificate, plus the
//! ordered chain of certificates that vouch for it.

use sha2::digest::{Digest, Output};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::cert::Certificate;
use crate::cert::params::{DistinguishedName, Template};
use crate::encoding;
use crate::error::{Error, Result};
use crate::key::KeyPair;
use crate::signer::{self, Descriptor, IssuerView};

/// A private key, its signed certificate, and the authority chain leading
/// back to a self-signed root.
///
/// Identities are immutable once constructed: issuing a child builds a brand
/// new `Identity` and leaves the parent untouched, so one parent may serve
/// concurrent issuance from multiple threads. The private key is exclusively
/// owned and leaves the value only through [`Identity::pem`].
#[derive(Debug)]
pub struct Identity {
    /// Chain of issuing certificates, nearest issuer first, root last.
    authorities: Vec<Certificate>,
    /// This identity's own certificate.
    certificate: Certificate,
    /// The private key matching `certificate`'s public key.
    key: KeyPair,
}

impl Identity {
    /// Creates a self-signed root identity from a template.
    ///
    /// Generates a fresh RSA-4096 key pair and signs the template's
    /// descriptor with it, issuer equal to subject. The resulting identity
    /// has an empty authority chain.
    ///
    /// # Errors
    /// [`Error::KeyGeneration`] when key material cannot be produced,
    /// [`Error::Signing`] when the template is structurally invalid, and
    /// [`Error::Parsing`] when the signed bytes fail the re-parse check.
    /// All carry the template's subject common name.
    pub fn self_signed(template: &Template) -> Result<Identity> {
        debug!(subject = %template.subject, "generating rsa key pair");
        let key = KeyPair::generate()
            .map_err(|e| key_generation_error(&template.subject.common_name, e))?;

        let descriptor = Descriptor::from_template(template)?;
        let issuer = IssuerView::self_signed(&descriptor);
        let certificate = signer::sign(&descriptor, issuer, key.public(), key.private())?;

        info!(
            subject = %certificate.subject(),
            serial = ?certificate.serial_bytes(),
            "issued self-signed root identity"
        );
        Ok(Identity {
            authorities: Vec::new(),
            certificate,
            key,
        })
    }

    /// Issues a child identity signed by this one.
    ///
    /// Generates a fresh RSA-4096 key pair for the child and signs the
    /// template's descriptor with this identity's key. The child's authority
    /// chain is this identity's certificate followed by this identity's own
    /// chain, so the chain grows by exactly one per issuance and the root
    /// stays last.
    ///
    /// # Errors
    /// Identical to [`Identity::self_signed`], wrapped with the child
    /// template's subject common name.
    pub fn issue(&self, template: &Template) -> Result<Identity> {
        debug!(subject = %template.subject, "generating rsa key pair");
        let key = KeyPair::generate()
            .map_err(|e| key_generation_error(&template.subject.common_name, e))?;

        let descriptor = Descriptor::from_template(template)?;
        let issuer = IssuerView::for_certificate(&self.certificate);
        let certificate = signer::sign(&descriptor, issuer, key.public(), self.key.private())?;

        let mut authorities = Vec::with_capacity(self.authorities.len() + 1);
        authorities.push(self.certificate.clone());
        authorities.extend(self.authorities.iter().cloned());

        info!(
            subject = %certificate.subject(),
            issuer = %self.certificate.subject(),
            serial = ?certificate.serial_bytes(),
            chain_depth = authorities.len(),
            "issued child identity"
        );
        Ok(Identity {
            authorities,
            certificate,
            key,
        })
    }

    /// Reassembles an identity from previously issued parts, e.g. material
    /// loaded from disk. The caller vouches that `key` matches
    /// `certificate` and that `authorities` is ordered nearest issuer first.
    pub fn from_parts(
        authorities: Vec<Certificate>,
        certificate: Certificate,
        key: KeyPair,
    ) -> Identity {
        Identity {
            authorities,
            certificate,
            key,
        }
    }

    /// This identity's own certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// The authority chain, nearest issuer first, root last. Empty for a
    /// self-signed root.
    pub fn authorities(&self) -> &[Certificate] {
        &self.authorities
    }

    /// The leaf certificate's `notAfter` timestamp, exactly as encoded.
    pub fn expiration(&self) -> OffsetDateTime {
        self.certificate.not_after()
    }

    /// The leaf certificate's subject distinguished name.
    pub fn subject(&self) -> DistinguishedName {
        self.certificate.subject()
    }

    /// Digest of the leaf certificate's raw DER bytes under a caller-chosen
    /// hash.
    ///
    /// ```rust,no_run
    /// # use certchain::cert::params::{DistinguishedName, Template, Validity};
    /// # use certchain::identity::Identity;
    /// # fn main() -> certchain::error::Result<()> {
    /// # let template = Template::builder()
    /// #     .subject(DistinguishedName::builder().common_name("root").build())
    /// #     .validity(Validity::for_days(30))
    /// #     .serial_number(1u64)
    /// #     .build();
    /// let identity = Identity::self_signed(&template)?;
    /// let digest = identity.fingerprint::<sha2::Sha256>();
    /// println!("{digest:x}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn fingerprint<D: Digest>(&self) -> Output<D> {
        D::digest(self.certificate.as_der())
    }

    /// Renders the identity as two PEM blocks: the leaf certificate and the
    /// PKCS#1 private key.
    ///
    /// # Errors
    /// [`Error::Encoding`] when the private key cannot be serialized.
    pub fn pem(&self) -> Result<(Vec<u8>, Vec<u8>)> {
        let certificate_pem = self.certificate.to_pem();
        let key_der = self.key.to_pkcs1_der().map_err(|e| Error::Encoding {
            context: "private key".to_string(),
            reason: e.to_string(),
        })?;
        let key_pem = encoding::pem_block(encoding::RSA_PRIVATE_KEY, &key_der);
        Ok((certificate_pem, key_pem))
    }

    /// Renders the authority chain as a concatenated PEM bundle in chain
    /// order, the shape trust-pool builders consume.
    pub fn authorities_pem(&self) -> Vec<u8> {
        let mut bundle = Vec::new();
        for authority in &self.authorities {
            bundle.extend_from_slice(&authority.to_pem());
        }
        bundle
    }
}

fn key_generation_error(common_name: &str, source: rsa::Error) -> Error {
    Error::KeyGeneration {
        common_name: common_name.to_string(),
        reason: source.to_string(),
    }
}
