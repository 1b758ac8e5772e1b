//! TLS configuration assembled from identity material on disk.
//!
//! [`ServerConfiguration`] and [`ClientConfiguration`] mirror
//! [`IdentityConfig`](crate::config::IdentityConfig): serde structs naming
//! PEM files, with a `build` method that loads them into a ready
//! [`rustls::ServerConfig`] or [`rustls::ClientConfig`].

use std::path::{Path, PathBuf};

use rustls::RootCertStore;
use rustls::pki_types::{
    CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer,
};
use tracing::debug;

use crate::encoding;
use crate::error::{Error, Result};

pub mod authentication;
pub mod client;
pub mod server;

pub use authentication::Authentication;
pub use client::ClientConfiguration;
pub use server::ServerConfiguration;

/// Builds a root certificate store from certificate bundle files.
///
/// Every `CERTIFICATE` block in every named file is added to the store. An
/// empty path list yields an empty store; no system roots are consulted.
///
/// # Errors
/// [`Error::Io`] when a file cannot be read, [`Error::Decoding`] when a file
/// is not valid PEM, and [`Error::Tls`] when rustls rejects a certificate.
pub fn certificate_pool(paths: &[PathBuf]) -> Result<RootCertStore> {
    let mut store = RootCertStore::empty();
    for path in paths {
        let pem_bytes = std::fs::read(path).map_err(|e| Error::read(path, e))?;
        for der in encoding::certificates_from_pem(&pem_bytes)? {
            store
                .add(CertificateDer::from(der))
                .map_err(|e| Error::tls("authority pool", e))?;
        }
    }
    debug!(authorities = store.roots.len(), "built certificate pool");
    Ok(store)
}

/// Loads a certificate chain file and its private key file into the DER
/// forms rustls consumes.
///
/// The certificate file may hold a whole chain, leaf first. The key file
/// must hold exactly one private key block; `RSA PRIVATE KEY`, `PRIVATE
/// KEY`, and `EC PRIVATE KEY` labels are recognized.
///
/// # Errors
/// [`Error::Io`] when a file cannot be read, [`Error::Decoding`] when a file
/// is not valid PEM, and [`Error::Configuration`] when a file holds the
/// wrong number of blocks or an unrecognized key label.
pub fn certificate_chain(
    certificate: &Path,
    key: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let pem_bytes = std::fs::read(certificate).map_err(|e| Error::read(certificate, e))?;
    let chain: Vec<CertificateDer<'static>> = encoding::certificates_from_pem(&pem_bytes)?
        .into_iter()
        .map(CertificateDer::from)
        .collect();
    if chain.is_empty() {
        return Err(Error::Configuration(format!(
            "no certificate found in [{}]",
            certificate.display()
        )));
    }

    let pem_bytes = std::fs::read(key).map_err(|e| Error::read(key, e))?;
    let mut keys = encoding::private_keys_from_pem(&pem_bytes)?;
    let (label, der) = match keys.len() {
        1 => keys.remove(0),
        0 => {
            return Err(Error::Configuration(format!(
                "no private key found in [{}]",
                key.display()
            )));
        }
        count => {
            return Err(Error::Configuration(format!(
                "expected exactly one private key in [{}], found {count}",
                key.display()
            )));
        }
    };
    let key_der = match label.as_str() {
        "RSA PRIVATE KEY" => PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(der)),
        "PRIVATE KEY" => PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der)),
        "EC PRIVATE KEY" => PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(der)),
        other => {
            return Err(Error::Configuration(format!(
                "unsupported private key encoding [{other}] in [{}]",
                key.display()
            )));
        }
    };

    Ok((chain, key_der))
}
