//! File-backed identity configuration.
//!
//! An [`IdentityConfig`] names the PEM files an identity was persisted to and
//! reassembles the [`Identity`](crate::identity::Identity) from them. The
//! struct derives serde traits so it can sit inside a larger application
//! configuration in JSON or YAML.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cert::Certificate;
use crate::encoding;
use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::key::KeyPair;

/// Paths to the PEM files holding an identity's certificate, private key,
/// and authority chain.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Certificate bundle files forming the authority chain, nearest issuer
    /// first. May be empty for a self-signed identity.
    #[serde(default)]
    pub authorities: Vec<PathBuf>,
    /// File holding exactly one `CERTIFICATE` block.
    pub certificate: PathBuf,
    /// File holding exactly one `RSA PRIVATE KEY` block matching the
    /// certificate's public key.
    pub key: PathBuf,
}

impl IdentityConfig {
    /// Loads the named files and reassembles the identity.
    ///
    /// # Errors
    /// [`Error::Io`] when a file cannot be read, [`Error::Decoding`] when
    /// PEM or DER contents are malformed, and [`Error::Configuration`] when
    /// a file holds the wrong number of blocks, the key uses an unsupported
    /// encoding, or the key does not match the certificate.
    pub fn build(&self) -> Result<Identity> {
        debug!(
            certificate = %self.certificate.display(),
            key = %self.key.display(),
            "building identity from configuration files"
        );

        let mut authorities = Vec::new();
        for path in &self.authorities {
            let pem_bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
            for der in encoding::certificates_from_pem(&pem_bytes)? {
                let authority = Certificate::from_der(der)
                    .map_err(|e| Error::decoding("authority certificate", e))?;
                authorities.push(authority);
            }
        }

        let certificate = self.read_certificate()?;
        let key = self.read_key()?;

        if certificate.rsa_public_key()? != *key.public() {
            return Err(Error::Configuration(format!(
                "private key [{}] does not match certificate [{}]",
                self.key.display(),
                self.certificate.display()
            )));
        }

        Ok(Identity::from_parts(authorities, certificate, key))
    }

    fn read_certificate(&self) -> Result<Certificate> {
        let pem_bytes =
            fs::read(&self.certificate).map_err(|e| Error::read(&self.certificate, e))?;
        let mut certificates = encoding::certificates_from_pem(&pem_bytes)?;
        let der = match certificates.len() {
            1 => certificates.remove(0),
            0 => {
                return Err(Error::Configuration(format!(
                    "no certificate found in [{}]",
                    self.certificate.display()
                )));
            }
            count => {
                return Err(Error::Configuration(format!(
                    "expected exactly one certificate in [{}], found {count}",
                    self.certificate.display()
                )));
            }
        };
        Certificate::from_der(der).map_err(|e| Error::decoding("certificate", e))
    }

    fn read_key(&self) -> Result<KeyPair> {
        let pem_bytes = fs::read(&self.key).map_err(|e| Error::read(&self.key, e))?;
        let mut keys = encoding::private_keys_from_pem(&pem_bytes)?;
        let (label, der) = match keys.len() {
            1 => keys.remove(0),
            0 => {
                return Err(Error::Configuration(format!(
                    "no private key found in [{}]",
                    self.key.display()
                )));
            }
            count => {
                return Err(Error::Configuration(format!(
                    "expected exactly one private key in [{}], found {count}",
                    self.key.display()
                )));
            }
        };
        if label != encoding::RSA_PRIVATE_KEY {
            return Err(Error::Configuration(format!(
                "unsupported private key encoding [{label}] in [{}]",
                self.key.display()
            )));
        }
        KeyPair::from_pkcs1_der(&der).map_err(|e| Error::decoding("private key", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_authorities_defaulted() {
        let config: IdentityConfig =
            serde_json::from_str(r#"{"certificate": "tls/cert.pem", "key": "tls/key.pem"}"#)
                .unwrap();

        assert!(config.authorities.is_empty());
        assert_eq!(config.certificate, PathBuf::from("tls/cert.pem"));
        assert_eq!(config.key, PathBuf::from("tls/key.pem"));
    }

    #[test]
    fn serde_round_trip_preserves_paths() {
        let config = IdentityConfig {
            authorities: vec![PathBuf::from("ca/root.pem"), PathBuf::from("ca/sub.pem")],
            certificate: PathBuf::from("tls/cert.pem"),
            key: PathBuf::from("tls/key.pem"),
        };

        let json = serde_json::to_string(&config).unwrap();
        let restored: IdentityConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let config = IdentityConfig {
            authorities: Vec::new(),
            certificate: PathBuf::from("/nonexistent/cert.pem"),
            key: PathBuf::from("/nonexistent/key.pem"),
        };

        let error = config.build().unwrap_err();
        assert!(error.to_string().contains("/nonexistent/cert.pem"));
    }
}
