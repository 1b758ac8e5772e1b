//! Server-side TLS configuration.

use std::path::PathBuf;
use std::sync::Arc;

use rustls::ServerConfig;
use rustls::server::WebPkiClientVerifier;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tls::authentication::Authentication;
use crate::tls::{certificate_chain, certificate_pool};

/// Paths and policy for a TLS server: its certificate chain, private key,
/// the authorities client certificates are verified against, and the client
/// authentication mode.
///
/// All fields have serde defaults so a configuration file may name only what
/// it needs. [`build`](ServerConfiguration::build) requires the certificate
/// and key to be present.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfiguration {
    /// Certificate bundle files clients are verified against.
    pub authorities: Vec<PathBuf>,
    /// File holding the server's certificate chain, leaf first.
    pub certificate: Option<PathBuf>,
    /// File holding the server's private key.
    pub key: Option<PathBuf>,
    /// How client certificates are treated during the handshake.
    pub authentication: Authentication,
}

impl ServerConfiguration {
    /// Appends a certificate bundle file to the authority list.
    pub fn with_authority(mut self, path: impl Into<PathBuf>) -> Self {
        self.authorities.push(path.into());
        self
    }

    /// Sets the server certificate chain file.
    pub fn with_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    /// Sets the server private key file.
    pub fn with_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.key = Some(path.into());
        self
    }

    /// Sets the client authentication mode.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = authentication;
        self
    }

    /// Loads the named files and assembles a [`rustls::ServerConfig`].
    ///
    /// Modes other than [`Authentication::NoClientCert`] install a webpki
    /// client verifier over the authority pool. The two modes that tolerate
    /// a missing client certificate, [`Authentication::RequestClientCert`]
    /// and [`Authentication::VerifyClientCertIfGiven`], allow the handshake
    /// to continue unauthenticated; certificates that are sent are always
    /// verified against the pool.
    ///
    /// # Errors
    /// [`Error::Configuration`] when the certificate or key path is missing,
    /// plus the errors of [`certificate_pool`] and [`certificate_chain`].
    /// Requiring client certificates with an empty authority list fails,
    /// since there is nothing to verify against.
    pub fn build(&self) -> Result<ServerConfig> {
        debug!(authentication = %self.authentication, "building server tls configuration");

        let certificate = self.certificate.as_ref().ok_or_else(|| {
            Error::Configuration("server tls requires a certificate path".to_string())
        })?;
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::Configuration("server tls requires a key path".to_string()))?;
        let (chain, key_der) = certificate_chain(certificate, key)?;

        let builder = match self.authentication {
            Authentication::NoClientCert => ServerConfig::builder().with_no_client_auth(),
            mode => {
                let pool = certificate_pool(&self.authorities)?;
                let verifier = WebPkiClientVerifier::builder(Arc::new(pool));
                let verifier = match mode {
                    Authentication::RequestClientCert
                    | Authentication::VerifyClientCertIfGiven => verifier.allow_unauthenticated(),
                    _ => verifier,
                };
                let verifier = verifier
                    .build()
                    .map_err(|e| Error::tls("client verifier", e))?;
                ServerConfig::builder().with_client_cert_verifier(verifier)
            }
        };

        builder
            .with_single_cert(chain, key_der)
            .map_err(|e| Error::tls("server certificate", e))
    }
}
