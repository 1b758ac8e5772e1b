//! Client-side TLS configuration.

use std::path::PathBuf;

use rustls::ClientConfig;
use rustls::pki_types::ServerName;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tls::{certificate_chain, certificate_pool};

/// Paths and policy for a TLS client: the authorities the server certificate
/// is verified against, an optional client certificate and key for mutual
/// TLS, and the server name presented during the handshake.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfiguration {
    /// Certificate bundle files the server certificate is verified against.
    pub authorities: Vec<PathBuf>,
    /// File holding the client's certificate chain, leaf first.
    pub certificate: Option<PathBuf>,
    /// File holding the client's private key.
    pub key: Option<PathBuf>,
    /// Name the server certificate must be valid for, a DNS name or IP
    /// address.
    pub server: Option<String>,
}

impl ClientConfiguration {
    /// Appends a certificate bundle file to the authority list.
    pub fn with_authority(mut self, path: impl Into<PathBuf>) -> Self {
        self.authorities.push(path.into());
        self
    }

    /// Sets the client certificate chain file.
    pub fn with_certificate(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate = Some(path.into());
        self
    }

    /// Sets the client private key file.
    pub fn with_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.key = Some(path.into());
        self
    }

    /// Sets the server name presented during the handshake.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Loads the named files and assembles a [`rustls::ClientConfig`].
    ///
    /// The certificate and key must be given together or not at all; when
    /// present the client offers them for mutual TLS.
    ///
    /// # Errors
    /// [`Error::Configuration`] when only one of certificate and key is
    /// present, plus the errors of [`certificate_pool`] and
    /// [`certificate_chain`].
    pub fn build(&self) -> Result<ClientConfig> {
        debug!(
            mutual = self.certificate.is_some(),
            "building client tls configuration"
        );

        let pool = certificate_pool(&self.authorities)?;
        let builder = ClientConfig::builder().with_root_certificates(pool);

        match (&self.certificate, &self.key) {
            (Some(certificate), Some(key)) => {
                let (chain, key_der) = certificate_chain(certificate, key)?;
                builder
                    .with_client_auth_cert(chain, key_der)
                    .map_err(|e| Error::tls("client certificate", e))
            }
            (None, None) => Ok(builder.with_no_client_auth()),
            _ => Err(Error::Configuration(
                "client tls requires both certificate and key paths, or neither".to_string(),
            )),
        }
    }

    /// Parses the configured server name into the form rustls dials with.
    ///
    /// # Errors
    /// [`Error::Configuration`] when no server name is set and
    /// [`Error::Tls`] when it is neither a DNS name nor an IP address.
    pub fn server_name(&self) -> Result<ServerName<'static>> {
        let server = self
            .server
            .clone()
            .ok_or_else(|| Error::Configuration("client tls requires a server name".to_string()))?;
        ServerName::try_from(server).map_err(|e| Error::tls("server name", e))
    }
}
