use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while issuing, encoding, or loading
/// identities.
///
/// Issuance errors carry the subject common name of the template involved so
/// a failure deep in a chain build names the certificate it belongs to.
#[derive(Debug, Error)]
pub enum Error {
    /// RSA key pair generation failed.
    #[error("error generating private key for [{common_name}]: {reason}")]
    KeyGeneration { common_name: String, reason: String },

    /// The certificate descriptor was rejected by the signing routine.
    #[error("error signing certificate for [{common_name}]: {reason}")]
    Signing { common_name: String, reason: String },

    /// Freshly signed certificate bytes failed to re-parse.
    #[error("error parsing certificate for [{common_name}]: {reason}")]
    Parsing { common_name: String, reason: String },

    /// PEM block construction failed.
    #[error("error pem encoding {context}: {reason}")]
    Encoding { context: String, reason: String },

    /// A file backing a configuration could not be read.
    #[error("error reading [{}]", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PEM or DER material failed to decode.
    #[error("error decoding {context}: {reason}")]
    Decoding { context: String, reason: String },

    /// A configuration is structurally invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A client authentication mode string was not recognized.
    #[error("unknown authentication mode [{0}]")]
    UnknownAuthentication(String),

    /// rustls rejected the assembled TLS configuration.
    #[error("error building tls configuration for {context}: {reason}")]
    Tls { context: String, reason: String },
}

impl Error {
    pub(crate) fn decoding(context: impl Into<String>, reason: impl ToString) -> Self {
        Error::Decoding {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn tls(context: impl Into<String>, reason: impl ToString) -> Self {
        Error::Tls {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
