//! Client authentication modes for TLS servers.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{Error, Result};

/// How a TLS server treats client certificates during the handshake.
///
/// Modes are written in configuration files as their PascalCase names, e.g.
/// `"RequireAndVerifyClientCert"`, and parse case-insensitively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Authentication {
    /// No client certificate is requested.
    #[default]
    NoClientCert,
    /// A client certificate is requested but the handshake proceeds without
    /// one, and any certificate sent is not verified.
    RequestClientCert,
    /// The client must send a certificate, but it is not verified against
    /// the authority pool.
    RequireAnyClientCert,
    /// A client certificate is optional, but one that is sent must verify
    /// against the authority pool.
    VerifyClientCertIfGiven,
    /// The client must send a certificate and it must verify against the
    /// authority pool.
    RequireAndVerifyClientCert,
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Authentication::NoClientCert => "NoClientCert",
            Authentication::RequestClientCert => "RequestClientCert",
            Authentication::RequireAnyClientCert => "RequireAnyClientCert",
            Authentication::VerifyClientCertIfGiven => "VerifyClientCertIfGiven",
            Authentication::RequireAndVerifyClientCert => "RequireAndVerifyClientCert",
        };
        f.write_str(name)
    }
}

impl FromStr for Authentication {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "noclientcert" => Ok(Authentication::NoClientCert),
            "requestclientcert" => Ok(Authentication::RequestClientCert),
            "requireanyclientcert" => Ok(Authentication::RequireAnyClientCert),
            "verifyclientcertifgiven" => Ok(Authentication::VerifyClientCertIfGiven),
            "requireandverifyclientcert" => Ok(Authentication::RequireAndVerifyClientCert),
            _ => Err(Error::UnknownAuthentication(value.to_string())),
        }
    }
}

impl Serialize for Authentication {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Authentication {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
