use std::fmt;

use rsa::{
    RsaPrivateKey, RsaPublicKey,
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey},
    traits::PublicKeyParts,
};

/// Key size for every identity issued by this crate.
pub const RSA_KEY_BITS: usize = 4096;

/// An RSA key pair backing an identity.
///
/// The private half never leaves the pair except as PKCS#1 DER through
/// [`KeyPair::to_pkcs1_der`].
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate a fresh RSA-4096 key pair from the OS entropy source.
    pub fn generate() -> Result<Self, rsa::Error> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair { private, public })
    }

    /// Rebuild a pair from an existing private key (e.g. one loaded from
    /// disk).
    pub fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        KeyPair { private, public }
    }

    /// Parse a PKCS#1 DER private key.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self, rsa::pkcs1::Error> {
        let private = RsaPrivateKey::from_pkcs1_der(der)?;
        Ok(Self::from_private(private))
    }

    /// Encode the private key as PKCS#1 DER (the `RSA PRIVATE KEY` body).
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>, rsa::pkcs1::Error> {
        Ok(self.private.to_pkcs1_der()?.as_bytes().to_vec())
    }

    pub fn public(&self) -> &RsaPublicKey {
        &self.public
    }

    pub(crate) fn private(&self) -> &RsaPrivateKey {
        &self.private
    }
}

impl fmt::Debug for KeyPair {
    /// Key material is redacted; only the modulus size is shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &"RSA")
            .field("bits", &(self.private.size() * 8))
            .finish_non_exhaustive()
    }
}
