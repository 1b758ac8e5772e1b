mod util;

use std::fs;

use certchain::error::Error;
use certchain::tls::{self, Authentication, ClientConfiguration, ServerConfiguration};
use rustls::pki_types::PrivateKeyDer;
use tempfile::tempdir;

/// Identities written to disk assemble into a server configuration under
/// every client authentication mode.
#[test]
fn server_configurations_build_for_every_mode() {
    let root = util::root_identity();
    let server = root
        .issue(&util::leaf_template("server.test.internal", 2))
        .unwrap();

    let dir = tempdir().unwrap();
    let (certificate, key, authorities) = util::write_identity(dir.path(), "server", &server);

    let base = ServerConfiguration::default()
        .with_authority(&authorities)
        .with_certificate(&certificate)
        .with_key(&key);

    assert!(base.clone().build().is_ok());

    for mode in [
        Authentication::RequestClientCert,
        Authentication::RequireAnyClientCert,
        Authentication::VerifyClientCertIfGiven,
        Authentication::RequireAndVerifyClientCert,
    ] {
        let config = base.clone().with_authentication(mode);
        assert!(config.build().is_ok(), "mode {mode} failed to build");
    }
}

/// Requiring client certificates with no authorities leaves nothing to
/// verify against, so the verifier refuses to assemble.
#[test]
fn requiring_client_certificates_needs_a_pool() {
    let root = util::root_identity();

    let dir = tempdir().unwrap();
    let (certificate, key, _) = util::write_identity(dir.path(), "root", &root);

    let config = ServerConfiguration::default()
        .with_certificate(certificate)
        .with_key(key)
        .with_authentication(Authentication::RequireAndVerifyClientCert);

    let error = config.build().unwrap_err();
    assert!(matches!(error, Error::Tls { .. }));
}

#[test]
fn client_configuration_builds_with_and_without_certificate() {
    let root = util::root_identity();
    let client = root
        .issue(&util::leaf_template("client.test.internal", 3))
        .unwrap();

    let dir = tempdir().unwrap();
    let (certificate, key, authorities) = util::write_identity(dir.path(), "client", &client);

    let plain = ClientConfiguration::default().with_authority(&authorities);
    assert!(plain.build().is_ok());

    let mutual = ClientConfiguration::default()
        .with_authority(&authorities)
        .with_certificate(&certificate)
        .with_key(&key)
        .with_server("server.test.internal");
    assert!(mutual.build().is_ok());
    assert!(mutual.server_name().is_ok());
}

#[test]
fn certificate_pool_loads_every_block_in_a_bundle() {
    let root = util::root_identity();
    let intermediate = root.issue(&util::ca_template("Pool Issuing CA", 2)).unwrap();
    let leaf = intermediate
        .issue(&util::leaf_template("pool.test.internal", 3))
        .unwrap();

    let dir = tempdir().unwrap();
    let (_, _, authorities) = util::write_identity(dir.path(), "leaf", &leaf);

    let pool = tls::certificate_pool(&[authorities]).unwrap();
    assert_eq!(pool.roots.len(), 2);
}

/// A chain file may carry the leaf and its authorities together; the key
/// comes back in its PKCS#1 form.
#[test]
fn certificate_chain_reads_leaf_first_bundles() {
    let root = util::root_identity();
    let server = root
        .issue(&util::leaf_template("chain.test.internal", 4))
        .unwrap();

    let dir = tempdir().unwrap();
    let (certificate_pem, key_pem) = server.pem().unwrap();

    let chain_path = dir.path().join("chain.pem");
    let mut bundle = certificate_pem;
    bundle.extend_from_slice(&server.authorities_pem());
    fs::write(&chain_path, bundle).unwrap();

    let key_path = dir.path().join("key.pem");
    fs::write(&key_path, key_pem).unwrap();

    let (chain, key) = tls::certificate_chain(&chain_path, &key_path).unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].as_ref(), server.certificate().as_der());
    assert!(matches!(key, PrivateKeyDer::Pkcs1(_)));
}

#[test]
fn server_configuration_deserializes_authentication_strings() {
    let json = r#"{"certificate": "tls/cert.pem", "key": "tls/key.pem", "authentication": "requireandverifyclientcert"}"#;
    let config: ServerConfiguration = serde_json::from_str(json).unwrap();
    assert_eq!(
        config.authentication,
        Authentication::RequireAndVerifyClientCert
    );

    let unknown = r#"{"authentication": "Mutual"}"#;
    assert!(serde_json::from_str::<ServerConfiguration>(unknown).is_err());
}
