//! PEM framing for certificates and private keys.
//!
//! Identities render to two block kinds: `CERTIFICATE` holding certificate
//! DER and `RSA PRIVATE KEY` holding the PKCS#1 private key. Bundle readers
//! accept files with any number of blocks and hand back the DER bodies.

use crate::error::{Error, Result};

/// PEM label for certificate blocks.
pub const CERTIFICATE: &str = "CERTIFICATE";

/// PEM label for PKCS#1 private key blocks.
pub const RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";

/// Wrap DER-encoded data in a PEM block with the provided label.
pub fn pem_block(label: &str, der: &[u8]) -> Vec<u8> {
    let block = pem::Pem::new(label, der);
    let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
    pem::encode_config(&block, config).into_bytes()
}

/// Extract the DER body of the single PEM block carrying `label`.
///
/// Fails when the input holds no block, more than one block, or a block with
/// a different label.
pub fn der_from_pem(label: &str, pem_bytes: &[u8]) -> Result<Vec<u8>> {
    let blocks = parse_blocks(pem_bytes)?;
    match blocks.as_slice() {
        [block] if block.tag() == label => Ok(block.contents().to_vec()),
        [block] => Err(Error::decoding(
            format!("pem block [{label}]"),
            format!("found [{}] instead", block.tag()),
        )),
        [] => Err(Error::decoding(
            format!("pem block [{label}]"),
            "no pem blocks found",
        )),
        _ => Err(Error::decoding(
            format!("pem block [{label}]"),
            format!("expected one block, found {}", blocks.len()),
        )),
    }
}

/// Collect the DER bodies of every `CERTIFICATE` block in a PEM bundle.
///
/// Blocks with other labels are skipped, matching how trust bundles are
/// usually consumed. An input without certificate blocks yields an empty
/// vector.
pub fn certificates_from_pem(pem_bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let blocks = parse_blocks(pem_bytes)?;
    Ok(blocks
        .iter()
        .filter(|block| block.tag() == CERTIFICATE)
        .map(|block| block.contents().to_vec())
        .collect())
}

/// Collect `(label, DER body)` for every private key block in a PEM bundle.
pub fn private_keys_from_pem(pem_bytes: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let blocks = parse_blocks(pem_bytes)?;
    Ok(blocks
        .iter()
        .filter(|block| block.tag().ends_with("PRIVATE KEY"))
        .map(|block| (block.tag().to_string(), block.contents().to_vec()))
        .collect())
}

fn parse_blocks(pem_bytes: &[u8]) -> Result<Vec<pem::Pem>> {
    pem::parse_many(pem_bytes).map_err(|e| Error::decoding("pem data", e))
}
