//! HMAC-SHA256 helpers shared by the cloud request signers

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::core::errors::{Result, TranslationError};

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Raw HMAC-SHA256 of `data` under `key`
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| TranslationError::InternalError(
        format!("HMAC key rejected: {}", e),
    ))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// `host[:port]` of an endpoint URL, as sent in the Host header
pub fn host_of(url: &reqwest::Url) -> Result<String> {
    let host = url.host_str().ok_or_else(|| TranslationError::ConfigError {
        message: format!("Endpoint has no host: {}", url),
    })?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
