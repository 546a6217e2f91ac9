//! Cryptographic primitives behind the two URL schemes
//!
//! - Legacy: AES-128 in ECB mode over `{`-padded plaintext
//! - Current: HMAC-SHA1 over the canonical path
//!
//! Both tokens travel as URL-safe base64 with `=` padding kept.

pub mod legacy;
pub mod signature;

use base64::{engine::general_purpose::URL_SAFE, Engine};

use crate::constants::CIPHER_BLOCK_SIZE;
use crate::error::{Error, Result};

pub use legacy::{pad, unpad, LegacyCipher};
pub use signature::SignatureKey;

/// Derive the 16-byte legacy cipher key by repeating the raw key and truncating
///
/// Callers must reject empty keys first; an empty key yields all zeros.
pub fn derive_cipher_key(key: &[u8]) -> [u8; CIPHER_BLOCK_SIZE] {
    let mut derived = [0u8; CIPHER_BLOCK_SIZE];
    for (slot, byte) in derived.iter_mut().zip(key.iter().cycle()) {
        *slot = *byte;
    }
    derived
}

/// Base64url encode, padding retained
pub fn encode_token(data: &[u8]) -> String {
    URL_SAFE.encode(data)
}

/// Base64url decode a token taken from a URL
pub fn decode_token(token: &str) -> Result<Vec<u8>> {
    URL_SAFE
        .decode(token)
        .map_err(|e| Error::InvalidToken(format!("not url-safe base64: {}", e)))
}
