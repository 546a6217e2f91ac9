//! Current scheme signature: HMAC-SHA1 over the canonical path

use std::fmt;

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// Key-seeded HMAC-SHA1 state
///
/// Every call clones the seeded template, so no digest state is ever shared
/// between messages or threads.
#[derive(Clone)]
pub struct SignatureKey {
    template: HmacSha1,
}

impl SignatureKey {
    pub fn new(key: &[u8]) -> Result<Self> {
        let template = HmacSha1::new_from_slice(key)
            .map_err(|e| Error::Configuration(format!("HMAC-SHA1 rejected key: {}", e)))?;
        Ok(Self { template })
    }

    /// Raw 20-byte digest of `message`
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.template.clone();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Constant-time check of `tag` against the digest of `message`
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.template.clone();
        mac.update(message);
        mac.verify_slice(tag).is_ok()
    }
}

impl fmt::Debug for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureKey").finish_non_exhaustive()
    }
}
