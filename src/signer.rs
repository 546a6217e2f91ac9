//! Thumbor URL signer
//!
//! [`CryptoUrl`] holds the key material for both URL schemes and turns
//! [`UrlOptions`] into a path ready to append to the image service host:
//!
//! ```text
//! unsafe:  /unsafe/<canonical path>
//! legacy:  /<base64url(AES-ECB(pad(url_for)))>/<image reference>
//! signed:  /<base64url(HMAC-SHA1(plain_image_url))>/<canonical path>
//! ```
//!
//! The signer is read-only after construction and can be shared across
//! threads behind an `Arc` or a plain reference.

use std::fmt;

use crate::composer::{ThumborComposer, UrlComposer};
use crate::crypto::{decode_token, derive_cipher_key, encode_token, LegacyCipher, SignatureKey};
use crate::error::{Error, Result};
use crate::options::{Scheme, UrlOptions};

/// Generates unsafe, legacy-encrypted and signed thumbor URLs
#[derive(Clone)]
pub struct CryptoUrl<C = ThumborComposer> {
    cipher: LegacyCipher,
    signature_key: SignatureKey,
    composer: C,
}

impl CryptoUrl<ThumborComposer> {
    /// Build a signer using the standard thumbor path grammar
    ///
    /// Both primitives are keyed here, so a key they reject fails now
    /// rather than on the first generated URL.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self> {
        Self::with_composer(key, ThumborComposer::new())
    }
}

impl<C: UrlComposer> CryptoUrl<C> {
    /// Build a signer around a custom canonicalization composer
    pub fn with_composer(key: impl AsRef<[u8]>, composer: C) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(Error::Configuration(
                "security key must not be empty".to_string(),
            ));
        }

        let cipher = LegacyCipher::new(&derive_cipher_key(key))?;
        let signature_key = SignatureKey::new(key)?;

        tracing::debug!(key_length = key.len(), "URL signer initialized");

        Ok(Self {
            cipher,
            signature_key,
            composer,
        })
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Generate a URL path, picking the scheme from the option flags
    pub fn generate(&self, options: &UrlOptions) -> Result<String> {
        let scheme = options.scheme();
        let url = match scheme {
            Scheme::Unsafe => self.generate_unsafe(options),
            Scheme::Legacy => self.generate_old(options),
            Scheme::Signed => self.generate_new(options),
        }?;

        tracing::debug!(scheme = %scheme, url_length = url.len(), "Generated thumbor URL");
        Ok(url)
    }

    /// `/unsafe/<path>` with no key material involved
    pub fn generate_unsafe(&self, options: &UrlOptions) -> Result<String> {
        Ok(self.composer.unsafe_url(options)?)
    }

    /// Legacy scheme: encrypted options, image reference in the clear
    pub fn generate_old(&self, options: &UrlOptions) -> Result<String> {
        let url = self.composer.url_for(options)?;
        let encrypted = self.cipher.encrypt(url.as_bytes())?;
        Ok(format!("/{}/{}", encode_token(&encrypted), options.image_url))
    }

    /// Current scheme: canonical path signed with HMAC-SHA1
    pub fn generate_new(&self, options: &UrlOptions) -> Result<String> {
        let url = self.composer.plain_image_url(options)?;
        let signature = self.signature_key.sign(url.as_bytes());
        Ok(format!("/{}/{}", encode_token(&signature), url))
    }

    /// Recover the canonical plaintext from a legacy token
    pub fn decrypt_old(&self, token: &str) -> Result<String> {
        let ciphertext = decode_token(token)?;
        let plaintext = self.cipher.decrypt(&ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|_| Error::InvalidToken("decrypted token is not UTF-8".to_string()))
    }

    /// Check a signed-scheme signature against the canonical path it covers
    pub fn validate_signature(&self, signature: &str, path: &str) -> Result<()> {
        let tag = decode_token(signature).map_err(|_| Error::InvalidSignature)?;
        if self.signature_key.verify(path.as_bytes(), &tag) {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }

    /// Split a signed-scheme URL path and validate it
    ///
    /// Accepts paths with or without the leading `/`.
    pub fn validate_url(&self, url: &str) -> Result<()> {
        let trimmed = url.strip_prefix('/').unwrap_or(url);
        let (signature, path) = trimmed.split_once('/').ok_or(Error::InvalidSignature)?;
        self.validate_signature(signature, path)
    }
}

/// Unsafe URL without a signer, for callers that hold no key at all
pub fn unsafe_url(options: &UrlOptions) -> Result<String> {
    Ok(ThumborComposer::new().unsafe_url(options)?)
}

impl<C> fmt::Debug for CryptoUrl<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoUrl").finish_non_exhaustive()
    }
}
