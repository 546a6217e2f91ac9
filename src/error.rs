// Error types module

use thiserror::Error;

use crate::composer::ComposeError;

/// Centralized error type for URL generation
///
/// Construction problems surface as `Configuration`, the legacy and current
/// schemes each have their own failure variant, and canonicalization errors
/// pass through untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty key, rejected key material, or invalid configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Legacy block cipher rejected the key or input
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Keyed digest could not be computed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Options could not be turned into a canonical path
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Token is not valid base64, not block aligned, or not UTF-8 once decrypted
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Recomputed signature does not match the one in the URL
    #[error("Invalid or missing URL signature")]
    InvalidSignature,
}

pub type Result<T> = std::result::Result<T, Error>;
