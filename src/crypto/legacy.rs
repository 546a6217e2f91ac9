//! Legacy scheme cipher
//!
//! AES-128 in ECB mode with no IV and no authentication. Kept byte-for-byte
//! for URLs consumed by existing legacy verifiers; new features should sign
//! instead.

use std::fmt;

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

use crate::constants::{CIPHER_BLOCK_SIZE, PAD_CHAR};
use crate::error::{Error, Result};

/// Append `16 - len % 16` filler characters
///
/// Block-aligned input (including empty input) gets a full extra block.
pub fn pad(plaintext: &[u8]) -> Vec<u8> {
    let fill = CIPHER_BLOCK_SIZE - plaintext.len() % CIPHER_BLOCK_SIZE;
    let mut padded = Vec::with_capacity(plaintext.len() + fill);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + fill, PAD_CHAR);
    padded
}

/// Strip trailing filler characters
pub fn unpad(padded: &[u8]) -> &[u8] {
    let end = padded
        .iter()
        .rposition(|b| *b != PAD_CHAR)
        .map_or(0, |i| i + 1);
    &padded[..end]
}

/// AES-128-ECB keyed with the derived legacy key
#[derive(Clone)]
pub struct LegacyCipher {
    cipher: Aes128,
}

impl LegacyCipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = Aes128::new_from_slice(key)
            .map_err(|e| Error::Configuration(format!("legacy cipher rejected key: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Pad and encrypt
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut buffer = pad(plaintext);
        if buffer.len() % CIPHER_BLOCK_SIZE != 0 {
            return Err(Error::Encryption(format!(
                "padded length {} is not a multiple of {}",
                buffer.len(),
                CIPHER_BLOCK_SIZE
            )));
        }

        for block in buffer.chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            self.cipher
                .encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(buffer)
    }

    /// Decrypt and strip padding
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() || ciphertext.len() % CIPHER_BLOCK_SIZE != 0 {
            return Err(Error::InvalidToken(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ciphertext.len(),
                CIPHER_BLOCK_SIZE
            )));
        }

        let mut buffer = ciphertext.to_vec();
        for block in buffer.chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            self.cipher
                .decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(unpad(&buffer).to_vec())
    }
}

impl fmt::Debug for LegacyCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyCipher").finish_non_exhaustive()
    }
}
