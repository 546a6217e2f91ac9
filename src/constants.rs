// Constants module - fixed values of the thumbor URL schemes
//
// These are wire-level constants shared with the image service that
// verifies the URLs. Changing any of them breaks interoperability.

// =============================================================================
// Legacy scheme
// =============================================================================

/// Block size of the legacy cipher, and length of the derived cipher key
pub const CIPHER_BLOCK_SIZE: usize = 16;

/// Filler character appended to legacy plaintext before encryption
pub const PAD_CHAR: u8 = b'{';

// =============================================================================
// URL layout
// =============================================================================

/// Path segment used in place of a token for unauthenticated URLs
pub const UNSAFE_SEGMENT: &str = "unsafe";

/// Prefix of the filter segment
pub const FILTERS_SEGMENT: &str = "filters";

// =============================================================================
// Configuration defaults
// =============================================================================

/// Default log level when neither config nor RUST_LOG sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";
