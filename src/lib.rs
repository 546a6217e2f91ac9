//! # thumbor-url
//!
//! Tamper-evident URLs for the thumbor image service.
//!
//! ```
//! use thumbor_url::{CryptoUrl, UrlOptions};
//!
//! let crypto = CryptoUrl::new("my-security-key").unwrap();
//! let options = UrlOptions::new("my.server.com/path/to/image.jpg").with_size(300, 200);
//! let url = crypto.generate(&options).unwrap();
//! assert!(url.ends_with("/300x200/my.server.com/path/to/image.jpg"));
//! ```

pub mod composer;
pub mod config;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod options;
pub mod signer;

pub use composer::{ComposeError, ThumborComposer, UrlComposer};
pub use config::{LoggingConfig, SignerConfig};
pub use error::{Error, Result};
pub use options::{CropBox, FitIn, HAlign, Scheme, Trim, TrimOrientation, UrlOptions, VAlign};
pub use signer::{unsafe_url, CryptoUrl};
