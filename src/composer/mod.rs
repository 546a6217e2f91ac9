//! Canonical path composition
//!
//! Turns [`UrlOptions`] into the plaintext path the image service parses.
//! The signer only depends on the [`UrlComposer`] trait, so any composer that
//! produces byte-stable output for identical options can be plugged in.
//!
//! Segment order produced by [`ThumborComposer`]:
//! ```text
//! meta/trim/LxT:RxB/fit-in/WxH/halign/valign/smart/filters:f1:f2/<image>
//! ```
//! Each segment is omitted when the corresponding option is at its default.

use md5::{Digest, Md5};
use thiserror::Error;

use crate::constants::{FILTERS_SEGMENT, UNSAFE_SEGMENT};
use crate::options::{HAlign, UrlOptions, VAlign};

/// Errors raised while composing a canonical path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("The image_url option is mandatory")]
    MissingImageUrl,

    #[error("When using fit-in or full-fit-in, you must specify width and/or height")]
    FitInWithoutDimensions,

    #[error("Invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },
}

impl ComposeError {
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        ComposeError::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// Produces the canonical plaintext paths consumed by the signer
///
/// Implementations must be deterministic: identical options give
/// byte-identical output for the lifetime of the signer.
pub trait UrlComposer: Send + Sync {
    /// Path for the signed scheme, image reference inline
    fn plain_image_url(&self, options: &UrlOptions) -> Result<String, ComposeError>;

    /// Path for the legacy scheme; the caller appends the reference itself
    fn url_for(&self, options: &UrlOptions) -> Result<String, ComposeError>;

    /// Complete unauthenticated path, `/unsafe/` followed by the plain path
    fn unsafe_url(&self, options: &UrlOptions) -> Result<String, ComposeError> {
        Ok(format!(
            "/{}/{}",
            UNSAFE_SEGMENT,
            self.plain_image_url(options)?
        ))
    }
}

/// Composer implementing the thumbor URL grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct ThumborComposer;

impl ThumborComposer {
    pub fn new() -> Self {
        Self
    }

    /// Option segments shared by both schemes, image reference excluded
    fn url_parts(&self, options: &UrlOptions) -> Result<Vec<String>, ComposeError> {
        if options.image_url.is_empty() {
            return Err(ComposeError::MissingImageUrl);
        }

        let mut parts = Vec::new();

        if options.meta {
            parts.push("meta".to_string());
        }

        if let Some(trim) = options.trim {
            let mut bits = vec!["trim".to_string()];
            if trim.orientation.is_some() || trim.tolerance.is_some() {
                bits.push(
                    trim.orientation
                        .map(|o| o.as_str().to_string())
                        .unwrap_or_default(),
                );
                if let Some(tolerance) = trim.tolerance.filter(|t| *t > 0) {
                    bits.push(tolerance.to_string());
                }
            }
            parts.push(bits.join(":"));
        }

        if let Some(crop) = options.crop.filter(|c| !c.is_empty()) {
            parts.push(format!(
                "{}x{}:{}x{}",
                crop.left, crop.top, crop.right, crop.bottom
            ));
        }

        if let Some(fit_in) = options.fit_in {
            if fit_in.requires_dimensions() && !options.has_dimensions() {
                return Err(ComposeError::FitInWithoutDimensions);
            }
            parts.push(fit_in.as_str().to_string());
        }

        if let Some(size) = size_segment(options) {
            parts.push(size);
        }

        if options.halign != HAlign::Center {
            parts.push(options.halign.as_str().to_string());
        }
        if options.valign != VAlign::Middle {
            parts.push(options.valign.as_str().to_string());
        }

        if options.smart {
            parts.push("smart".to_string());
        }

        if !options.filters.is_empty() {
            let mut bits = vec![FILTERS_SEGMENT.to_string()];
            bits.extend(options.filters.iter().cloned());
            parts.push(bits.join(":"));
        }

        Ok(parts)
    }
}

impl UrlComposer for ThumborComposer {
    fn plain_image_url(&self, options: &UrlOptions) -> Result<String, ComposeError> {
        let mut parts = self.url_parts(options)?;
        parts.push(options.image_url.clone());
        Ok(parts.join("/"))
    }

    fn url_for(&self, options: &UrlOptions) -> Result<String, ComposeError> {
        let mut parts = self.url_parts(options)?;
        parts.push(hex::encode(Md5::digest(options.image_url.as_bytes())));
        Ok(parts.join("/"))
    }
}

/// `WxH` segment; mirroring is written as a negative dimension
///
/// A mirrored axis with a zero dimension only keeps its sign when the other
/// axis is zero too, giving `-0`.
fn size_segment(options: &UrlOptions) -> Option<String> {
    let width = options.width.unwrap_or(0);
    let height = options.height.unwrap_or(0);

    let width_negative = options.flip && (width != 0 || height == 0);
    let height_negative = options.flop && (height != 0 || width == 0);

    if width == 0 && height == 0 && !width_negative && !height_negative {
        return None;
    }

    let signed = |value: u32, negative: bool| {
        if negative {
            format!("-{}", value)
        } else {
            value.to_string()
        }
    };

    Some(format!(
        "{}x{}",
        signed(width, width_negative),
        signed(height, height_negative)
    ))
}
