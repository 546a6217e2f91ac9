//! Transformation options for thumbor URLs
//!
//! [`UrlOptions`] is the typed form of everything a caller can ask the image
//! service to do with a source image. Unknown option names are rejected at
//! deserialization time instead of being ignored.
//!
//! ```
//! use thumbor_url::options::{Scheme, UrlOptions};
//!
//! let options = UrlOptions::new("my.server.com/path/to/image.jpg")
//!     .with_size(300, 200)
//!     .with_smart(true);
//! assert_eq!(options.scheme(), Scheme::Signed);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::composer::ComposeError;

/// Which URL scheme a set of options selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// No token, `/unsafe/` sentinel segment
    Unsafe,
    /// Options encrypted with the legacy block cipher
    Legacy,
    /// Canonical path signed with HMAC-SHA1 (default)
    Signed,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsafe => "unsafe",
            Self::Legacy => "legacy",
            Self::Signed => "signed",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal alignment used when cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl HAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for HAlign {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(HAlign::Left),
            "center" => Ok(HAlign::Center),
            "right" => Ok(HAlign::Right),
            _ => Err(ComposeError::invalid_option(
                "halign",
                format!("unknown horizontal alignment: {}", s),
            )),
        }
    }
}

/// Vertical alignment used when cropping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl VAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }
}

impl FromStr for VAlign {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(VAlign::Top),
            "middle" => Ok(VAlign::Middle),
            "bottom" => Ok(VAlign::Bottom),
            _ => Err(ComposeError::invalid_option(
                "valign",
                format!("unknown vertical alignment: {}", s),
            )),
        }
    }
}

/// How the image should be fitted into the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitIn {
    FitIn,
    FullFitIn,
    AdaptiveFitIn,
    AdaptiveFullFitIn,
}

impl FitIn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FitIn => "fit-in",
            Self::FullFitIn => "full-fit-in",
            Self::AdaptiveFitIn => "adaptive-fit-in",
            Self::AdaptiveFullFitIn => "adaptive-full-fit-in",
        }
    }

    /// Plain and full fit-in need at least one target dimension
    pub fn requires_dimensions(&self) -> bool {
        matches!(self, Self::FitIn | Self::FullFitIn)
    }
}

impl FromStr for FitIn {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fit-in" => Ok(FitIn::FitIn),
            "full-fit-in" => Ok(FitIn::FullFitIn),
            "adaptive-fit-in" => Ok(FitIn::AdaptiveFitIn),
            "adaptive-full-fit-in" => Ok(FitIn::AdaptiveFullFitIn),
            _ => Err(ComposeError::invalid_option(
                "fit_in",
                format!("unknown fit-in mode: {}", s),
            )),
        }
    }
}

/// Which corner's pixel color drives trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrimOrientation {
    TopLeft,
    BottomRight,
}

impl TrimOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// Border trimming; both parts empty means plain `trim`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Trim {
    #[serde(default)]
    pub orientation: Option<TrimOrientation>,
    #[serde(default)]
    pub tolerance: Option<u8>,
}

/// Manual crop box, in source image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A box of all zeros asks for no crop
    pub fn is_empty(&self) -> bool {
        self.left == 0 && self.top == 0 && self.right == 0 && self.bottom == 0
    }
}

/// Parses the thumbor notation `LxT:RxB`
impl FromStr for CropBox {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ComposeError::invalid_option("crop", "expected LEFTxTOP:RIGHTxBOTTOM");
        let (top_left, bottom_right) = s.split_once(':').ok_or_else(invalid)?;
        let (left, top) = top_left.split_once('x').ok_or_else(invalid)?;
        let (right, bottom) = bottom_right.split_once('x').ok_or_else(invalid)?;

        let parse = |v: &str| v.trim().parse::<u32>().map_err(|_| invalid());
        Ok(CropBox::new(
            parse(left)?,
            parse(top)?,
            parse(right)?,
            parse(bottom)?,
        ))
    }
}

/// Options for one generated URL
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UrlOptions {
    /// Source image reference (host and path, no scheme)
    pub image_url: String,

    // === Resize ===
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Mirror horizontally
    #[serde(default)]
    pub flip: bool,
    /// Mirror vertically
    #[serde(default)]
    pub flop: bool,
    #[serde(default)]
    pub fit_in: Option<FitIn>,

    // === Crop ===
    #[serde(default)]
    pub crop: Option<CropBox>,
    #[serde(default)]
    pub halign: HAlign,
    #[serde(default)]
    pub valign: VAlign,
    #[serde(default)]
    pub smart: bool,
    #[serde(default)]
    pub trim: Option<Trim>,

    // === Output ===
    /// Filter specs such as `quality(80)`, applied in order
    #[serde(default)]
    pub filters: Vec<String>,
    /// Return image metadata as JSON instead of the image
    #[serde(default)]
    pub meta: bool,

    // === Scheme selection ===
    /// Use the legacy encrypted scheme
    #[serde(default)]
    pub old: bool,
    /// Skip cryptography entirely
    #[serde(default, rename = "unsafe")]
    pub is_unsafe: bool,
}

impl UrlOptions {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    pub fn with_flop(mut self, flop: bool) -> Self {
        self.flop = flop;
        self
    }

    pub fn with_fit_in(mut self, fit_in: FitIn) -> Self {
        self.fit_in = Some(fit_in);
        self
    }

    pub fn with_crop(mut self, crop: CropBox) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_align(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }

    pub fn with_smart(mut self, smart: bool) -> Self {
        self.smart = smart;
        self
    }

    pub fn with_trim(mut self, trim: Trim) -> Self {
        self.trim = Some(trim);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn with_meta(mut self, meta: bool) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_old(mut self, old: bool) -> Self {
        self.old = old;
        self
    }

    pub fn with_unsafe(mut self, is_unsafe: bool) -> Self {
        self.is_unsafe = is_unsafe;
        self
    }

    /// Scheme selected by the flags: `unsafe` wins over `old`, signed is the default
    pub fn scheme(&self) -> Scheme {
        if self.is_unsafe {
            Scheme::Unsafe
        } else if self.old {
            Scheme::Legacy
        } else {
            Scheme::Signed
        }
    }

    /// True when neither width nor height asks for a resize
    pub fn has_dimensions(&self) -> bool {
        self.width.unwrap_or(0) != 0 || self.height.unwrap_or(0) != 0
    }
}
