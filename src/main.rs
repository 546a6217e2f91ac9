use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use thumbor_url::{
    unsafe_url, CropBox, FitIn, HAlign, LoggingConfig, SignerConfig, UrlOptions, VAlign,
};

/// thumbor-url - generate signed, encrypted or unsafe thumbor URLs
#[derive(Parser, Debug)]
#[command(name = "thumbor-url")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file holding the security key
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Security key (overrides the configuration file)
    #[arg(short, long)]
    key: Option<String>,

    /// Target width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Mirror horizontally
    #[arg(long)]
    flip: bool,

    /// Mirror vertically
    #[arg(long)]
    flop: bool,

    /// fit-in, full-fit-in, adaptive-fit-in or adaptive-full-fit-in
    #[arg(long)]
    fit_in: Option<FitIn>,

    /// Manual crop as LEFTxTOP:RIGHTxBOTTOM
    #[arg(long)]
    crop: Option<CropBox>,

    /// left, center or right
    #[arg(long, default_value = "center")]
    halign: HAlign,

    /// top, middle or bottom
    #[arg(long, default_value = "middle")]
    valign: VAlign,

    /// Content-aware cropping
    #[arg(long)]
    smart: bool,

    /// Return metadata instead of the image
    #[arg(long)]
    meta: bool,

    /// Filter spec, repeatable and applied in order (e.g. "quality(80)")
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Use the legacy encrypted scheme
    #[arg(long)]
    old: bool,

    /// Generate an unauthenticated URL
    #[arg(long = "unsafe")]
    is_unsafe: bool,

    /// Image reference, e.g. my.server.com/path/to/image.jpg
    image_url: String,
}

impl Args {
    fn options(&self) -> UrlOptions {
        UrlOptions {
            image_url: self.image_url.clone(),
            width: self.width,
            height: self.height,
            flip: self.flip,
            flop: self.flop,
            fit_in: self.fit_in,
            crop: self.crop,
            halign: self.halign,
            valign: self.valign,
            smart: self.smart,
            trim: None,
            filters: self.filters.clone(),
            meta: self.meta,
            old: self.old,
            is_unsafe: self.is_unsafe,
        }
    }

    fn signer_config(&self) -> anyhow::Result<Option<SignerConfig>> {
        let mut config = match &self.config {
            Some(path) => Some(SignerConfig::from_file(path).with_context(|| {
                format!("Failed to load configuration from {}", path.display())
            })?),
            None => None,
        };

        if let Some(key) = &self.key {
            match config.as_mut() {
                Some(config) => config.security_key = key.clone(),
                None => config = Some(SignerConfig::new(key.clone())),
            }
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.signer_config()?;

    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    thumbor_url::logging::init_subscriber(&logging).context("Failed to initialize logging")?;

    let options = args.options();
    let url = match config {
        Some(config) => {
            let crypto = config.build_signer()?;
            tracing::info!(scheme = %options.scheme(), "Generating URL");
            crypto.generate(&options)?
        }
        None if options.is_unsafe => unsafe_url(&options)?,
        None => bail!("A security key is required: pass --key or --config"),
    };

    println!("{}", url);
    Ok(())
}
