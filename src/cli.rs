use std::path::PathBuf;

use clap::Parser;

use crate::texture::{TextureConfig, DEFAULT_BLOCK_COUNT, DEFAULT_SIZE};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a procedural circuit-board background as a 24-bit BMP",
    long_about = None
)]
pub struct Args {
    /// Destination .bmp path
    pub output: PathBuf,

    #[arg(
        long,
        help = "Image width in pixels",
        default_value_t = DEFAULT_SIZE,
        allow_negative_numbers = true,
        conflicts_with = "size"
    )]
    pub width: i64,

    #[arg(
        long,
        help = "Image height in pixels",
        default_value_t = DEFAULT_SIZE,
        allow_negative_numbers = true,
        conflicts_with = "size"
    )]
    pub height: i64,

    #[arg(
        long,
        value_name = "WxH",
        help = "Image size as WxH (e.g. 512x256), instead of --width/--height",
        value_parser = parse_resolution
    )]
    pub size: Option<(i64, i64)>,

    #[arg(long, help = "Number of random blocks", default_value_t = DEFAULT_BLOCK_COUNT)]
    pub blocks: usize,

    #[arg(long, help = "Seed for reproducible output (random when omitted)")]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> TextureConfig {
        let (width, height) = self.size.unwrap_or((self.width, self.height));
        TextureConfig {
            width,
            height,
            block_count: self.blocks,
            seed: self.seed,
        }
    }
}

/// Parse "WxH" or "WXH" (case-insensitive) into (width, height).
fn parse_resolution(s: &str) -> Result<(i64, i64), String> {
    let s_lower = s.to_lowercase();
    let parts: Vec<&str> = s_lower.split('x').collect();
    if let [w, h] = parts.as_slice() {
        if let (Ok(w), Ok(h)) = (w.trim().parse::<i64>(), h.trim().parse::<i64>()) {
            return Ok((w, h));
        }
    }
    Err(format!("expected WxH (e.g. 1024x1024), got '{s}'"))
}
