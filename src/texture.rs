//! Procedural "circuit board" texture.
//!
//! Layers, applied per pixel in this order before clamping:
//! base color, monochrome noise, random blocks with bright borders, grid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::TextureError;
use crate::pixel::{Dimensions, Pixel, PixelBuffer};

const BASE_COLOR: [u32; 3] = [20, 30, 25];
const NOISE_MAX: u32 = 10;
const BLOCK_EXTENT: std::ops::RangeInclusive<u32> = 50..=200;
const BLOCK_BOOST: std::ops::RangeInclusive<u32> = 20..=60;
const BORDER_BOOST: u32 = 40;
const GRID_PERIOD: u32 = 128;
const GRID_BOOST: u32 = 30;

pub const DEFAULT_SIZE: i64 = 1024;
pub const DEFAULT_BLOCK_COUNT: usize = 50;

/// Generation parameters, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureConfig {
    pub width: i64,
    pub height: i64,
    pub block_count: usize,
    /// Fixed seed for reproducible output; `None` picks one at random.
    pub seed: Option<u64>,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            block_count: DEFAULT_BLOCK_COUNT,
            seed: None,
        }
    }
}

impl TextureConfig {
    pub fn dimensions(&self) -> Result<Dimensions, TextureError> {
        Dimensions::new(self.width, self.height)
    }

    /// The configured seed, or a fresh one from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// Validate, then generate with an RNG seeded from `seed`.
    pub fn generate(&self, seed: u64) -> Result<PixelBuffer, TextureError> {
        let dimensions = self.dimensions()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(generate(dimensions, self.block_count, &mut rng))
    }
}

/// A rectangle that tints the pixels it covers. May extend past the image edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub boost: u32,
}

impl Block {
    fn covers_row(&self, y: u32) -> bool {
        y >= self.y && y - self.y < self.height
    }

    fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x - self.x < self.width && self.covers_row(y)
    }

    fn on_border(&self, x: u32, y: u32) -> bool {
        x == self.x
            || x - self.x == self.width - 1
            || y == self.y
            || y - self.y == self.height - 1
    }
}

/// Draw `count` blocks. Each block consumes x, y, width, height, boost in that order.
pub fn sample_blocks<R: Rng + ?Sized>(
    dimensions: Dimensions,
    count: usize,
    rng: &mut R,
) -> Vec<Block> {
    (0..count)
        .map(|_| Block {
            x: rng.random_range(0..dimensions.width()),
            y: rng.random_range(0..dimensions.height()),
            width: rng.random_range(BLOCK_EXTENT),
            height: rng.random_range(BLOCK_EXTENT),
            boost: rng.random_range(BLOCK_BOOST),
        })
        .collect()
}

/// Composite one pixel from its noise draw and the blocks covering its row.
///
/// Channels accumulate in `u32` with saturating adds, so any number of
/// overlapping blocks clamps cleanly to 255.
pub fn shade<'a>(
    x: u32,
    y: u32,
    noise: u32,
    blocks: impl IntoIterator<Item = &'a Block>,
) -> Pixel {
    let mut rgb = BASE_COLOR.map(|c| c.saturating_add(noise));

    for block in blocks {
        if !block.contains(x, y) {
            continue;
        }
        let half = block.boost / 2;
        rgb[0] = rgb[0].saturating_add(half);
        rgb[1] = rgb[1].saturating_add(block.boost);
        rgb[2] = rgb[2].saturating_add(half);

        if block.on_border(x, y) {
            rgb[1] = rgb[1].saturating_add(BORDER_BOOST);
        }
    }

    if x % GRID_PERIOD == 0 || y % GRID_PERIOD == 0 {
        rgb = rgb.map(|c| c.saturating_add(GRID_BOOST));
    }

    let [r, g, b] = rgb.map(clamp_u8);
    Pixel::new(r, g, b)
}

/// Render a full texture.
///
/// Blocks are sampled first, then one noise value per pixel in row-major
/// order, so a seeded `rng` always yields the same image.
pub fn generate<R: Rng + ?Sized>(
    dimensions: Dimensions,
    block_count: usize,
    rng: &mut R,
) -> PixelBuffer {
    let blocks = sample_blocks(dimensions, block_count, rng);
    debug!(count = blocks.len(), "sampled blocks");

    let mut pixels = Vec::with_capacity(dimensions.pixel_count());
    let mut active = Vec::with_capacity(blocks.len());

    for y in 0..dimensions.height() {
        active.clear();
        active.extend(blocks.iter().filter(|b| b.covers_row(y)));

        for x in 0..dimensions.width() {
            let noise = rng.random_range(0..=NOISE_MAX);
            pixels.push(shade(x, y, noise, active.iter().copied()));
        }
    }

    debug!(
        width = dimensions.width(),
        height = dimensions.height(),
        "texture generated"
    );
    PixelBuffer::from_pixels(dimensions, pixels)
}

fn clamp_u8(v: u32) -> u8 {
    v.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_BLOCKS: [Block; 0] = [];

    fn block(x: u32, y: u32, width: u32, height: u32, boost: u32) -> Block {
        Block {
            x,
            y,
            width,
            height,
            boost,
        }
    }

    #[test]
    fn test_base_color_off_grid() {
        assert_eq!(shade(5, 7, 0, &NO_BLOCKS), Pixel::new(20, 30, 25));
    }

    #[test]
    fn test_noise_is_monochrome() {
        assert_eq!(shade(5, 7, 10, &NO_BLOCKS), Pixel::new(30, 40, 35));
    }

    #[test]
    fn test_grid_lines() {
        let expected = Pixel::new(50, 60, 55);
        assert_eq!(shade(0, 0, 0, &NO_BLOCKS), expected);
        assert_eq!(shade(128, 3, 0, &NO_BLOCKS), expected);
        assert_eq!(shade(3, 256, 0, &NO_BLOCKS), expected);
        assert_eq!(shade(127, 129, 0, &NO_BLOCKS), Pixel::new(20, 30, 25));
    }

    #[test]
    fn test_block_interior_and_border() {
        let blocks = [block(10, 10, 50, 60, 25)];

        // interior: +12 red/blue, +25 green
        assert_eq!(shade(30, 30, 0, &blocks), Pixel::new(32, 55, 37));

        // each edge adds 40 green on top
        for (x, y) in [(10, 30), (59, 30), (30, 10), (30, 69), (10, 10)] {
            assert_eq!(shade(x, y, 0, &blocks), Pixel::new(32, 95, 37), "({x}, {y})");
        }

        // just outside on every side
        for (x, y) in [(9, 30), (60, 30), (30, 9), (30, 70)] {
            assert_eq!(shade(x, y, 0, &blocks), Pixel::new(20, 30, 25), "({x}, {y})");
        }
    }

    #[test]
    fn test_overlapping_blocks_add() {
        let blocks = [block(0, 0, 100, 100, 20), block(1, 1, 100, 100, 21)];
        // (50, 50) is interior to both; 21 / 2 truncates to 10
        assert_eq!(shade(50, 50, 0, &blocks), Pixel::new(40, 71, 45));
    }

    #[test]
    fn test_channels_saturate() {
        let blocks = vec![block(0, 0, 200, 200, 60); 1000];
        assert_eq!(shade(0, 0, 10, &blocks), Pixel::new(255, 255, 255));
        assert_eq!(shade(1, 1, 0, &blocks), Pixel::new(255, 255, 255));
    }

    #[test]
    fn test_sampled_blocks_within_ranges() {
        let dims = Dimensions::new(300, 40).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let blocks = sample_blocks(dims, 500, &mut rng);

        assert_eq!(blocks.len(), 500);
        for b in &blocks {
            assert!(b.x < 300 && b.y < 40);
            assert!(BLOCK_EXTENT.contains(&b.width));
            assert!(BLOCK_EXTENT.contains(&b.height));
            assert!(BLOCK_BOOST.contains(&b.boost));
        }
    }

    #[test]
    fn test_generate_is_deterministic_for_a_seed() {
        let dims = Dimensions::new(200, 150).unwrap();
        let a = generate(dims, DEFAULT_BLOCK_COUNT, &mut StdRng::seed_from_u64(42));
        let b = generate(dims, DEFAULT_BLOCK_COUNT, &mut StdRng::seed_from_u64(42));
        let c = generate(dims, DEFAULT_BLOCK_COUNT, &mut StdRng::seed_from_u64(43));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_matches_shade_with_replayed_draws() {
        let dims = Dimensions::new(64, 48).unwrap();
        let image = generate(dims, 5, &mut StdRng::seed_from_u64(9));

        let mut rng = StdRng::seed_from_u64(9);
        let blocks = sample_blocks(dims, 5, &mut rng);
        for y in 0..48 {
            for x in 0..64 {
                let noise = rng.random_range(0..=NOISE_MAX);
                assert_eq!(image.get(x, y), shade(x, y, noise, &blocks));
            }
        }
    }

    #[test]
    fn test_generate_without_blocks_stays_in_base_and_noise_range() {
        let dims = Dimensions::new(130, 2).unwrap();
        let image = generate(dims, 0, &mut StdRng::seed_from_u64(1));

        for y in 0..2 {
            for x in 0..130 {
                let p = image.get(x, y);
                let grid = if x % 128 == 0 || y == 0 { 30 } else { 0 };
                let n = p.r - 20 - grid;
                assert!(n <= 10);
                assert_eq!(p, Pixel::new(20 + grid + n, 30 + grid + n, 25 + grid + n));
            }
        }
    }

    #[test]
    fn test_generate_single_pixel() {
        let dims = Dimensions::new(1, 1).unwrap();
        let image = generate(dims, DEFAULT_BLOCK_COUNT, &mut StdRng::seed_from_u64(3));
        assert_eq!(image.dimensions(), dims);
        // (0, 0) is on the grid and on the border of every block that covers it
        assert!(image.get(0, 0).r >= 50);
    }

    #[test]
    fn test_config_default_and_validation() {
        let config = TextureConfig::default();
        assert_eq!((config.width, config.height), (1024, 1024));
        assert_eq!(config.block_count, 50);
        assert_eq!(config.seed, None);

        let bad = TextureConfig {
            width: 0,
            ..TextureConfig::default()
        };
        assert!(matches!(
            bad.generate(1),
            Err(TextureError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_config_resolve_seed_prefers_explicit() {
        let config = TextureConfig {
            seed: Some(1234),
            ..TextureConfig::default()
        };
        assert_eq!(config.resolve_seed(), 1234);
    }
}
