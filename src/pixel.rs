use crate::bmp;
use crate::error::TextureError;

/// Validated image size. Both sides are positive and small enough for the
/// 32-bit size fields of a BMP header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn new(width: i64, height: i64) -> Result<Self, TextureError> {
        let invalid = |reason| TextureError::InvalidDimensions {
            width,
            height,
            reason,
        };

        if width <= 0 || height <= 0 {
            return Err(invalid("width and height must be positive"));
        }
        if width > i64::from(i32::MAX) || height > i64::from(i32::MAX) {
            return Err(invalid("width and height must fit a signed 32-bit header field"));
        }

        // Header file size is a u32 covering both headers plus padded rows.
        let stride = (width as u64 * 3 + 3) & !3;
        let file_size = bmp::HEADER_SIZE as u64 + stride * height as u64;
        if file_size > u64::from(u32::MAX) {
            return Err(invalid("encoded bitmap would exceed 4 GiB"));
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// One 8-bit-per-channel color. Stored RGB; the encoder writes BGR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_bgr(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }
}

/// Row-major pixel storage, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    dimensions: Dimensions,
    pixels: Vec<Pixel>,
}

impl PixelBuffer {
    /// Build a buffer from rows produced top to bottom.
    ///
    /// `pixels` must hold exactly `width * height` entries.
    pub(crate) fn from_pixels(dimensions: Dimensions, pixels: Vec<Pixel>) -> Self {
        assert_eq!(
            pixels.len(),
            dimensions.pixel_count(),
            "pixel count does not match dimensions"
        );
        Self { dimensions, pixels }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Row `y`, counted from the top.
    pub fn row(&self, y: u32) -> &[Pixel] {
        let width = self.dimensions.width as usize;
        let start = y as usize * width;
        &self.pixels[start..start + width]
    }

    pub fn get(&self, x: u32, y: u32) -> Pixel {
        self.row(y)[x as usize]
    }
}
