use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::TextureError;
use crate::pixel::{Dimensions, PixelBuffer};

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
/// Bytes before the pixel data: file header + BITMAPINFOHEADER.
pub const HEADER_SIZE: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
const PIXELS_PER_METER: i32 = 2835; // ~72 DPI

/// Bytes per row, padded to a 4-byte boundary.
pub fn row_stride(width: u32) -> u32 {
    (width * 3 + 3) & !3
}

/// Header fields of a 24-bit bottom-up BMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub width: i32,
    pub height: i32,
    pub row_stride: u32,
    pub image_size: u32,
    pub file_size: u32,
}

impl BmpHeader {
    pub fn new(dimensions: Dimensions) -> Self {
        // Dimensions guarantees all of these fit.
        let row_stride = row_stride(dimensions.width());
        let image_size = row_stride * dimensions.height();
        Self {
            width: dimensions.width() as i32,
            height: dimensions.height() as i32,
            row_stride,
            image_size,
            file_size: HEADER_SIZE + image_size,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE as usize] {
        let mut buf = [0u8; HEADER_SIZE as usize];
        let fields: [&[u8]; 15] = [
            // -- File header (14 bytes) --
            b"BM",
            &self.file_size.to_le_bytes(),
            &0u32.to_le_bytes(), // reserved1 + reserved2
            &HEADER_SIZE.to_le_bytes(),
            // -- BITMAPINFOHEADER (40 bytes) --
            &INFO_HEADER_SIZE.to_le_bytes(),
            &self.width.to_le_bytes(),
            &self.height.to_le_bytes(), // positive = bottom-up
            &1u16.to_le_bytes(),        // biPlanes
            &24u16.to_le_bytes(),       // biBitCount
            &0u32.to_le_bytes(),        // biCompression (BI_RGB)
            &self.image_size.to_le_bytes(),
            &PIXELS_PER_METER.to_le_bytes(),
            &PIXELS_PER_METER.to_le_bytes(),
            &0u32.to_le_bytes(), // biClrUsed
            &0u32.to_le_bytes(), // biClrImportant
        ];

        let mut offset = 0;
        for field in fields {
            buf[offset..offset + field.len()].copy_from_slice(field);
            offset += field.len();
        }
        debug_assert_eq!(offset, buf.len());
        buf
    }
}

/// Stream `image` as a 24-bit BMP into `sink`, bottom row first.
///
/// One padded row buffer is reused for every scanline.
pub fn encode<W: Write>(sink: &mut W, image: &PixelBuffer) -> Result<(), TextureError> {
    let header = BmpHeader::new(image.dimensions());
    sink.write_all(&header.to_bytes())
        .map_err(TextureError::io("writing bitmap header"))?;

    let mut row = vec![0u8; header.row_stride as usize];
    for y in (0..image.dimensions().height()).rev() {
        for (dst, pixel) in row.chunks_exact_mut(3).zip(image.row(y)) {
            dst.copy_from_slice(&pixel.to_bgr());
        }
        sink.write_all(&row)
            .map_err(TextureError::io("writing bitmap data"))?;
    }

    debug!(
        file_size = header.file_size,
        row_stride = header.row_stride,
        "encoded bitmap"
    );
    Ok(())
}

/// Write `image` as a BMP file at `path`.
///
/// The bitmap is written to a temporary file next to `path` and renamed into
/// place once complete, so a failed run leaves `path` untouched.
pub fn write_bmp(path: &Path, image: &PixelBuffer) -> Result<(), TextureError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = temp_builder()
        .tempfile_in(dir)
        .map_err(TextureError::io(format!(
            "creating temporary file in {}",
            dir.display()
        )))?;

    let mut writer = BufWriter::new(tmp);
    encode(&mut writer, image)?;
    let tmp = writer
        .into_inner()
        .map_err(|e| TextureError::io("flushing bitmap data")(e.into_error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(TextureError::io("syncing bitmap data"))?;

    tmp.persist(path).map_err(|e| {
        TextureError::io(format!("moving bitmap into place at {}", path.display()))(e.error)
    })?;
    Ok(())
}

fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".chip-texture-").suffix(".bmp.tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    builder
}
