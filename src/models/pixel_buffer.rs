use super::Region;
use crate::error::PixelAccessError;
use crate::utils::grayscale::average_luminance;

/// Bytes per RGBA8 pixel
pub const CHANNELS: usize = 4;

/// Rendered page raster in RGBA8 layout
///
/// Immutable once built. Construction checks that the byte length matches
/// the dimensions, so every accessor can index without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, PixelAccessError> {
        if width == 0 || height == 0 {
            return Err(PixelAccessError::EmptyBuffer { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(PixelAccessError::InvalidLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Buffer filled with a single colour
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, PixelAccessError> {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self::new(width, height, pixels)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer, returning its bytes
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value at (x, y). Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// `(R+G+B)/3` at (x, y)
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let [r, g, b, _] = self.pixel(x, y);
        average_luminance(r, g, b)
    }

    /// One row of RGBA bytes
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * CHANNELS;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Copy out the pixels covered by `region`
    ///
    /// Regions outside the buffer are rejected, never clamped.
    pub fn crop(&self, region: &Region) -> Result<PixelBuffer, PixelAccessError> {
        if !region.fits_within(self.width, self.height) {
            return Err(PixelAccessError::OutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                buffer_width: self.width,
                buffer_height: self.height,
            });
        }
        let x0 = region.x as usize * CHANNELS;
        let x1 = x0 + region.width as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(region.area() as usize * CHANNELS);
        for y in region.y..region.y + region.height {
            pixels.extend_from_slice(&self.row(y)[x0..x1]);
        }
        PixelBuffer::new(region.width, region.height, pixels)
    }
}

/// Supplier of page pixels, addressable by rectangle
///
/// Implementations may fail, e.g. when a rendering surface refuses reads.
/// The locator treats a failed region read as fatal for that region only.
pub trait PixelSource {
    /// Full page dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Read the pixels of `region`
    fn read_region(&self, region: &Region) -> Result<PixelBuffer, PixelAccessError>;

    /// Read the whole page
    fn read_page(&self) -> Result<PixelBuffer, PixelAccessError> {
        let (width, height) = self.dimensions();
        self.read_region(&Region::full_frame(width, height))
    }
}

impl PixelSource for PixelBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn read_region(&self, region: &Region) -> Result<PixelBuffer, PixelAccessError> {
        self.crop(region)
    }

    fn read_page(&self) -> Result<PixelBuffer, PixelAccessError> {
        Ok(self.clone())
    }
}
