//! Point-sampled resizing
//!
//! Both directions use nearest-neighbour sampling only. Smoothing blurs the
//! module edges the decoder and the edge scorer depend on.

use crate::error::PixelAccessError;
use crate::models::PixelBuffer;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resize `src` to `width` x `height` with nearest-neighbour sampling
pub fn resize_nearest(
    src: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer, PixelAccessError> {
    if (width, height) == (src.width(), src.height()) {
        return Ok(src.clone());
    }
    let image = RgbaImage::from_raw(src.width(), src.height(), src.pixels().to_vec())
        .ok_or_else(|| PixelAccessError::Source("pixel buffer rejected by image crate".into()))?;
    let resized = imageops::resize(&image, width, height, FilterType::Nearest);
    PixelBuffer::new(width, height, resized.into_raw())
}

/// Source coordinate sampled for destination index `dst` when mapping a
/// `src_len` axis onto `dst_len` samples
#[inline]
pub fn point_sample_index(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    let idx = (dst as u64 * src_len as u64 / dst_len.max(1) as u64) as u32;
    idx.min(src_len.saturating_sub(1))
}

/// Dimensions after shrinking so neither side exceeds `max_dim`,
/// preserving aspect ratio. Never enlarges.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dim || max_dim == 0 {
        return (width, height);
    }
    let scale = max_dim as f64 / longest as f64;
    let w = ((width as f64 * scale).floor() as u32).max(1);
    let h = ((height as f64 * scale).floor() as u32).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: u32) -> PixelBuffer {
        let mut pixels = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        PixelBuffer::new(size, size, pixels).unwrap()
    }

    #[test]
    fn test_resize_nearest_keeps_hard_edges() {
        let src = checkerboard(8);
        let up = resize_nearest(&src, 16, 16).unwrap();
        assert_eq!((up.width(), up.height()), (16, 16));
        for px in up.pixels().chunks_exact(4) {
            assert!(px[0] == 0 || px[0] == 255, "interpolated value {}", px[0]);
        }
    }

    #[test]
    fn test_resize_same_size_is_copy() {
        let src = checkerboard(4);
        assert_eq!(resize_nearest(&src, 4, 4).unwrap(), src);
    }

    #[test]
    fn test_point_sample_index() {
        assert_eq!(point_sample_index(0, 800, 400), 0);
        assert_eq!(point_sample_index(399, 800, 400), 798);
        assert_eq!(point_sample_index(5, 10, 10), 5);
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(300, 200, 400), (300, 200));
        assert_eq!(fit_within(800, 400, 400), (400, 200));
        assert_eq!(fit_within(1000, 3, 400), (400, 1));
    }
}
